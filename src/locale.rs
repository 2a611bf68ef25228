//! Display strings for every page, keyed by locale.
//!
//! The table is static data; a locale is picked once per request from the
//! `Accept-Language` header and English is the fallback.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Zh,
}

impl Locale {
    /// Pick a locale from the primary subtag of the first `Accept-Language` entry.
    #[must_use]
    pub fn from_accept_language(header: Option<&str>) -> Self {
        let primary = header
            .and_then(|value| value.split(',').next())
            .and_then(|tag| tag.split(';').next())
            .and_then(|tag| tag.trim().split(['-', '_']).next())
            .map(str::to_ascii_lowercase);

        match primary.as_deref() {
            Some("zh") => Self::Zh,
            _ => Self::En,
        }
    }

    /// BCP 47 tag used for the `lang` attribute.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Zh => "zh",
        }
    }

    #[must_use]
    pub fn strings(self) -> &'static Strings {
        match self {
            Self::En => &EN,
            Self::Zh => &ZH,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Strings {
    // instructor deep link
    pub redirect_title: &'static str,
    pub redirect_hint: &'static str,
    pub app_store_link: &'static str,
    pub play_store_link: &'static str,
    pub instructor_id_label: &'static str,
    pub missing_instructor: &'static str,

    // email verification
    pub email_verification: &'static str,
    pub verifying_email: &'static str,
    pub invalid_link: &'static str,
    pub verification_success: &'static str,
    pub verification_failed: &'static str,
    pub unknown_error: &'static str,

    // forgot-password token
    pub verifying_token: &'static str,
    pub missing_reset_params: &'static str,
    pub invalid_user_id: &'static str,
    pub token_verification_failed: &'static str,
    pub token_request_failed: &'static str,
    pub unexpected_token_state: &'static str,

    // reset form
    pub reset_title: &'static str,
    pub new_password_label: &'static str,
    pub confirm_password_label: &'static str,
    pub reset_button: &'static str,
    pub reset_success_title: &'static str,
    pub reset_success: &'static str,
    pub reset_incomplete: &'static str,
    pub passwords_mismatch: &'static str,
    pub password_too_weak: &'static str,
    pub reset_failed: &'static str,
}

pub static EN: Strings = Strings {
    redirect_title: "Redirecting to SnowPro App...",
    redirect_hint: "If you are not redirected automatically, please click the links below:",
    app_store_link: "Download on the App Store",
    play_store_link: "Get it on Google Play",
    instructor_id_label: "Instructor ID",
    missing_instructor: "Instructor link is invalid or incomplete.",

    email_verification: "Email Verification",
    verifying_email: "Verifying your email...",
    invalid_link: "Verification link is invalid or incomplete. Missing email or secret code.",
    verification_success: "Your email has been successfully verified!",
    verification_failed: "Email verification failed. Please try again or request a new link.",
    unknown_error: "An unknown error occurred.",

    verifying_token: "Verifying token...",
    missing_reset_params: "Missing token or user ID in the URL.",
    invalid_user_id: "Invalid user ID in the URL.",
    token_verification_failed: "Token verification failed.",
    token_request_failed: "Failed to verify token. The link may be invalid or expired.",
    unexpected_token_state: "An unexpected state occurred during token verification.",

    reset_title: "Reset Password",
    new_password_label: "New Password",
    confirm_password_label: "Confirm New Password",
    reset_button: "Reset Password",
    reset_success_title: "Password Reset Successful",
    reset_success: "Your password has been reset successfully. You can now sign in.",
    reset_incomplete: "Password reset request is incomplete. Please open the link from your email again.",
    passwords_mismatch: "Passwords do not match.",
    password_too_weak: "Password must be at least 6 characters long and contain at least one uppercase letter, one lowercase letter, and one digit.",
    reset_failed: "An unexpected error occurred. Please try again later.",
};

pub static ZH: Strings = Strings {
    redirect_title: "正在跳转到 SnowPro 应用...",
    redirect_hint: "如果没有自动跳转，请点击下面的链接：",
    app_store_link: "在 App Store 下载",
    play_store_link: "在 Google Play 获取",
    instructor_id_label: "教练 ID",
    missing_instructor: "教练链接无效或不完整。",

    email_verification: "邮箱验证",
    verifying_email: "正在验证您的邮箱...",
    invalid_link: "验证链接无效或不完整。缺少邮箱或密钥。",
    verification_success: "您的邮箱已成功验证！",
    verification_failed: "邮箱验证失败。请重试或请求新链接。",
    unknown_error: "发生未知错误。",

    verifying_token: "正在验证令牌...",
    missing_reset_params: "链接中缺少令牌或用户 ID。",
    invalid_user_id: "链接中的用户 ID 无效。",
    token_verification_failed: "令牌验证失败。",
    token_request_failed: "令牌验证失败。链接可能无效或已过期。",
    unexpected_token_state: "令牌验证过程中出现意外状态。",

    reset_title: "重置密码",
    new_password_label: "新密码",
    confirm_password_label: "确认新密码",
    reset_button: "重置密码",
    reset_success_title: "密码重置成功",
    reset_success: "您的密码已重置成功，现在可以登录了。",
    reset_incomplete: "密码重置请求不完整。请重新打开邮件中的链接。",
    passwords_mismatch: "两次输入的密码不一致。",
    password_too_weak: "密码长度至少为 6 个字符，并且必须包含至少一个大写字母、一个小写字母和一个数字。",
    reset_failed: "发生意外错误，请稍后再试。",
};
