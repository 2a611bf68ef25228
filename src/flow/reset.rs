//! Forgot-password flows.
//!
//! [`ResetTokenVerification`] checks the emailed link (`?token=&user_id=`) and,
//! on success, yields a short-lived token. [`PasswordResetSubmission`] is the
//! follow-up form: it applies the local password rules and then spends the
//! short-lived token on the actual reset.

use super::{
    params::{extract, Field},
    password::check_new_password,
    Flow, FlowError, NavigationContext, ValidationError,
};
use crate::client::{ResetPasswordRequest, VerificationClient, VerifyForgotPasswordTokenRequest};
use crate::locale::{Locale, Strings};
use secrecy::SecretString;
use serde::Serialize;

const TOKEN_FIELDS: [Field; 2] = [Field::text("token"), Field::integer("user_id")];

const SUBMISSION_FIELDS: [Field; 4] = [
    Field::integer("user_id"),
    Field::text("token"),
    Field::secret("new_password"),
    Field::secret("confirm_password"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenParams {
    pub token: String,
    pub user_id: i64,
}

/// Authorization for the single follow-up reset call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortLivedGrant {
    pub user_id: i64,
    pub short_lived_token: String,
}

#[derive(Debug, Clone, Copy)]
pub struct ResetTokenVerification {
    strings: &'static Strings,
}

impl ResetTokenVerification {
    #[must_use]
    pub fn new(locale: Locale) -> Self {
        Self {
            strings: locale.strings(),
        }
    }
}

impl Flow for ResetTokenVerification {
    type Params = TokenParams;
    type Payload = ShortLivedGrant;

    const NAME: &'static str = "verify_forgot_password_token";

    fn extract(&self, context: &NavigationContext) -> Result<TokenParams, FlowError> {
        let params = extract(context, &TOKEN_FIELDS)?;
        Ok(TokenParams {
            token: params.text("token")?.to_string(),
            user_id: params.integer("user_id")?,
        })
    }

    async fn call<C: VerificationClient>(
        &self,
        client: &C,
        params: &TokenParams,
    ) -> Result<ShortLivedGrant, FlowError> {
        let response = client
            .verify_forgot_password_token(VerifyForgotPasswordTokenRequest {
                token: params.token.clone(),
                user_id: params.user_id,
            })
            .await?;

        if !response.success {
            return Err(FlowError::rejected(response.message));
        }

        match response.short_lived_token {
            Some(short_lived_token) if !short_lived_token.trim().is_empty() => {
                Ok(ShortLivedGrant {
                    user_id: params.user_id,
                    short_lived_token,
                })
            }
            // success without a token leaves nothing to authorize the reset with
            _ => Err(FlowError::rejected(Some(
                self.strings.unexpected_token_state.to_string(),
            ))),
        }
    }

    fn describe(&self, error: &FlowError) -> String {
        match error {
            FlowError::Validation(ValidationError::Missing(_)) => {
                self.strings.missing_reset_params.to_string()
            }
            FlowError::Validation(ValidationError::Malformed(_)) => {
                self.strings.invalid_user_id.to_string()
            }
            FlowError::NegativeResult { .. } => error
                .supplied_message()
                .unwrap_or(self.strings.token_verification_failed)
                .to_string(),
            FlowError::Transport(_) => error
                .supplied_message()
                .unwrap_or(self.strings.token_request_failed)
                .to_string(),
            FlowError::LocalPolicy(_) => self.strings.unknown_error.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct SubmissionParams {
    pub user_id: i64,
    pub token: String,
    pub new_password: SecretString,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PasswordReset {
    pub user_id: i64,
}

#[derive(Debug, Clone, Copy)]
pub struct PasswordResetSubmission {
    strings: &'static Strings,
}

impl PasswordResetSubmission {
    #[must_use]
    pub fn new(locale: Locale) -> Self {
        Self {
            strings: locale.strings(),
        }
    }
}

impl Flow for PasswordResetSubmission {
    type Params = SubmissionParams;
    type Payload = PasswordReset;

    const NAME: &'static str = "reset_password";

    fn extract(&self, context: &NavigationContext) -> Result<SubmissionParams, FlowError> {
        let params = extract(context, &SUBMISSION_FIELDS)?;
        let new_password = params.text("new_password")?;
        check_new_password(new_password, params.text("confirm_password")?)?;

        Ok(SubmissionParams {
            user_id: params.integer("user_id")?,
            token: params.text("token")?.to_string(),
            new_password: SecretString::from(new_password.to_string()),
        })
    }

    async fn call<C: VerificationClient>(
        &self,
        client: &C,
        params: &SubmissionParams,
    ) -> Result<PasswordReset, FlowError> {
        client
            .reset_password(ResetPasswordRequest {
                user_id: params.user_id,
                token: params.token.clone(),
                new_password: params.new_password.clone(),
            })
            .await?;

        Ok(PasswordReset {
            user_id: params.user_id,
        })
    }

    fn describe(&self, error: &FlowError) -> String {
        match error {
            FlowError::Validation(_) => self.strings.reset_incomplete.to_string(),
            FlowError::LocalPolicy(super::PolicyViolation::Mismatch) => {
                self.strings.passwords_mismatch.to_string()
            }
            FlowError::LocalPolicy(super::PolicyViolation::TooWeak) => {
                self.strings.password_too_weak.to_string()
            }
            FlowError::NegativeResult { .. } | FlowError::Transport(_) => error
                .supplied_message()
                .unwrap_or(self.strings.reset_failed)
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockClient;
    use crate::client::{ResetPasswordResponse, TransportError, VerifyForgotPasswordTokenResponse};
    use crate::flow::{Failure, FailureCause, FlowInstance, VerificationOutcome};

    fn context(pairs: &[(&str, &str)]) -> NavigationContext {
        pairs.iter().copied().collect()
    }

    fn failure<T: std::fmt::Debug>(outcome: VerificationOutcome<T>) -> Failure {
        match outcome {
            VerificationOutcome::Failure(failure) => failure,
            other => panic!("expected failure, got {other:?}"),
        }
    }

    async fn verify(
        client: &MockClient,
        pairs: &[(&str, &str)],
    ) -> VerificationOutcome<ShortLivedGrant> {
        FlowInstance::mount(ResetTokenVerification::new(Locale::En), &context(pairs))
            .run(client)
            .await
    }

    async fn submit(
        client: &MockClient,
        pairs: &[(&str, &str)],
    ) -> VerificationOutcome<PasswordReset> {
        FlowInstance::mount(PasswordResetSubmission::new(Locale::En), &context(pairs))
            .run(client)
            .await
    }

    #[tokio::test]
    async fn valid_link_yields_short_lived_grant() {
        let client = MockClient::with_verify_token(Ok(VerifyForgotPasswordTokenResponse {
            success: true,
            short_lived_token: Some("short-abc".to_string()),
            message: None,
        }));
        let outcome = verify(&client, &[("token", "tok123"), ("user_id", "42")]).await;
        assert_eq!(
            outcome,
            VerificationOutcome::Success(ShortLivedGrant {
                user_id: 42,
                short_lived_token: "short-abc".to_string(),
            })
        );
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn missing_user_id_fails_without_calling() {
        let client = MockClient::default();
        let failure = failure(verify(&client, &[("token", "tok123")]).await);
        assert_eq!(failure.message, "Missing token or user ID in the URL.");
        assert_eq!(failure.cause, FailureCause::Validation);
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn non_numeric_user_id_fails_without_calling() {
        let client = MockClient::default();
        let failure = failure(verify(&client, &[("token", "tok123"), ("user_id", "abc")]).await);
        assert_eq!(failure.message, "Invalid user ID in the URL.");
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn rejected_token_uses_server_message_or_fallback() {
        let client = MockClient::with_verify_token(Ok(VerifyForgotPasswordTokenResponse {
            success: false,
            short_lived_token: None,
            message: Some("token expired".to_string()),
        }));
        let failure_with_message =
            failure(verify(&client, &[("token", "tok123"), ("user_id", "42")]).await);
        assert_eq!(failure_with_message.message, "token expired");
        assert_eq!(failure_with_message.cause, FailureCause::NegativeResult);

        let client = MockClient::with_verify_token(Ok(VerifyForgotPasswordTokenResponse::default()));
        let fallback = failure(verify(&client, &[("token", "tok123"), ("user_id", "42")]).await);
        assert_eq!(fallback.message, "Token verification failed.");
    }

    #[tokio::test]
    async fn success_without_token_is_a_failure() {
        let client = MockClient::with_verify_token(Ok(VerifyForgotPasswordTokenResponse {
            success: true,
            short_lived_token: None,
            message: None,
        }));
        let failure = failure(verify(&client, &[("token", "tok123"), ("user_id", "42")]).await);
        assert_eq!(
            failure.message,
            "An unexpected state occurred during token verification."
        );
    }

    #[tokio::test]
    async fn transport_failure_without_message_uses_fallback() {
        let client = MockClient::with_verify_token(Err(TransportError::Http {
            status: 502,
            message: String::new(),
        }));
        let failure = failure(verify(&client, &[("token", "tok123"), ("user_id", "42")]).await);
        assert_eq!(
            failure.message,
            "Failed to verify token. The link may be invalid or expired."
        );
        assert_eq!(failure.cause, FailureCause::Transport);
    }

    const FORM: [(&str, &str); 4] = [
        ("user_id", "42"),
        ("token", "short-abc"),
        ("new_password", "Abcdef1"),
        ("confirm_password", "Abcdef1"),
    ];

    #[tokio::test]
    async fn submission_resets_password() {
        let client = MockClient::with_reset(Ok(ResetPasswordResponse {}));
        let outcome = submit(&client, &FORM).await;
        assert_eq!(
            outcome,
            VerificationOutcome::Success(PasswordReset { user_id: 42 })
        );
        assert_eq!(
            client.last_reset.lock().unwrap().clone(),
            Some((42, "short-abc".to_string(), "Abcdef1".to_string()))
        );
    }

    #[tokio::test]
    async fn mismatched_passwords_never_reach_api() {
        let client = MockClient::default();
        let mut form = FORM;
        form[3] = ("confirm_password", "Abcdef2");
        let failure = failure(submit(&client, &form).await);
        assert_eq!(failure.message, "Passwords do not match.");
        assert_eq!(failure.cause, FailureCause::LocalPolicy);
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn weak_password_never_reaches_api() {
        let client = MockClient::default();
        for weak in ["abcdef", "Ab1"] {
            let mut form = FORM;
            form[2] = ("new_password", weak);
            form[3] = ("confirm_password", weak);
            let failure = failure(submit(&client, &form).await);
            assert_eq!(failure.message, Locale::En.strings().password_too_weak);
        }
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn reset_transport_error_is_shown() {
        let client = MockClient::with_reset(Err(TransportError::Http {
            status: 400,
            message: "token already used".to_string(),
        }));
        let failure = failure(submit(&client, &FORM).await);
        assert_eq!(failure.message, "token already used");
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn incomplete_submission_is_a_validation_failure() {
        let client = MockClient::default();
        let failure = failure(submit(&client, &FORM[..2]).await);
        assert_eq!(failure.cause, FailureCause::Validation);
        assert_eq!(failure.message, Locale::En.strings().reset_incomplete);
        assert_eq!(client.calls(), 0);
    }
}
