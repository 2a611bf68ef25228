use super::error::PolicyViolation;
use regex::Regex;

pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Minimum length plus at least one uppercase letter, one lowercase letter and one digit.
#[must_use]
pub fn valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LENGTH
        && [r"[A-Z]", r"[a-z]", r"[0-9]"]
            .iter()
            .all(|pattern| Regex::new(pattern).is_ok_and(|re| re.is_match(password)))
}

/// Local checks for the reset form, run before any remote call.
///
/// # Errors
/// [`PolicyViolation::Mismatch`] when the confirmation differs, otherwise
/// [`PolicyViolation::TooWeak`] when the password fails [`valid_password`].
pub fn check_new_password(new_password: &str, confirm_password: &str) -> Result<(), PolicyViolation> {
    if new_password != confirm_password {
        return Err(PolicyViolation::Mismatch);
    }

    if !valid_password(new_password) {
        return Err(PolicyViolation::TooWeak);
    }

    Ok(())
}
