//! HTML pages.
//!
//! Templates are compiled into the binary and loaded once at startup. Every
//! template name ends in `.html`, so minijinja escapes all interpolated values.

use crate::flow::{FailureCause, VerificationOutcome};
use crate::locale::Locale;
use minijinja::{context, Environment, UndefinedBehavior, Value};
use serde::Serialize;
use thiserror::Error;

pub const INSTRUCTOR: &str = "instructor.html";
pub const VERIFY_EMAIL: &str = "verify_email.html";
pub const RESET_PASSWORD: &str = "reset_password.html";
pub const RESET_DONE: &str = "reset_done.html";

const TEMPLATES: [(&str, &str); 5] = [
    ("base.html", include_str!("templates/base.html")),
    (INSTRUCTOR, include_str!("templates/instructor.html")),
    (VERIFY_EMAIL, include_str!("templates/verify_email.html")),
    (RESET_PASSWORD, include_str!("templates/reset_password.html")),
    (RESET_DONE, include_str!("templates/reset_done.html")),
];

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
}

/// Serializable view of a flow state. Every variant has its own rendering.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeView<'a, T> {
    Pending,
    Success { payload: &'a T },
    Failure { message: &'a str, cause: FailureCause },
}

impl<'a, T> From<&'a VerificationOutcome<T>> for OutcomeView<'a, T> {
    fn from(outcome: &'a VerificationOutcome<T>) -> Self {
        match outcome {
            VerificationOutcome::Pending => Self::Pending,
            VerificationOutcome::Success(payload) => Self::Success { payload },
            VerificationOutcome::Failure(failure) => Self::Failure {
                message: &failure.message,
                cause: failure.cause,
            },
        }
    }
}

/// Hidden fields carried by the reset form.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ResetForm {
    pub user_id: String,
    pub token: String,
}

#[derive(Debug)]
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    /// # Errors
    /// Returns [`RenderError`] if a bundled template fails to parse.
    pub fn new() -> Result<Self, RenderError> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        for (name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    /// Render `name` with the locale's `lang` tag and string table merged into `page`.
    ///
    /// # Errors
    /// Returns [`RenderError`] if the template is unknown or rendering fails.
    pub fn render(&self, name: &str, locale: Locale, page: Value) -> Result<String, RenderError> {
        let ctx = context! {
            lang => locale.tag(),
            t => locale.strings(),
            ..page
        };
        Ok(self.env.get_template(name)?.render(ctx)?)
    }
}
