pub mod health;
pub mod instructor;
pub mod reset_password;
pub mod verify_email;

// common functions for the handlers
use super::render::RenderError;
use crate::flow::{FailureCause, VerificationOutcome};
use crate::locale::Locale;
use axum::{
    http::{
        header::{ACCEPT_LANGUAGE, CACHE_CONTROL},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{Html, IntoResponse, Response},
};
use tracing::error;

#[must_use]
pub fn locale(headers: &HeaderMap) -> Locale {
    Locale::from_accept_language(
        headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok()),
    )
}

#[must_use]
pub const fn failure_status(cause: FailureCause) -> StatusCode {
    match cause {
        FailureCause::Validation | FailureCause::NegativeResult => StatusCode::BAD_REQUEST,
        FailureCause::LocalPolicy => StatusCode::UNPROCESSABLE_ENTITY,
        FailureCause::Transport => StatusCode::BAD_GATEWAY,
    }
}

#[must_use]
pub fn outcome_status<T>(outcome: &VerificationOutcome<T>) -> StatusCode {
    match outcome {
        VerificationOutcome::Pending => StatusCode::ACCEPTED,
        VerificationOutcome::Success(_) => StatusCode::OK,
        VerificationOutcome::Failure(failure) => failure_status(failure.cause),
    }
}

/// Wrap a rendered page. Render errors are logged and become a bare 500.
pub fn page(status: StatusCode, rendered: Result<String, RenderError>) -> Response {
    match rendered {
        Ok(body) => {
            let mut headers = HeaderMap::new();
            // pages may embed one-time tokens
            headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
            (status, headers, Html(body)).into_response()
        }
        Err(err) => {
            error!("Failed to render page: {err}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}
