//! Contract for the remote verification API.
//!
//! The pages never talk to the network directly; every flow receives an
//! implementation of [`VerificationClient`]. Request and response shapes follow
//! the proto3 JSON mapping used by the backend (`lowerCamelCase` field names),
//! and every response is a typed struct with an explicit `success` flag so the
//! flows can match on each branch.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;

pub mod http;
pub use self::http::HttpVerificationClient;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VerifyForgotPasswordTokenRequest {
    pub token: String,
    pub user_id: i64,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VerifyForgotPasswordTokenResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub short_lived_token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VerifyEmailRequest {
    pub email_id: i64,
    pub secret_code: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VerifyEmailResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Final step of the forgot-password flow, authorized by the short-lived token.
///
/// Not `Serialize`: the password is only exposed while the HTTP body is built.
#[derive(Debug)]
pub struct ResetPasswordRequest {
    pub user_id: i64,
    pub token: String,
    pub new_password: SecretString,
}

/// The reset endpoint answers with an empty message; failures arrive as errors.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ResetPasswordResponse {}

/// The call itself failed, as opposed to the API answering `success: false`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("{0}")]
    Network(String),
    #[error("{0}")]
    Timeout(String),
    #[error("{message}")]
    Http { status: u16, message: String },
    #[error("{0}")]
    Decode(String),
}

impl TransportError {
    /// Error text suitable for display, `None` when the transport gave nothing useful.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        let message = match self {
            Self::Network(message) | Self::Timeout(message) | Self::Decode(message) => message,
            Self::Http { message, .. } => message,
        };
        let message = message.trim();
        (!message.is_empty()).then_some(message)
    }
}

/// Remote operations the flows depend on.
///
/// Each call is a single request; implementations must not retry on their own.
pub trait VerificationClient: Send + Sync {
    fn verify_forgot_password_token(
        &self,
        request: VerifyForgotPasswordTokenRequest,
    ) -> impl Future<Output = Result<VerifyForgotPasswordTokenResponse, TransportError>> + Send;

    fn verify_email(
        &self,
        request: VerifyEmailRequest,
    ) -> impl Future<Output = Result<VerifyEmailResponse, TransportError>> + Send;

    fn reset_password(
        &self,
        request: ResetPasswordRequest,
    ) -> impl Future<Output = Result<ResetPasswordResponse, TransportError>> + Send;
}
