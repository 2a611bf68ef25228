//! JSON-over-HTTP implementation of [`VerificationClient`].
//!
//! One `POST {api_url}/v1/<operation>` per call. Non-2xx answers become
//! [`TransportError::Http`] with a sanitized body so nothing raw reaches a page.

use super::{
    ResetPasswordRequest, ResetPasswordResponse, TransportError, VerificationClient,
    VerifyEmailRequest, VerifyEmailResponse, VerifyForgotPasswordTokenRequest,
    VerifyForgotPasswordTokenResponse,
};
use crate::{cli::globals::GlobalArgs, APP_USER_AGENT};
use anyhow::{anyhow, Context, Result};
use reqwest::{header::AUTHORIZATION, Client};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

/// Maximum number of error body characters surfaced to a page.
const MAX_ERROR_CHARS: usize = 200;

/// Error bodies are read up to this many bytes; the rest is dropped unread.
const MAX_ERROR_BODY_BYTES: usize = 8 * 1024;

const UNREACHABLE: &str = "Unable to reach the server. Please try again.";
const TIMED_OUT: &str = "Request timed out. Please try again.";
const UNREADABLE: &str = "The server sent an unreadable response.";

const VERIFY_FORGOT_PASSWORD_TOKEN: &str = "/v1/verify_forgot_password_token";
const VERIFY_EMAIL: &str = "/v1/verify_email";
const RESET_PASSWORD: &str = "/v1/reset_password";

#[derive(Debug, Clone)]
pub struct HttpVerificationClient {
    client: Client,
    base_url: String,
    api_token: SecretString,
}

impl HttpVerificationClient {
    /// Build the process-wide client. `timeout` of `None` leaves requests unbounded.
    ///
    /// # Errors
    /// Returns an error if the API URL is not an absolute http(s) URL or the
    /// underlying HTTP client cannot be built.
    pub fn new(globals: &GlobalArgs, timeout: Option<Duration>) -> Result<Self> {
        let parsed = Url::parse(&globals.api_url)
            .with_context(|| format!("Invalid API URL: {}", globals.api_url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(anyhow!(
                "Error parsing URL: unsupported scheme {}",
                parsed.scheme()
            ));
        }

        let mut builder = Client::builder().user_agent(APP_USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: globals.api_url.clone(),
            api_token: globals.api_token.clone(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[instrument(skip(self, body), fields(api = %self.base_url))]
    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, TransportError> {
        let url = build_url_with_base(&self.base_url, path);

        let mut request = self.client.post(&url).json(body);
        let token = self.api_token.expose_secret();
        if !token.is_empty() {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let mut response = request.send().await.map_err(map_request_error)?;
        let status = response.status();

        if !status.is_success() {
            warn!("{} - {}", url, status);
            let text = read_capped(&mut response, MAX_ERROR_BODY_BYTES)
                .await
                .map_err(map_request_error)?;
            let message = sanitize_body(&text);
            let message = if message.is_empty() {
                status.canonical_reason().unwrap_or_default().to_string()
            } else {
                message
            };
            return Err(TransportError::Http {
                status: status.as_u16(),
                message,
            });
        }

        debug!("{} - {}", url, status);

        let text = response.text().await.map_err(map_request_error)?;

        // An empty body is the JSON mapping of an empty message.
        let text = if text.trim().is_empty() {
            "{}"
        } else {
            text.as_str()
        };
        serde_json::from_str(text).map_err(|err| {
            warn!("{} - failed to decode response: {}", url, err);
            TransportError::Decode(UNREADABLE.to_string())
        })
    }
}

impl VerificationClient for HttpVerificationClient {
    async fn verify_forgot_password_token(
        &self,
        request: VerifyForgotPasswordTokenRequest,
    ) -> Result<VerifyForgotPasswordTokenResponse, TransportError> {
        self.post(VERIFY_FORGOT_PASSWORD_TOKEN, &request).await
    }

    async fn verify_email(
        &self,
        request: VerifyEmailRequest,
    ) -> Result<VerifyEmailResponse, TransportError> {
        self.post(VERIFY_EMAIL, &request).await
    }

    async fn reset_password(
        &self,
        request: ResetPasswordRequest,
    ) -> Result<ResetPasswordResponse, TransportError> {
        let body = json!({
            "userId": request.user_id,
            "token": request.token,
            "newPassword": request.new_password.expose_secret(),
        });
        self.post(RESET_PASSWORD, &body).await
    }
}

/// Builds a URL from an explicit base URL and the provided path.
fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    format!("{}/{}", base, path.trim().trim_start_matches('/'))
}

/// Maps network errors into transport errors with timeout detection.
///
/// The reqwest diagnostic names the API URL, so it only goes to the log.
fn map_request_error(err: reqwest::Error) -> TransportError {
    warn!("verification API request failed: {err}");
    if err.is_timeout() {
        TransportError::Timeout(TIMED_OUT.to_string())
    } else if err.is_decode() {
        TransportError::Decode(UNREADABLE.to_string())
    } else {
        TransportError::Network(UNREACHABLE.to_string())
    }
}

/// Read at most `limit` bytes of the body as lossy UTF-8.
async fn read_capped(response: &mut reqwest::Response, limit: usize) -> reqwest::Result<String> {
    let mut body = Vec::new();
    while body.len() < limit {
        match response.chunk().await? {
            Some(chunk) => {
                let take = chunk.len().min(limit - body.len());
                body.extend_from_slice(&chunk[..take]);
            }
            None => break,
        }
    }
    Ok(String::from_utf8_lossy(&body).into_owned())
}

/// Prefer the API's own `message` field, fall back to the trimmed body text.
fn sanitize_body(body: &str) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|value| {
        value
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
    });
    let text = from_json.unwrap_or_else(|| body.to_string());
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() > MAX_ERROR_CHARS {
        let truncated: String = collapsed.chars().take(MAX_ERROR_CHARS).collect();
        format!("{truncated}...")
    } else {
        collapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn globals(url: &str) -> GlobalArgs {
        GlobalArgs::new(url.to_string())
    }

    #[test]
    fn build_url_joins_slashes_once() {
        assert_eq!(
            build_url_with_base("https://api.snowpro.app/", "/v1/verify_email"),
            "https://api.snowpro.app/v1/verify_email"
        );
        assert_eq!(
            build_url_with_base("https://api.snowpro.app/rpc", "v1/reset_password"),
            "https://api.snowpro.app/rpc/v1/reset_password"
        );
    }

    #[test]
    fn sanitize_body_prefers_message_field() {
        assert_eq!(
            sanitize_body(r#"{"code":5,"message":"token expired"}"#),
            "token expired"
        );
        assert_eq!(sanitize_body("  bad\n gateway "), "bad gateway");
    }

    #[test]
    fn sanitize_body_truncates_long_bodies() {
        let body = "x".repeat(500);
        let sanitized = sanitize_body(&body);
        assert_eq!(sanitized.chars().count(), MAX_ERROR_CHARS + 3);
        assert!(sanitized.ends_with("..."));
    }

    #[test]
    fn new_rejects_non_http_urls() {
        assert!(HttpVerificationClient::new(&globals("ftp://api.snowpro.app"), None).is_err());
        assert!(HttpVerificationClient::new(&globals("not a url"), None).is_err());
        assert!(HttpVerificationClient::new(
            &globals("https://api.snowpro.app"),
            Some(Duration::from_secs(10))
        )
        .is_ok());
    }
}
