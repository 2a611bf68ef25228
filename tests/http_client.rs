//! `HttpVerificationClient` against an in-process fake of the verification API.

use anyhow::Result;
use axum::{
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use secrecy::SecretString;
use serde_json::{json, Value};
use snowpro::{
    cli::globals::GlobalArgs,
    client::{
        HttpVerificationClient, ResetPasswordRequest, TransportError, VerificationClient,
        VerifyEmailRequest, VerifyForgotPasswordTokenRequest,
    },
    flow::{
        email::EmailVerification, FailureCause, FlowInstance, NavigationContext,
        VerificationOutcome,
    },
    locale::Locale,
};
use std::{net::SocketAddr, time::Duration};
use tokio::net::TcpListener;

async fn verify_token(headers: HeaderMap, Json(body): Json<Value>) -> impl IntoResponse {
    if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some("Bearer api-secret") {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "missing token"})));
    }
    if body == json!({"token": "tok123", "userId": 42}) {
        (
            StatusCode::OK,
            Json(json!({"success": true, "shortLivedToken": "short-abc"})),
        )
    } else {
        (
            StatusCode::OK,
            Json(json!({"success": false, "message": "token expired"})),
        )
    }
}

async fn verify_email(Json(body): Json<Value>) -> impl IntoResponse {
    if body["emailId"] == 7 && body["secretCode"] == "xyz" {
        (StatusCode::OK, Json(json!({"success": true})))
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"code": 13, "message": "database unavailable"})),
        )
    }
}

async fn reset_password(Json(body): Json<Value>) -> impl IntoResponse {
    if body == json!({"userId": 42, "token": "short-abc", "newPassword": "Abcdef1"}) {
        (StatusCode::OK, String::new())
    } else {
        (StatusCode::BAD_REQUEST, "token\n already   used".to_string())
    }
}

async fn slow() -> impl IntoResponse {
    tokio::time::sleep(Duration::from_secs(5)).await;
    Json(json!({"success": true}))
}

async fn huge_error() -> impl IntoResponse {
    (StatusCode::BAD_GATEWAY, "e".repeat(4 * 1024 * 1024))
}

async fn garbled() -> impl IntoResponse {
    (StatusCode::OK, "{\"success\": tru")
}

async fn spawn_api() -> Result<SocketAddr> {
    let app = Router::new()
        .route("/v1/verify_forgot_password_token", post(verify_token))
        .route("/v1/verify_email", post(verify_email))
        .route("/v1/reset_password", post(reset_password))
        .route("/slow/v1/verify_email", post(slow))
        .route("/huge/v1/verify_email", post(huge_error))
        .route("/garbled/v1/verify_email", post(garbled));

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app.into_make_service()).await;
    });
    Ok(addr)
}

fn client(base: &str, timeout: Option<Duration>) -> Result<HttpVerificationClient> {
    let mut globals = GlobalArgs::new(base.to_string());
    globals.set_token(SecretString::from("api-secret"));
    HttpVerificationClient::new(&globals, timeout)
}

#[tokio::test]
async fn verify_forgot_password_token_round_trip() -> Result<()> {
    let addr = spawn_api().await?;
    let client = client(&format!("http://{addr}/"), Some(Duration::from_secs(5)))?;

    let response = client
        .verify_forgot_password_token(VerifyForgotPasswordTokenRequest {
            token: "tok123".to_string(),
            user_id: 42,
        })
        .await?;
    assert!(response.success);
    assert_eq!(response.short_lived_token.as_deref(), Some("short-abc"));

    let response = client
        .verify_forgot_password_token(VerifyForgotPasswordTokenRequest {
            token: "other".to_string(),
            user_id: 42,
        })
        .await?;
    assert!(!response.success);
    assert_eq!(response.message.as_deref(), Some("token expired"));
    Ok(())
}

#[tokio::test]
async fn missing_bearer_token_is_a_transport_error() -> Result<()> {
    let addr = spawn_api().await?;
    let client = HttpVerificationClient::new(&GlobalArgs::new(format!("http://{addr}")), None)?;

    let err = client
        .verify_forgot_password_token(VerifyForgotPasswordTokenRequest {
            token: "tok123".to_string(),
            user_id: 42,
        })
        .await
        .unwrap_err();
    assert_eq!(
        err,
        TransportError::Http {
            status: 401,
            message: "missing token".to_string()
        }
    );
    Ok(())
}

#[tokio::test]
async fn verify_email_server_error_uses_message_field() -> Result<()> {
    let addr = spawn_api().await?;
    let client = client(&format!("http://{addr}"), None)?;

    let response = client
        .verify_email(VerifyEmailRequest {
            email_id: 7,
            secret_code: "xyz".to_string(),
        })
        .await?;
    assert!(response.success);

    let err = client
        .verify_email(VerifyEmailRequest {
            email_id: 8,
            secret_code: "xyz".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.message(), Some("database unavailable"));
    Ok(())
}

#[tokio::test]
async fn reset_password_accepts_empty_body() -> Result<()> {
    let addr = spawn_api().await?;
    let client = client(&format!("http://{addr}"), None)?;

    client
        .reset_password(ResetPasswordRequest {
            user_id: 42,
            token: "short-abc".to_string(),
            new_password: SecretString::from("Abcdef1"),
        })
        .await?;

    let err = client
        .reset_password(ResetPasswordRequest {
            user_id: 42,
            token: "stale".to_string(),
            new_password: SecretString::from("Abcdef1"),
        })
        .await
        .unwrap_err();
    assert_eq!(
        err,
        TransportError::Http {
            status: 400,
            message: "token already used".to_string()
        }
    );
    Ok(())
}

#[tokio::test]
async fn slow_api_times_out() -> Result<()> {
    let addr = spawn_api().await?;
    let client = client(&format!("http://{addr}/slow"), Some(Duration::from_millis(200)))?;

    let err = client
        .verify_email(VerifyEmailRequest {
            email_id: 7,
            secret_code: "xyz".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Timeout(_)));
    Ok(())
}

#[tokio::test]
async fn unreachable_api_is_a_network_error() -> Result<()> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    drop(listener);

    let client = client(&format!("http://{addr}"), Some(Duration::from_secs(2)))?;
    let err = client
        .verify_email(VerifyEmailRequest {
            email_id: 7,
            secret_code: "xyz".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Network(_)));

    let message = err.message().unwrap_or_default();
    assert_eq!(message, "Unable to reach the server. Please try again.");
    assert!(!message.contains("127.0.0.1"));
    assert!(!message.contains("url ("));
    Ok(())
}

#[tokio::test]
async fn oversized_error_body_is_truncated() -> Result<()> {
    let addr = spawn_api().await?;
    let client = client(&format!("http://{addr}/huge"), Some(Duration::from_secs(5)))?;

    let err = client
        .verify_email(VerifyEmailRequest {
            email_id: 7,
            secret_code: "xyz".to_string(),
        })
        .await
        .unwrap_err();
    match err {
        TransportError::Http { status, message } => {
            assert_eq!(status, 502);
            assert_eq!(message.chars().count(), 203);
            assert!(message.ends_with("..."));
        }
        other => panic!("expected http error, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn undecodable_body_hides_parser_detail() -> Result<()> {
    let addr = spawn_api().await?;
    let client = client(&format!("http://{addr}/garbled"), None)?;

    let err = client
        .verify_email(VerifyEmailRequest {
            email_id: 7,
            secret_code: "xyz".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(
        err,
        TransportError::Decode("The server sent an unreadable response.".to_string())
    );
    Ok(())
}

#[tokio::test]
async fn unreachable_api_message_does_not_leak_the_url() -> Result<()> {
    let client = client(
        "http://internal-api.svc.cluster.local:1",
        Some(Duration::from_secs(2)),
    )?;
    let context: NavigationContext = [("email_id", "7"), ("secret_code", "xyz")]
        .into_iter()
        .collect();

    let outcome = FlowInstance::mount(EmailVerification::new(Locale::En), &context)
        .run(&client)
        .await;
    match outcome {
        VerificationOutcome::Failure(failure) => {
            assert_eq!(failure.cause, FailureCause::Transport);
            assert!(!failure.message.contains("internal-api"));
            assert!(!failure.message.contains("/v1/verify_email"));
        }
        other => panic!("expected failure, got {other:?}"),
    }
    Ok(())
}
