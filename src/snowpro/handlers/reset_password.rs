//! Forgot-password pages.
//!
//! `GET /reset-password?token=&user_id=` verifies the emailed link and, when it
//! holds, shows the new-password form carrying the short-lived token.
//! `POST /reset-password` submits that form.

use super::{locale, outcome_status, page};
use crate::client::VerificationClient;
use crate::flow::{
    reset::{PasswordResetSubmission, ResetTokenVerification},
    FlowInstance, NavigationContext, VerificationOutcome,
};
use crate::snowpro::{
    render::{self, OutcomeView, ResetForm},
    AppState,
};
use axum::{
    extract::{Extension, Form, Query},
    http::HeaderMap,
    response::Response,
};
use minijinja::context;
use std::{collections::HashMap, sync::Arc};
use tracing::instrument;

#[instrument(skip_all)]
pub async fn verify_token<C: VerificationClient + 'static>(
    Extension(state): Extension<Arc<AppState<C>>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let locale = locale(&headers);
    let instance = FlowInstance::mount(
        ResetTokenVerification::new(locale),
        &NavigationContext::new(query),
    );

    let outcome = instance.run(&state.client).await;

    let form = match &outcome {
        VerificationOutcome::Success(grant) => Some(ResetForm {
            user_id: grant.user_id.to_string(),
            token: grant.short_lived_token.clone(),
        }),
        VerificationOutcome::Pending | VerificationOutcome::Failure(_) => None,
    };

    let response = page(
        outcome_status(&outcome),
        state.renderer.render(
            render::RESET_PASSWORD,
            locale,
            context! {
                outcome => OutcomeView::from(&outcome),
                form => form,
            },
        ),
    );

    instance.teardown();

    response
}

#[instrument(skip_all)]
pub async fn submit<C: VerificationClient + 'static>(
    Extension(state): Extension<Arc<AppState<C>>>,
    headers: HeaderMap,
    form: Option<Form<HashMap<String, String>>>,
) -> Response {
    let locale = locale(&headers);
    let fields = form.map(|Form(fields)| fields).unwrap_or_default();

    // keep the form on screen for another attempt while the hidden fields are usable
    let retry_form = match (fields.get("user_id"), fields.get("token")) {
        (Some(user_id), Some(token)) if !user_id.trim().is_empty() && !token.trim().is_empty() => {
            Some(ResetForm {
                user_id: user_id.clone(),
                token: token.clone(),
            })
        }
        _ => None,
    };

    let instance = FlowInstance::mount(
        PasswordResetSubmission::new(locale),
        &NavigationContext::new(fields),
    );

    let outcome = instance.run(&state.client).await;

    let rendered = match &outcome {
        VerificationOutcome::Success(_) => {
            state
                .renderer
                .render(render::RESET_DONE, locale, context! {})
        }
        VerificationOutcome::Pending | VerificationOutcome::Failure(_) => state.renderer.render(
            render::RESET_PASSWORD,
            locale,
            context! {
                outcome => OutcomeView::from(&outcome),
                form => retry_form,
            },
        ),
    };

    let response = page(outcome_status(&outcome), rendered);

    instance.teardown();

    response
}
