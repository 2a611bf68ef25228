use super::{locale, outcome_status, page};
use crate::client::VerificationClient;
use crate::flow::{email::EmailVerification, FlowInstance, NavigationContext};
use crate::snowpro::{
    render::{self, OutcomeView},
    AppState,
};
use axum::{
    extract::{Extension, Query},
    http::HeaderMap,
    response::Response,
};
use minijinja::context;
use std::{collections::HashMap, sync::Arc};
use tracing::instrument;

/// Email verification link: `?email_id=&secret_code=`.
#[instrument(skip_all)]
pub async fn verify_email<C: VerificationClient + 'static>(
    Extension(state): Extension<Arc<AppState<C>>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let locale = locale(&headers);
    let instance = FlowInstance::mount(
        EmailVerification::new(locale),
        &NavigationContext::new(query),
    );

    let outcome = instance.run(&state.client).await;

    let response = page(
        outcome_status(&outcome),
        state.renderer.render(
            render::VERIFY_EMAIL,
            locale,
            context! { outcome => OutcomeView::from(&outcome) },
        ),
    );

    instance.teardown();

    response
}
