use super::{failure_status, locale, page};
use crate::client::VerificationClient;
use crate::flow::{
    platform::{DeviceRedirect, RedirectDecision},
    FailureCause, NavigationContext,
};
use crate::snowpro::{render, AppState};
use axum::{
    extract::{Extension, Path},
    http::{header::USER_AGENT, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use minijinja::context;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Deep link for an instructor profile.
///
/// Phones get a `303` to their store so the link itself stays out of history;
/// every other device gets a page with both store links.
#[instrument(skip_all)]
pub async fn instructor<C: VerificationClient + 'static>(
    Extension(state): Extension<Arc<AppState<C>>>,
    headers: HeaderMap,
    id: Option<Path<String>>,
) -> Response {
    let locale = locale(&headers);
    let user_agent = headers.get(USER_AGENT).and_then(|value| value.to_str().ok());

    let mut context = NavigationContext::default();
    if let Some(Path(id)) = id {
        context = context.with_segment("id", id);
    }

    let (status, instructor_id, error) =
        match DeviceRedirect::resolve(&context, user_agent, &state.destinations) {
            Ok(DeviceRedirect {
                decision: RedirectDecision::Navigate(url),
                platform,
                instructor_id,
            }) => {
                info!(?platform, instructor_id = %instructor_id, "redirecting to app store");
                return Redirect::to(url.as_str()).into_response();
            }
            Ok(DeviceRedirect {
                instructor_id,
                platform,
                ..
            }) => {
                debug!(?platform, "no store for platform, offering links");
                (StatusCode::OK, Some(instructor_id), None)
            }
            Err(err) => {
                debug!("invalid instructor link: {err}");
                (
                    failure_status(FailureCause::Validation),
                    None,
                    Some(locale.strings().missing_instructor),
                )
            }
        };

    page(
        status,
        state.renderer.render(
            render::INSTRUCTOR,
            locale,
            context! {
                instructor_id => instructor_id,
                ios_url => state.destinations.ios.as_str(),
                android_url => state.destinations.android.as_str(),
                error => error,
            },
        ),
    )
}
