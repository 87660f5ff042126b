//! Request gate: bearer token → Principal → access rule → allow / reject.
//!
//! Runs once per request, before any handler:
//! - reject paths carrying `.` or `..` segments with 400
//! - resolve the principal (never fails; bad tokens become anonymous)
//! - pick the first matching rule from the `PolicyTable`
//! - on Allow, put the `Principal` into request extensions and continue
//! - on Deny, answer 401 (no identity) or 403 (identity lacks role) and stop

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::services::authz::{Decision, has_dot_segment};
use crate::state::AppState;

/// Wrap every route (and the fallback) of `router` with the gate.
///
/// Apply after all routes and the fallback are registered.
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, gate_middleware))
}

async fn gate_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    if has_dot_segment(req.uri().path()) {
        tracing::info!(
            method = %req.method(),
            path = req.uri().path(),
            "request rejected: dot segment in path"
        );
        return Err(AppError::bad_request(
            "INVALID_PATH",
            "dot segments are not allowed in the request path",
        ));
    }

    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let principal = state.resolver.resolve(authorization);

    let rule = state.policy.matching(req.method(), req.uri().path());

    match rule.decide(&principal) {
        Decision::Allow => {
            tracing::debug!(
                method = %req.method(),
                path = req.uri().path(),
                rule = %rule,
                subject = principal.subject.as_deref().unwrap_or("-"),
                "request allowed"
            );
        }
        Decision::Deny(reason) => {
            tracing::info!(
                method = %req.method(),
                path = req.uri().path(),
                rule = %rule,
                subject = principal.subject.as_deref().unwrap_or("-"),
                ?reason,
                "request denied"
            );
            return Err(reason.into());
        }
    }

    // read by the CurrentPrincipal extractor
    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}
