/*
 * Responsibility
 * - tracing / panic hook setup
 * - Config -> process-wide state (token codec, access-rule table) -> Router
 * - Layer order (outermost first): http (request id, trace, limits), CORS,
 *   security headers, request gate, handlers
 * - axum::serve()
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::{self, access_rules};
use crate::config::Config;
use crate::middleware::{auth::gate, cors, http, security_headers};
use crate::services::auth::build_resolver;
use crate::state::AppState;

fn init_tracing() {
    // RUST_LOG=info,hotel_gate=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development: crash loudly. Production: default hook, keep serving.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    let state = build_state(&config)?;
    tracing::info!(
        env = ?config.app_env,
        addr = %config.addr,
        rules = state.policy.rules().len(),
        "starting hotel API gate"
    );

    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("bind {}", config.addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_state(config: &Config) -> Result<AppState> {
    let resolver = build_resolver(config);
    let policy = access_rules::policy_table().context("compile access rules")?;

    Ok(AppState::new(resolver, Arc::new(policy)))
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    wrap(api::routes(), state, config)
}

fn wrap(routes: Router<AppState>, state: AppState, config: &Config) -> Router {
    let router = gate::apply(routes, state.clone()).with_state(state);
    let router = security_headers::apply(router);
    let router = cors::apply(router, config);
    http::apply(router, config)
}
