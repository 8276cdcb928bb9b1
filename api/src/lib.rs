pub mod app;
pub mod dto;
pub mod handlers;
pub mod i18n;
pub mod logging;
pub mod middleware;
pub mod routes;

use actix_web::{web, HttpServer};
use anyhow::Context;

use cb_shared::config::AppConfig;
use cb_shared::types::RequestContext;

use crate::app::{create_app, AppState};
use crate::handlers::EnvelopeBuilder;
use crate::routes::EmployeeDirectory;

/// Load the catalog, then serve until shutdown
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let catalog = i18n::load_catalog(&config.i18n).context("failed to load message bundle")?;
    let envelope = EnvelopeBuilder::new(catalog, config.envelope.clone());
    let state = web::Data::new(AppState::new(envelope, EmployeeDirectory::seeded()));
    let defaults = RequestContext::new(config.i18n.default_locale.clone(), config.i18n.default_time_zone.clone());

    let bind_address = config.server.bind_address();
    tracing::info!(
        environment = %config.environment,
        address = %bind_address,
        locale = %defaults.locale(),
        time_zone = %defaults.time_zone(),
        custom_defaults = config.i18n.overrides_builtin_defaults(),
        "Starting Cometbid API server"
    );

    let mut server = HttpServer::new(move || create_app(state.clone(), defaults.clone()));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await
        .context("server terminated with an error")
}
