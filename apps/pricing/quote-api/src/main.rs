//! Quote API
//!
//! Serves the supplier screening calculator over HTTP under
//! `/api/pricing`, with Swagger UI, Prometheus metrics and a health check.

use core_config::tracing::{init_tracing, install_color_eyre};
use domain_pricing::{handlers, QuoteService};
use tracing::info;

mod config;
mod openapi;
mod server;

use config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first so every later failure is reported with spans
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    observability::init_metrics()
        .map_err(|e| eyre::eyre!("Failed to install metrics recorder: {}", e))?;

    info!(
        margin_convention = %config.calculator.margin_convention,
        strict_regions = config.calculator.strict_regions,
        "Quote calculator configured"
    );

    let service = QuoteService::new(config.calculator);
    let api_routes = axum::Router::new().nest("/pricing", handlers::router(service));

    let app = server::create_router::<openapi::ApiDoc>(
        api_routes,
        &config.server,
        &config.environment,
    )?
    .merge(server::health_router(config.app));

    server::serve(app, &config.server)
        .await
        .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Quote API shutdown complete");
    Ok(())
}
