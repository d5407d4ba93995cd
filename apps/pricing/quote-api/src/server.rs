//! Router assembly and server lifecycle

use axum::{
    http::{HeaderValue, Method, StatusCode, header},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use core_config::{server::ServerConfig, AppInfo, Environment};
use serde::Serialize;
use serde_json::json;
use std::io;
use std::time::Duration;
use tokio::signal;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{info, warn, Level};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub name: &'static str,
    pub version: &'static str,
}

/// `/health` liveness endpoint reporting the app name and version
pub fn health_router(app: AppInfo) -> Router {
    Router::new().route(
        "/health",
        get(move || async move {
            Json(HealthResponse {
                status: "ok",
                name: app.name,
                version: app.version,
            })
        }),
    )
}

/// Fallback for unknown routes, in the same shape as domain errors
pub async fn not_found() -> Response {
    let body = Json(json!({
        "error": "The requested resource was not found",
        "kind": "not_found",
        "code": StatusCode::NOT_FOUND.as_u16()
    }));

    (StatusCode::NOT_FOUND, body).into_response()
}

/// CORS policy from `CORS_ALLOWED_ORIGIN`.
///
/// Without a configured list, development allows any origin and production
/// adds no CORS headers at all.
fn cors_layer(config: &ServerConfig, environment: &Environment) -> io::Result<Option<CorsLayer>> {
    let Some(origins) = &config.cors_origins else {
        if environment.is_production() {
            warn!("CORS_ALLOWED_ORIGIN not set, cross-origin requests will be refused");
            return Ok(None);
        }
        return Ok(Some(CorsLayer::permissive()));
    };

    let allowed_origins = origins
        .iter()
        .map(|s| s.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid CORS_ALLOWED_ORIGIN value: {}", e),
            )
        })?;

    info!("CORS configured with allowed origins: {}", origins.join(","));

    Ok(Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed_origins))
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
            .max_age(Duration::from_secs(3600)),
    ))
}

/// Wrap the API routes with docs, metrics and the common middleware.
///
/// Routes are nested under `/api`; Swagger UI is served at `/swagger-ui`
/// and Prometheus metrics at `/metrics`.
pub fn create_router<T>(
    apis: Router,
    config: &ServerConfig,
    environment: &Environment,
) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", T::openapi()))
        .nest("/api", apis)
        .route("/metrics", get(observability::metrics_handler))
        .fallback(not_found)
        .layer(middleware::from_fn(observability::metrics_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    let router = match cors_layer(config, environment)? {
        Some(cors) => router.layer(cors),
        None => router,
    };

    // gzip, br, deflate, zstd based on Accept-Encoding
    Ok(router.layer(CompressionLayer::new()))
}

/// Serve `router` until SIGINT or SIGTERM, then drain in-flight requests.
pub async fn serve(router: Router, config: &ServerConfig) -> io::Result<()> {
    let listener = tokio::net::TcpListener::bind(config.address()).await?;

    info!("Server starting on {}", listener.local_addr()?);
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use domain_pricing::{handlers, QuoteService};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    fn app(environment: Environment) -> Router {
        let apis = Router::new().nest("/pricing", handlers::router(QuoteService::default()));
        create_router::<crate::openapi::ApiDoc>(apis, &ServerConfig::default(), &environment)
            .unwrap()
            .merge(health_router(AppInfo {
                name: "quote_api",
                version: "0.0.0",
            }))
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(app(Environment::Development), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["name"], "quote_api");
    }

    #[tokio::test]
    async fn test_api_is_nested_under_pricing() {
        let (status, body) = get_json(app(Environment::Development), "/api/pricing/tariffs").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["compliance_revenue_floor"], 5000.0);
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let (status, body) = get_json(app(Environment::Production), "/api/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["kind"], "not_found");
    }

    #[tokio::test]
    async fn test_openapi_document_lists_quote_paths() {
        let (status, body) = get_json(app(Environment::Development), "/api-docs/openapi.json").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"].get("/pricing/quotes").is_some());
        assert!(body["paths"].get("/pricing/documents/summary").is_some());
    }

    #[test]
    fn test_invalid_cors_origin_is_rejected() {
        let config = ServerConfig::default().with_cors_origins(vec!["bad\norigin".to_string()]);
        assert!(cors_layer(&config, &Environment::Production).is_err());
    }

    #[test]
    fn test_production_without_origins_has_no_cors() {
        let layer = cors_layer(&ServerConfig::default(), &Environment::Production).unwrap();
        assert!(layer.is_none());
    }
}
