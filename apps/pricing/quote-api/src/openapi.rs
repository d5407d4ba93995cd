use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Quote API",
        version = "0.1.0",
        description = "Minimum price calculation for supplier screening projects"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/pricing", api = domain_pricing::handlers::ApiDoc)
    )
)]
pub struct ApiDoc;
