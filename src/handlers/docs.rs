use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use crate::handlers::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::generate::generate,
    ),
    components(
        schemas(
            crate::models::GenerateBody,
            crate::models::GenerateResponse,
            crate::models::ErrorResponse,
            crate::models::Style,
        )
    ),
    tags(
        (name = "generation", description = "Thumbnail generation")
    ),
    info(
        title = "Thumbnail Gateway API",
        version = "0.1.0",
        description = "Rate-limited proxy that turns a video title into an AI-generated thumbnail"
    )
)]
pub struct ApiDoc;

pub fn create_docs_router() -> Router<AppState> {
    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
