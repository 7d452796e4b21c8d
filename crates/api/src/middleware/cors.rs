use axum::http::Method;
use tower_http::cors::{Any, CorsLayer};

/// Build the CORS layer: any origin, but only the verbs the API serves.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_headers(Any)
}
