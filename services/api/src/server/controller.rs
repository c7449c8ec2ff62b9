use super::open_api;
use crate::{
    config::app_config,
    modules::{diagnostic::analyzer::DtcTable, diagnostic, suspension},
    services::s3::S3,
};
use axum::{body::Body, routing::get, Router};
use http::{header, HeaderValue, Method, Request, StatusCode};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

/// The main application state, this is cloned for every HTTP
/// request and thus its fields should contain types that are cheap
/// to clone.
#[derive(Clone)]
pub struct AppState {
    pub s3: S3,
    pub db: DatabaseConnection,

    /// code descriptions and recommendations, loaded once on startup
    pub dtc: Arc<DtcTable>,
}

/// Creates the main axum router/controller to be served over https
pub fn new(db: DatabaseConnection, s3: S3, dtc: DtcTable) -> Router {
    let state = AppState {
        s3,
        db,
        dtc: Arc::new(dtc),
    };

    // URL.to_string for some reason adds a trailing slash
    // we need to remove it to avoid cors errors
    let frontend_url = app_config().frontend_url.to_string();
    let frontend_origin = frontend_url.trim_end_matches('/');

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_origin(
            frontend_origin
                .parse::<HeaderValue>()
                .expect("failed to parse CORS allowed origins"),
        )
        .allow_credentials(true)
        .allow_headers([header::ACCEPT, header::CONTENT_TYPE]);

    let tracing_layer = TraceLayer::new_for_http()
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!("request: {} {}", request.method(), request.uri().path())
        })
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let global_middlewares = ServiceBuilder::new().layer(tracing_layer).layer(cors);

    Router::new()
        .merge(open_api::create_openapi_router())
        .route("/healthcheck", get(healthcheck))
        .nest("/diagnostic", diagnostic::routes::create_router(state.clone()))
        .nest("/suspension", suspension::routes::create_router(state.clone()))
        .layer(global_middlewares)
        .with_state(state)
}

#[utoipa::path(
    get,
    tag = "meta",
    path = "/healthcheck",
    responses((status = OK)),
)]
pub async fn healthcheck() -> StatusCode {
    StatusCode::OK
}
