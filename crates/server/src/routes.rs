pub mod auth;
pub mod tasks;

use axum::{
    middleware,
    response::Redirect,
    routing::{get, patch, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::{middleware::track_latency, openapi::ApiDoc};
use auth::ServerState;

#[utoipa::path(get, path = "/ping", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn ping() -> Json<Health> {
    Json(Health::ok())
}

/// `/` has nothing of its own; send browsers to the interactive docs.
pub async fn root() -> Redirect {
    Redirect::temporary("/docs")
}

/// Build the full application router: open reads, token-gated writes, docs.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    // Public routes (health + reads)
    let public = Router::new()
        .route("/", get(root))
        .route("/ping", get(ping))
        .route("/tasks", get(tasks::list_tasks))
        .route("/tasks/:id", get(tasks::get_task));

    // Mutating routes behind the shared bearer token
    let protected = Router::new()
        .route("/tasks", post(tasks::create_task))
        .route("/tasks/:id", patch(tasks::update_task).delete(tasks::delete_task))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer_token_state,
        ));

    let docs = SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi());

    // Compose; the public method routers are merged last so unmatched methods answer 405, not 401
    protected
        .merge(public)
        .merge(docs)
        .layer(middleware::from_fn_with_state(state.clone(), track_latency))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // completion lines come from `track_latency`
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
        .with_state(state)
}
