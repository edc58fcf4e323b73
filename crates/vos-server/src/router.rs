use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{middleware, Router};
use tower_http::trace::TraceLayer;
use vos_protocol::endpoints;

use crate::auth;
use crate::handler;
use crate::state::AppState;

/// Build the axum router with all object store endpoints.
///
/// Health and info are open; every `/v1/object/*` route sits behind the
/// authentication middleware.
pub fn build_router(state: AppState, max_request_bytes: usize) -> Router {
    let objects = Router::new()
        .route(endpoints::OBJECT_READ, post(handler::read_handler))
        .route(endpoints::OBJECT_WRITE, post(handler::write_handler))
        .route(endpoints::OBJECT_DELETE, post(handler::delete_handler))
        .route(endpoints::OBJECT_LIST, post(handler::list_handler))
        .route(endpoints::OBJECT_HISTORY, post(handler::history_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::authenticate));

    Router::new()
        .route(endpoints::HEALTH, get(handler::health_handler))
        .route(endpoints::INFO, get(handler::info_handler))
        .merge(objects)
        .layer(DefaultBodyLimit::max(max_request_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
