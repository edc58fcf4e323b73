use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, State};
use axum::response::Json;
use vos_auth::AuthenticatedContext;
use vos_protocol::{
    DeleteRequest, DeleteResponse, HealthResponse, HistoryRequest, HistoryResponse, InfoResponse,
    ListRequest, ListResponse, ReadRequest, ReadResponse, WriteRequest, WriteResponse,
    PROTOCOL_VERSION,
};

use crate::error::ApiError;
use crate::state::AppState;

type Payload<T> = Result<Json<T>, JsonRejection>;
type ApiResult<T> = Result<Json<T>, ApiError>;

/// Health check handler.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// Info handler.
pub async fn info_handler(State(state): State<AppState>) -> Json<InfoResponse> {
    Json(InfoResponse {
        name: "vos-server".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        protocol_version: PROTOCOL_VERSION,
        storage: state.storage.into(),
        summary_kinds: state
            .service
            .summaries()
            .kinds()
            .into_iter()
            .map(String::from)
            .collect(),
    })
}

pub async fn read_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthenticatedContext>,
    payload: Payload<ReadRequest>,
) -> ApiResult<ReadResponse> {
    let Json(req) = payload?;
    Ok(Json(state.service.read(&ctx, req).await?))
}

pub async fn write_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthenticatedContext>,
    payload: Payload<WriteRequest>,
) -> ApiResult<WriteResponse> {
    let Json(req) = payload?;
    Ok(Json(state.service.write(&ctx, req).await?))
}

pub async fn delete_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthenticatedContext>,
    payload: Payload<DeleteRequest>,
) -> ApiResult<DeleteResponse> {
    let Json(req) = payload?;
    Ok(Json(state.service.delete(&ctx, req).await?))
}

pub async fn list_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthenticatedContext>,
    payload: Payload<ListRequest>,
) -> ApiResult<ListResponse> {
    let Json(req) = payload?;
    Ok(Json(state.service.list(&ctx, req).await?))
}

pub async fn history_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthenticatedContext>,
    payload: Payload<HistoryRequest>,
) -> ApiResult<HistoryResponse> {
    let Json(req) = payload?;
    Ok(Json(state.service.history(&ctx, req).await?))
}
