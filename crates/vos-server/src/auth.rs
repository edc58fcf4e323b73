use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use vos_auth::RequestMetadata;

use crate::error::ApiError;
use crate::state::AppState;

/// Authentication middleware for the object routes.
///
/// Removes every `authorization` header from the request before anything
/// else, then authenticates the credential it carried. On success the
/// [`vos_auth::AuthenticatedContext`] is placed in the request extensions
/// for the handler; on failure the request never reaches a handler.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let metadata = take_metadata(&mut request);
    let ctx = state.authenticator.authenticate(metadata).await?;
    request.extensions_mut().insert(ctx);
    Ok(next.run(request).await)
}

/// Moves the credential out of the request and copies the remaining
/// headers into [`RequestMetadata`].
fn take_metadata(request: &mut Request) -> RequestMetadata {
    let headers = request.headers_mut();
    let mut metadata: RequestMetadata = headers
        .iter()
        .filter(|(name, _)| *name != AUTHORIZATION)
        .filter_map(|(name, value)| Some((name.as_str().to_string(), value.to_str().ok()?.to_string())))
        .collect();

    let credentials: Vec<String> = headers
        .get_all(AUTHORIZATION)
        .iter()
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .collect();
    headers.remove(AUTHORIZATION);
    for value in credentials {
        metadata.append(AUTHORIZATION.as_str(), value);
    }
    metadata
}
