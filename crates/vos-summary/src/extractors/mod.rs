//! Built-in extractors.

pub mod dashboard;
pub mod playlist;

pub use dashboard::DashboardExtractor;
pub use playlist::PlaylistExtractor;

use serde::de::DeserializeOwned;

use crate::error::ExtractError;

/// Parse a JSON object body into `T`, rejecting non-object roots.
pub(crate) fn parse_object<T: DeserializeOwned>(kind: &str, body: &[u8]) -> Result<T, ExtractError> {
    let value: serde_json::Value = serde_json::from_slice(body)?;
    if !value.is_object() {
        return Err(ExtractError::shape(kind, "body must be a JSON object"));
    }
    Ok(serde_json::from_value(value)?)
}
