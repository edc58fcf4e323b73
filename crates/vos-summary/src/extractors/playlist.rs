use serde::Deserialize;
use vos_types::{ObjectReference, Summary};

use crate::error::ExtractError;
use crate::extractor::SummaryExtractor;

use super::parse_object;

const KIND: &str = "playlist";

/// Summarizes playlist JSON: name, interval, and the dashboards it cycles.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlaylistExtractor;

#[derive(Deserialize)]
struct PlaylistBody {
    name: String,
    interval: Option<String>,
    #[serde(default)]
    items: Vec<PlaylistItem>,
}

#[derive(Deserialize)]
struct PlaylistItem {
    #[serde(rename = "type")]
    item_type: String,
    value: String,
}

impl SummaryExtractor for PlaylistExtractor {
    fn kind(&self) -> &str {
        KIND
    }

    fn extract(&self, body: &[u8]) -> Result<Option<Summary>, ExtractError> {
        let playlist: PlaylistBody = parse_object(KIND, body)?;

        let mut summary = Summary::named(playlist.name)
            .with_field("item_count", playlist.items.len() as u64);
        if let Some(interval) = playlist.interval {
            summary = summary.with_field("interval", interval);
        }

        for item in playlist.items {
            if item.value.is_empty() {
                return Err(ExtractError::shape(
                    KIND,
                    format!("{} item has an empty value", item.item_type),
                ));
            }
            match item.item_type.as_str() {
                "dashboard_by_uid" => {
                    summary = summary.with_reference(ObjectReference::new("dashboard", item.value));
                }
                "dashboard_by_tag" => {
                    summary = summary.with_label(item.value, "");
                }
                // Legacy numeric ids do not resolve to a key.
                _ => {}
            }
        }
        Ok(Some(summary))
    }
}
