use serde::Deserialize;
use vos_types::{ObjectReference, Summary};

use crate::error::ExtractError;
use crate::extractor::SummaryExtractor;

use super::parse_object;

const KIND: &str = "dashboard";

/// Summarizes dashboard JSON: title, tags, panel count, and the
/// datasources and panel plugins it depends on.
#[derive(Clone, Copy, Debug, Default)]
pub struct DashboardExtractor;

#[derive(Deserialize)]
struct DashboardBody {
    title: Option<String>,
    name: Option<String>,
    description: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(rename = "schemaVersion")]
    schema_version: Option<i64>,
    #[serde(default)]
    panels: Vec<Panel>,
}

#[derive(Deserialize)]
struct Panel {
    #[serde(rename = "type")]
    plugin: Option<String>,
    datasource: Option<DatasourceRef>,
    /// Children of a collapsed row.
    #[serde(default)]
    panels: Vec<Panel>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DatasourceRef {
    Uid { uid: String },
    Name(String),
    Other(serde_json::Value),
}

impl DatasourceRef {
    fn reference(&self) -> Option<ObjectReference> {
        let uid = match self {
            Self::Uid { uid } => uid,
            Self::Name(name) => name,
            Self::Other(_) => return None,
        };
        (!uid.is_empty()).then(|| ObjectReference::new("datasource", uid.clone()))
    }
}

/// Walk panels depth-first, returning the number of non-row panels.
fn collect(panels: &[Panel], mut summary: Summary) -> (Summary, u64) {
    let mut count = 0;
    for panel in panels {
        let is_row = panel.plugin.as_deref() == Some("row");
        if !is_row {
            count += 1;
        }
        if let Some(reference) = panel.datasource.as_ref().and_then(DatasourceRef::reference) {
            summary = summary.with_reference(reference);
        }
        if let Some(plugin) = panel.plugin.as_deref().filter(|p| !is_row && !p.is_empty()) {
            summary = summary.with_reference(ObjectReference::new("plugin", plugin));
        }
        let (next, nested) = collect(&panel.panels, summary);
        summary = next;
        count += nested;
    }
    (summary, count)
}

impl SummaryExtractor for DashboardExtractor {
    fn kind(&self) -> &str {
        KIND
    }

    fn extract(&self, body: &[u8]) -> Result<Option<Summary>, ExtractError> {
        let dash: DashboardBody = parse_object(KIND, body)?;

        let mut summary = Summary::named(dash.title.or(dash.name).unwrap_or_default());
        if let Some(description) = dash.description.filter(|d| !d.is_empty()) {
            summary = summary.with_description(description);
        }
        for tag in dash.tags.into_iter().filter(|t| !t.is_empty()) {
            summary = summary.with_label(tag, "");
        }
        if let Some(v) = dash.schema_version {
            summary = summary.with_field("schema_version", v);
        }

        let (summary, panel_count) = collect(&dash.panels, summary);
        Ok(Some(summary.with_field("panel_count", panel_count)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(json: &str) -> Summary {
        DashboardExtractor.extract(json.as_bytes()).unwrap().unwrap()
    }

    #[test]
    fn title_tags_and_schema_version() {
        let s = extract(
            r#"{"title":"Ops","description":"on-call view","tags":["prod","team-a"],"schemaVersion":36}"#,
        );
        assert_eq!(s.name, "Ops");
        assert_eq!(s.description.as_deref(), Some("on-call view"));
        assert_eq!(s.labels.get("prod").map(String::as_str), Some(""));
        assert!(s.labels.contains_key("team-a"));
        assert_eq!(s.fields["schema_version"], 36);
        assert_eq!(s.fields["panel_count"], 0);
    }

    #[test]
    fn name_falls_back_when_no_title() {
        assert_eq!(extract(r#"{"name":"John"}"#).name, "John");
        assert_eq!(extract(r#"{}"#).name, "");
    }

    #[test]
    fn panels_and_nested_rows_are_walked() {
        let s = extract(
            r#"{
                "title": "Nested",
                "panels": [
                    {"type": "timeseries", "datasource": {"type": "prometheus", "uid": "prom-1"}},
                    {"type": "row", "panels": [
                        {"type": "stat", "datasource": "legacy-ds"},
                        {"type": "timeseries", "datasource": {"uid": "prom-1"}}
                    ]},
                    {"type": "text", "datasource": {"type": "-- Mixed --"}}
                ]
            }"#,
        );
        assert_eq!(s.fields["panel_count"], 4);
        let refs: Vec<(&str, &str)> = s
            .references
            .iter()
            .map(|r| (r.kind.as_str(), r.uid.as_str()))
            .collect();
        assert_eq!(
            refs,
            vec![
                ("datasource", "legacy-ds"),
                ("datasource", "prom-1"),
                ("plugin", "stat"),
                ("plugin", "text"),
                ("plugin", "timeseries"),
            ]
        );
    }

    #[test]
    fn rejects_non_object_and_bad_json() {
        assert!(matches!(
            DashboardExtractor.extract(b"[1,2,3]"),
            Err(ExtractError::InvalidShape { .. })
        ));
        assert!(matches!(
            DashboardExtractor.extract(b"{not json"),
            Err(ExtractError::InvalidJson(_))
        ));
        assert!(DashboardExtractor.extract(br#"{"tags": "prod"}"#).is_err());
    }
}
