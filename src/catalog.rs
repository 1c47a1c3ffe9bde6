use std::path::Path;
use std::time::{Duration, Instant};

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::{CatalogConfig, CatalogSource};
use crate::logging::try_logger;
use crate::media::{sort_catalog, MediaRecord, SortPriorities};

const RECORD_ARRAY_KEYS: &[&str] = &["medias", "media", "items"];

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("catalog request returned {0}")]
    Status(StatusCode),
    #[error("catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// The loaded records, sorted once and never re-sorted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    records: Vec<MediaRecord>,
}

impl Catalog {
    pub fn new(mut records: Vec<MediaRecord>, priorities: &SortPriorities) -> Self {
        sort_catalog(&mut records, priorities);
        Self { records }
    }

    /// Parses a catalog document. A missing or non-array record field yields an
    /// empty catalog; only unparseable JSON is an error.
    pub fn from_json(raw: &str, priorities: &SortPriorities) -> Result<Self, CatalogError> {
        let document: Value = serde_json::from_str(raw)?;
        Ok(Self::new(records_from_document(&document), priorities))
    }

    pub fn records(&self) -> &[MediaRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn records_from_document(document: &Value) -> Vec<MediaRecord> {
    let items = match document {
        Value::Array(items) => Some(items),
        Value::Object(map) => RECORD_ARRAY_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array)),
        _ => None,
    };

    items
        .map(|items| items.iter().filter_map(MediaRecord::from_value).collect())
        .unwrap_or_default()
}

/// Fetches the catalog once, from disk or over HTTP.
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    config: CatalogConfig,
    client: Client,
}

impl CatalogLoader {
    pub fn new(config: CatalogConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_millis(config.fetch_timeout_ms))
            .build()?;
        Ok(Self { config, client })
    }

    pub fn source(&self) -> &CatalogSource {
        &self.config.source
    }

    pub async fn load(&self, priorities: &SortPriorities) -> Result<Catalog, CatalogError> {
        let started_at = Instant::now();
        let raw = match &self.config.source {
            CatalogSource::File(path) => read_file(path).await?,
            CatalogSource::Remote(url) => self.fetch(url).await?,
        };
        let catalog = Catalog::from_json(&raw, priorities)?;

        if let Some(logger) = try_logger() {
            logger.info(
                "catalog.loaded",
                json!({
                    "source": self.config.source,
                    "records": catalog.len(),
                    "durationMs": started_at.elapsed().as_millis() as u64,
                }),
            );
        }
        Ok(catalog)
    }

    async fn fetch(&self, url: &str) -> Result<String, CatalogError> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(CatalogError::Status(response.status()));
        }
        Ok(response.text().await?)
    }
}

async fn read_file(path: &Path) -> Result<String, CatalogError> {
    Ok(tokio::fs::read_to_string(path).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(catalog: &Catalog) -> Vec<&str> {
        catalog.records().iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn parses_and_sorts_the_medias_array() {
        let raw = r#"{
            "medias": [
                { "name": "TV B", "country": "Spain", "continent": "Europe", "region": "Madrid" },
                { "name": "Radio A", "country": "France", "continent": "Europe", "region": "" }
            ]
        }"#;
        let catalog = Catalog::from_json(raw, &SortPriorities::default()).unwrap();
        assert_eq!(names(&catalog), vec!["Radio A", "TV B"]);
    }

    #[test]
    fn missing_or_misshaped_array_is_empty() {
        let priorities = SortPriorities::default();
        for raw in [r#"{}"#, r#"{"medias": "nope"}"#, r#"{"medias": null}"#, r#""text""#] {
            let catalog = Catalog::from_json(raw, &priorities).unwrap();
            assert!(catalog.is_empty(), "{raw} should give an empty catalog");
        }
    }

    #[test]
    fn bare_arrays_and_non_object_items_are_tolerated() {
        let raw = r#"[ { "nom": "Le Monde", "pays": "France" }, 42, "skip", null ]"#;
        let catalog = Catalog::from_json(raw, &SortPriorities::default()).unwrap();
        assert_eq!(names(&catalog), vec!["Le Monde"]);
    }

    #[test]
    fn skips_record_keys_that_do_not_hold_an_array() {
        let raw = r#"{ "medias": null, "media": "nope", "items": [ { "name": "Radio A" } ] }"#;
        let catalog = Catalog::from_json(raw, &SortPriorities::default()).unwrap();
        assert_eq!(names(&catalog), vec!["Radio A"]);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let result = Catalog::from_json("{ \"medias\": [", &SortPriorities::default());
        assert!(matches!(result, Err(CatalogError::Json(_))));
    }
}
