use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Joins the fallback identity fields. A `:` or backslash inside a field is
/// backslash-escaped, so ids of fields without either keep the stored format.
pub const MEDIA_ID_SEPARATOR: &str = "::";

const NAME_KEYS: &[&str] = &["name", "nom"];
const COUNTRY_KEYS: &[&str] = &["country", "pays"];
const COUNTRY_CODE_KEYS: &[&str] = &["country-code", "countryCode", "country_code", "code_pays"];
const CONTINENT_KEYS: &[&str] = &["continent"];
const REGION_KEYS: &[&str] = &["region"];
const CATEGORY_KEYS: &[&str] = &["category", "categorie"];
const LANGUAGE_KEYS: &[&str] = &["language", "langue"];
const URL_KEYS: &[&str] = &["url"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRecord {
    pub name: String,
    pub country: String,
    #[serde(rename = "countryCode")]
    pub country_code: String,
    pub continent: String,
    pub region: String,
    pub category: String,
    pub language: String,
    pub url: String,
}

impl MediaRecord {
    /// Builds a record from one raw catalog item. Non-object items yield `None`;
    /// absent, null or non-string fields are coerced to text.
    pub fn from_value(value: &Value) -> Option<Self> {
        let Value::Object(map) = value else {
            return None;
        };

        Some(Self {
            name: text_field(map, NAME_KEYS),
            country: text_field(map, COUNTRY_KEYS),
            country_code: text_field(map, COUNTRY_CODE_KEYS),
            continent: text_field(map, CONTINENT_KEYS),
            region: text_field(map, REGION_KEYS),
            category: text_field(map, CATEGORY_KEYS),
            language: text_field(map, LANGUAGE_KEYS),
            url: text_field(map, URL_KEYS),
        })
    }

    pub fn id(&self) -> MediaId {
        MediaId::derive(self)
    }

    pub(crate) fn search_haystack(&self) -> String {
        format!("{} {} {}", self.name, self.country, self.region)
    }
}

fn text_field(map: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| map.get(*key).filter(|value| !value.is_null()))
        .map(coerce_text)
        .unwrap_or_default()
}

fn coerce_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.trim().to_string(),
        other => other.to_string(),
    }
}

/// Stable identity used for favoriting. The catalog carries no ids of its own.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaId(String);

impl MediaId {
    /// `url` when non-empty, otherwise `name::country::region`.
    pub fn derive(record: &MediaRecord) -> Self {
        if !record.url.is_empty() {
            return Self(record.url.clone());
        }
        let fields: Vec<String> = [&record.name, &record.country, &record.region]
            .into_iter()
            .map(|field| escape_id_field(field))
            .collect();
        Self(fields.join(MEDIA_ID_SEPARATOR))
    }

    /// Wraps an id read back from storage. Blank ids are rejected.
    pub fn from_persisted(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn escape_id_field(field: &str) -> String {
    if !field.contains([':', '\\']) {
        return field.to_string();
    }
    let mut escaped = String::with_capacity(field.len() + 2);
    for ch in field.chars() {
        if matches!(ch, ':' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
