use serde::{Deserialize, Serialize};

use crate::favorites::FavoriteSet;
use crate::media::{normalize_search_text, MediaRecord};

/// The categorical dimensions, in cascade order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterDimension {
    Continent,
    Country,
    Region,
    Category,
    Language,
}

impl FilterDimension {
    pub const CASCADE: [FilterDimension; 4] = [
        FilterDimension::Continent,
        FilterDimension::Country,
        FilterDimension::Region,
        FilterDimension::Category,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterDimension::Continent => "continent",
            FilterDimension::Country => "country",
            FilterDimension::Region => "region",
            FilterDimension::Category => "category",
            FilterDimension::Language => "language",
        }
    }

    pub fn value_of<'a>(&self, record: &'a MediaRecord) -> &'a str {
        match self {
            FilterDimension::Continent => &record.continent,
            FilterDimension::Country => &record.country,
            FilterDimension::Region => &record.region,
            FilterDimension::Category => &record.category,
            FilterDimension::Language => &record.language,
        }
    }

    /// Dimensions that must be cleared when this one changes. Language sits
    /// outside the cascade.
    pub fn downstream(&self) -> &'static [FilterDimension] {
        match self {
            FilterDimension::Continent => &Self::CASCADE[1..],
            FilterDimension::Country => &Self::CASCADE[2..],
            FilterDimension::Region => &Self::CASCADE[3..],
            FilterDimension::Category | FilterDimension::Language => &[],
        }
    }

    /// Dimensions a record must match before this one's options are computed.
    pub fn upstream(&self) -> &'static [FilterDimension] {
        match self {
            FilterDimension::Continent | FilterDimension::Language => &[],
            FilterDimension::Country => &Self::CASCADE[..1],
            FilterDimension::Region => &Self::CASCADE[..2],
            FilterDimension::Category => &Self::CASCADE[..3],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub continent: String,
    pub country: String,
    pub region: String,
    pub category: String,
    pub language: String,
    pub search: String,
    pub favorites_only: bool,
}

impl FilterState {
    pub fn get(&self, dimension: FilterDimension) -> &str {
        match dimension {
            FilterDimension::Continent => &self.continent,
            FilterDimension::Country => &self.country,
            FilterDimension::Region => &self.region,
            FilterDimension::Category => &self.category,
            FilterDimension::Language => &self.language,
        }
    }

    pub fn set(&mut self, dimension: FilterDimension, value: &str) {
        let value = value.trim().to_string();
        match dimension {
            FilterDimension::Continent => self.continent = value,
            FilterDimension::Country => self.country = value,
            FilterDimension::Region => self.region = value,
            FilterDimension::Category => self.category = value,
            FilterDimension::Language => self.language = value,
        }
    }

    pub fn clear(&mut self, dimension: FilterDimension) {
        self.set(dimension, "");
    }

    /// Sets a dimension and clears the location levels below it. Category is
    /// left to reconciliation.
    pub fn select(&mut self, dimension: FilterDimension, value: &str) {
        self.set(dimension, value);
        for downstream in dimension.downstream() {
            if *downstream != FilterDimension::Category {
                self.clear(*downstream);
            }
        }
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    fn search_needle(&self) -> Option<String> {
        let trimmed = self.search.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(normalize_search_text(trimmed))
        }
    }
}

/// Equality match on one categorical dimension; an empty filter matches everything.
pub fn matches_dimension(
    record: &MediaRecord,
    filters: &FilterState,
    dimension: FilterDimension,
) -> bool {
    let selected = filters.get(dimension);
    selected.is_empty() || dimension.value_of(record) == selected
}

/// Whether a record passes every active filter.
pub fn matches(record: &MediaRecord, filters: &FilterState, favorites: &FavoriteSet) -> bool {
    matches_with_needle(record, filters, favorites, filters.search_needle().as_deref())
}

fn matches_with_needle(
    record: &MediaRecord,
    filters: &FilterState,
    favorites: &FavoriteSet,
    needle: Option<&str>,
) -> bool {
    let categorical = FilterDimension::CASCADE
        .iter()
        .chain(std::iter::once(&FilterDimension::Language))
        .all(|dimension| matches_dimension(record, filters, *dimension));
    if !categorical {
        return false;
    }
    if filters.favorites_only && !favorites.contains_record(record) {
        return false;
    }
    match needle {
        Some(needle) => normalize_search_text(&record.search_haystack()).contains(needle),
        None => true,
    }
}

/// Filters the catalog, keeping its order.
pub fn filter_catalog<'a>(
    catalog: &'a [MediaRecord],
    filters: &FilterState,
    favorites: &FavoriteSet,
) -> Vec<&'a MediaRecord> {
    let needle = filters.search_needle();
    catalog
        .iter()
        .filter(|record| matches_with_needle(record, filters, favorites, needle.as_deref()))
        .collect()
}
