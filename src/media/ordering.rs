use std::cmp::Ordering;

use serde::Serialize;

use super::{locale_cmp, MediaRecord};

/// Editorial priorities: the preferred continent, then the preferred
/// country, sort ahead of everything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortPriorities {
    pub continent: String,
    pub country: String,
}

impl Default for SortPriorities {
    fn default() -> Self {
        Self::new("Europe", "France")
    }
}

impl SortPriorities {
    pub fn new(continent: &str, country: &str) -> Self {
        Self {
            continent: continent.to_string(),
            country: country.to_string(),
        }
    }

    fn continent_rank(&self, continent: &str) -> u8 {
        rank(continent, &self.continent)
    }

    fn country_rank(&self, country: &str) -> u8 {
        rank(country, &self.country)
    }

    pub fn compare_records(&self, a: &MediaRecord, b: &MediaRecord) -> Ordering {
        self.continent_rank(&a.continent)
            .cmp(&self.continent_rank(&b.continent))
            .then_with(|| {
                self.country_rank(&a.country)
                    .cmp(&self.country_rank(&b.country))
            })
            .then_with(|| locale_cmp(&a.continent, &b.continent))
            .then_with(|| locale_cmp(&a.country, &b.country))
            .then_with(|| (!a.region.is_empty()).cmp(&!b.region.is_empty()))
            .then_with(|| locale_cmp(&a.region, &b.region))
            .then_with(|| locale_cmp(&a.category, &b.category))
            .then_with(|| locale_cmp(&a.name, &b.name))
            .then_with(|| a.url.cmp(&b.url))
    }

    pub fn compare_continents(&self, a: &str, b: &str) -> Ordering {
        self.continent_rank(a)
            .cmp(&self.continent_rank(b))
            .then_with(|| locale_cmp(a, b))
    }

    pub fn compare_countries(&self, a: &str, b: &str) -> Ordering {
        self.country_rank(a)
            .cmp(&self.country_rank(b))
            .then_with(|| locale_cmp(a, b))
    }
}

fn rank(value: &str, preferred: &str) -> u8 {
    if !preferred.is_empty() && value == preferred {
        0
    } else {
        1
    }
}

/// Sorts the catalog once, right after load.
pub fn sort_catalog(records: &mut [MediaRecord], priorities: &SortPriorities) {
    records.sort_by(|a, b| priorities.compare_records(a, b));
}
