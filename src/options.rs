use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::filters::{matches_dimension, FilterDimension, FilterState};
use crate::media::{language_label, locale_cmp, MediaRecord, SortPriorities};

/// Regions offered under one `"{continent} / {country}"` heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionGroup {
    pub label: String,
    pub regions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageOption {
    pub code: String,
    pub label: String,
}

/// The values each dropdown may offer given the current upstream selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub continents: Vec<String>,
    pub countries: Vec<String>,
    pub regions: Vec<String>,
    pub region_groups: Vec<RegionGroup>,
    pub categories: Vec<String>,
    pub languages: Vec<LanguageOption>,
}

impl FilterOptions {
    pub fn contains(&self, dimension: FilterDimension, value: &str) -> bool {
        match dimension {
            FilterDimension::Continent => self.continents.iter().any(|v| v == value),
            FilterDimension::Country => self.countries.iter().any(|v| v == value),
            FilterDimension::Region => self.regions.iter().any(|v| v == value),
            FilterDimension::Category => self.categories.iter().any(|v| v == value),
            FilterDimension::Language => self.languages.iter().any(|v| v.code == value),
        }
    }
}

fn matches_upstream(
    record: &MediaRecord,
    filters: &FilterState,
    dimension: FilterDimension,
) -> bool {
    dimension
        .upstream()
        .iter()
        .all(|upstream| matches_dimension(record, filters, *upstream))
}

fn distinct_values<'a>(
    catalog: &'a [MediaRecord],
    filters: &FilterState,
    dimension: FilterDimension,
) -> BTreeSet<&'a str> {
    catalog
        .iter()
        .filter(|record| matches_upstream(record, filters, dimension))
        .map(|record| dimension.value_of(record))
        .filter(|value| !value.is_empty())
        .collect()
}

fn sorted_by(
    values: BTreeSet<&str>,
    compare: impl Fn(&str, &str) -> std::cmp::Ordering,
) -> Vec<String> {
    let mut values: Vec<String> = values.into_iter().map(str::to_string).collect();
    values.sort_by(|a, b| compare(a.as_str(), b.as_str()));
    values
}

fn region_groups(catalog: &[MediaRecord], filters: &FilterState) -> Vec<RegionGroup> {
    let mut grouped: BTreeMap<String, BTreeSet<&str>> = BTreeMap::new();
    for record in catalog {
        if record.region.is_empty() || !matches_upstream(record, filters, FilterDimension::Region) {
            continue;
        }
        grouped
            .entry(format!("{} / {}", record.continent, record.country))
            .or_default()
            .insert(record.region.as_str());
    }

    let mut groups: Vec<RegionGroup> = grouped
        .into_iter()
        .map(|(label, regions)| RegionGroup {
            label,
            regions: sorted_by(regions, locale_cmp),
        })
        .collect();
    groups.sort_by(|a, b| locale_cmp(&a.label, &b.label));
    groups
}

fn language_options(catalog: &[MediaRecord]) -> Vec<LanguageOption> {
    let codes = distinct_values(catalog, &FilterState::default(), FilterDimension::Language);
    let mut options: Vec<LanguageOption> = codes
        .into_iter()
        .map(|code| LanguageOption {
            code: code.to_string(),
            label: language_label(code).to_string(),
        })
        .collect();
    options.sort_by(|a, b| locale_cmp(&a.label, &b.label).then_with(|| a.code.cmp(&b.code)));
    options
}

/// Each level only looks at records matching the filters strictly upstream
/// of it; its own and downstream selections are ignored.
pub fn derive_options(
    catalog: &[MediaRecord],
    filters: &FilterState,
    priorities: &SortPriorities,
) -> FilterOptions {
    let continents = sorted_by(
        distinct_values(catalog, filters, FilterDimension::Continent),
        |a, b| priorities.compare_continents(a, b),
    );
    let countries = sorted_by(
        distinct_values(catalog, filters, FilterDimension::Country),
        |a, b| priorities.compare_countries(a, b),
    );
    let regions = sorted_by(
        distinct_values(catalog, filters, FilterDimension::Region),
        locale_cmp,
    );
    let categories = sorted_by(
        distinct_values(catalog, filters, FilterDimension::Category),
        locale_cmp,
    );

    FilterOptions {
        continents,
        countries,
        regions,
        region_groups: region_groups(catalog, filters),
        categories,
        languages: language_options(catalog),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub filters: FilterState,
    pub options: FilterOptions,
    pub reset: Vec<FilterDimension>,
}

/// Drops selections that are no longer offered. A stale level resets together
/// with everything below it, then options are recomputed for the new state.
pub fn reconcile(
    catalog: &[MediaRecord],
    filters: FilterState,
    priorities: &SortPriorities,
) -> Reconciled {
    let mut filters = filters;
    let mut reset = Vec::new();

    for dimension in FilterDimension::CASCADE {
        let selected = filters.get(dimension);
        if selected.is_empty() {
            continue;
        }
        let still_offered = distinct_values(catalog, &filters, dimension).contains(selected);
        if !still_offered {
            filters.clear(dimension);
            reset.push(dimension);
            for downstream in dimension.downstream() {
                if !filters.get(*downstream).is_empty() {
                    filters.clear(*downstream);
                    reset.push(*downstream);
                }
            }
            break;
        }
    }

    let language = filters.language.clone();
    if !language.is_empty()
        && !distinct_values(catalog, &FilterState::default(), FilterDimension::Language)
            .contains(language.as_str())
    {
        filters.clear(FilterDimension::Language);
        reset.push(FilterDimension::Language);
    }

    let options = derive_options(catalog, &filters, priorities);
    Reconciled {
        filters,
        options,
        reset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(
        name: &str,
        continent: &str,
        country: &str,
        region: &str,
        category: &str,
        language: &str,
    ) -> MediaRecord {
        MediaRecord {
            name: name.into(),
            continent: continent.into(),
            country: country.into(),
            region: region.into(),
            category: category.into(),
            language: language.into(),
            ..Default::default()
        }
    }

    fn catalog() -> Vec<MediaRecord> {
        vec![
            record("Radio A", "Europe", "France", "", "Radio", "fr"),
            record("France Bleu Breizh", "Europe", "France", "Bretagne", "Radio", "fr"),
            record("Ouest-France", "Europe", "France", "Bretagne", "Presse", "fr"),
            record("TV B", "Europe", "Spain", "Madrid", "TV", "es"),
            record("BBC", "Europe", "Royaume-Uni", "", "TV", "en"),
            record("NHK", "Asie", "Japon", "Kanto", "TV", "ja"),
            record("Radio Canada", "Amérique", "Canada", "Québec", "Radio", "fr"),
        ]
    }

    #[test]
    fn unfiltered_options_cover_the_whole_catalog() {
        let options =
            derive_options(&catalog(), &FilterState::default(), &SortPriorities::default());
        assert_eq!(options.continents, vec!["Europe", "Amérique", "Asie"]);
        assert_eq!(
            options.countries,
            vec!["France", "Canada", "Japon", "Royaume-Uni", "Spain"]
        );
        assert_eq!(options.regions, vec!["Bretagne", "Kanto", "Madrid", "Québec"]);
        assert_eq!(options.categories, vec!["Presse", "Radio", "TV"]);
        let labels: Vec<&str> = options.languages.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["Anglais", "Espagnol", "Français", "Japonais"]);
    }

    #[test]
    fn countries_follow_the_selected_continent() {
        let filters = FilterState {
            continent: "Europe".into(),
            ..Default::default()
        };
        let options = derive_options(&catalog(), &filters, &SortPriorities::default());
        assert_eq!(options.continents, vec!["Europe", "Amérique", "Asie"]);
        assert_eq!(options.countries, vec!["France", "Royaume-Uni", "Spain"]);
        assert_eq!(options.regions, vec!["Bretagne", "Madrid"]);
        assert!(options.contains(FilterDimension::Country, "Spain"));
        assert!(!options.contains(FilterDimension::Country, "Japon"));
        assert!(options.contains(FilterDimension::Language, "ja"));
    }

    #[test]
    fn categories_follow_the_full_location_path() {
        let filters = FilterState {
            continent: "Europe".into(),
            country: "France".into(),
            region: "Bretagne".into(),
            category: "TV".into(),
            ..Default::default()
        };
        let options = derive_options(&catalog(), &filters, &SortPriorities::default());
        assert_eq!(options.categories, vec!["Presse", "Radio"]);
    }

    #[test]
    fn regions_are_grouped_by_continent_and_country() {
        let options =
            derive_options(&catalog(), &FilterState::default(), &SortPriorities::default());
        assert_eq!(
            options.region_groups,
            vec![
                RegionGroup {
                    label: "Amérique / Canada".into(),
                    regions: vec!["Québec".into()],
                },
                RegionGroup {
                    label: "Asie / Japon".into(),
                    regions: vec!["Kanto".into()],
                },
                RegionGroup {
                    label: "Europe / France".into(),
                    regions: vec!["Bretagne".into()],
                },
                RegionGroup {
                    label: "Europe / Spain".into(),
                    regions: vec!["Madrid".into()],
                },
            ]
        );
    }

    #[test]
    fn consistent_selection_is_kept() {
        let filters = FilterState {
            continent: "Europe".into(),
            country: "France".into(),
            region: "Bretagne".into(),
            category: "Presse".into(),
            language: "fr".into(),
            ..Default::default()
        };
        let reconciled = reconcile(&catalog(), filters.clone(), &SortPriorities::default());
        assert_eq!(reconciled.filters, filters);
        assert!(reconciled.reset.is_empty());
    }

    #[test]
    fn forced_foreign_country_resets_with_its_downstream() {
        let filters = FilterState {
            continent: "Asie".into(),
            country: "France".into(),
            region: "Bretagne".into(),
            category: "Radio".into(),
            search: "radio".into(),
            ..Default::default()
        };
        let reconciled = reconcile(&catalog(), filters, &SortPriorities::default());
        assert_eq!(reconciled.filters.continent, "Asie");
        assert_eq!(reconciled.filters.country, "");
        assert_eq!(reconciled.filters.region, "");
        assert_eq!(reconciled.filters.category, "");
        assert_eq!(reconciled.filters.search, "radio");
        assert_eq!(
            reconciled.reset,
            vec![
                FilterDimension::Country,
                FilterDimension::Region,
                FilterDimension::Category
            ]
        );
        assert_eq!(reconciled.options.countries, vec!["Japon"]);
    }

    #[test]
    fn stale_category_resets_alone() {
        let filters = FilterState {
            country: "Spain".into(),
            category: "Presse".into(),
            language: "es".into(),
            ..Default::default()
        };
        let reconciled = reconcile(&catalog(), filters, &SortPriorities::default());
        assert_eq!(reconciled.filters.country, "Spain");
        assert_eq!(reconciled.filters.category, "");
        assert_eq!(reconciled.filters.language, "es");
        assert_eq!(reconciled.reset, vec![FilterDimension::Category]);
    }

    #[test]
    fn unknown_language_resets() {
        let filters = FilterState {
            language: "xx".into(),
            ..Default::default()
        };
        let reconciled = reconcile(&catalog(), filters, &SortPriorities::default());
        assert_eq!(reconciled.filters.language, "");
        assert_eq!(reconciled.reset, vec![FilterDimension::Language]);
    }

    #[test]
    fn empty_values_are_never_offered() {
        let catalog = vec![record("Nowhere", "", "", "", "", "")];
        let options = derive_options(&catalog, &FilterState::default(), &SortPriorities::default());
        assert_eq!(options, FilterOptions::default());
    }
}
