use serde::Serialize;
use serde_json::json;

use crate::catalog::Catalog;
use crate::config::DisplayConfig;
use crate::favorites::{FavoriteSet, FavoritesStore, KeyValueStore};
use crate::filters::{filter_catalog, FilterDimension, FilterState};
use crate::logging::try_logger;
use crate::media::{MediaId, MediaRecord, SortPriorities};
use crate::options::{derive_options, reconcile, FilterOptions};
use crate::pagination::{clamp_page, paginate, Page};

/// Everything a user can do to the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryEvent {
    SelectContinent(String),
    SelectCountry(String),
    SelectRegion(String),
    SelectCategory(String),
    SelectLanguage(String),
    Search(String),
    ClearSearch,
    SetFavoritesOnly(bool),
    ResetFilters,
    GoToPage(usize),
    NextPage,
    PreviousPage,
    ToggleFavorite(MediaId),
}

impl DirectoryEvent {
    fn changes_filters(&self) -> bool {
        !matches!(
            self,
            DirectoryEvent::GoToPage(_) | DirectoryEvent::NextPage | DirectoryEvent::PreviousPage
        )
    }
}

/// Filter selection plus the current page. Transitions consume the state and
/// return the next one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryState {
    pub filters: FilterState,
    pub page: usize,
}

impl Default for DirectoryState {
    fn default() -> Self {
        Self {
            filters: FilterState::default(),
            page: 1,
        }
    }
}

impl DirectoryState {
    pub fn apply(
        self,
        event: &DirectoryEvent,
        catalog: &[MediaRecord],
        favorites: &FavoriteSet,
        settings: &DisplayConfig,
    ) -> Self {
        let priorities = settings.priorities();
        let DirectoryState { mut filters, page } = self;

        let requested_page = match event {
            DirectoryEvent::SelectContinent(value) => {
                filters.select(FilterDimension::Continent, value);
                1
            }
            DirectoryEvent::SelectCountry(value) => {
                filters.select(FilterDimension::Country, value);
                1
            }
            DirectoryEvent::SelectRegion(value) => {
                filters.select(FilterDimension::Region, value);
                1
            }
            DirectoryEvent::SelectCategory(value) => {
                filters.select(FilterDimension::Category, value);
                1
            }
            DirectoryEvent::SelectLanguage(value) => {
                filters.select(FilterDimension::Language, value);
                1
            }
            DirectoryEvent::Search(text) => {
                filters.search = text.trim().to_string();
                1
            }
            DirectoryEvent::ClearSearch => {
                filters.search.clear();
                1
            }
            DirectoryEvent::SetFavoritesOnly(enabled) => {
                filters = FilterState {
                    favorites_only: *enabled,
                    ..FilterState::default()
                };
                1
            }
            DirectoryEvent::ResetFilters => {
                filters = FilterState::default();
                1
            }
            DirectoryEvent::GoToPage(requested) => *requested,
            DirectoryEvent::NextPage => page.saturating_add(1),
            DirectoryEvent::PreviousPage => page.saturating_sub(1),
            DirectoryEvent::ToggleFavorite(_) => page,
        };

        if event.changes_filters() {
            let reconciled = reconcile(catalog, filters, &priorities);
            if !reconciled.reset.is_empty() {
                if let Some(logger) = try_logger() {
                    let reset: Vec<&str> = reconciled.reset.iter().map(|d| d.as_str()).collect();
                    logger.debug("filters.reset_stale", json!({ "dimensions": reset }));
                }
            }
            filters = reconciled.filters;
        }

        let matches = filter_catalog(catalog, &filters, favorites).len();
        Self {
            page: clamp_page(requested_page, matches, settings.page_size),
            filters,
        }
    }
}

/// A rendered-ready snapshot: nothing in it borrows mutably or touches storage.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryView<'a> {
    pub filters: &'a FilterState,
    pub options: FilterOptions,
    pub page: Page<MediaCard<'a>>,
    pub total: usize,
}

impl DirectoryView<'_> {
    pub fn matches(&self) -> usize {
        self.page.total_items
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaCard<'a> {
    pub record: &'a MediaRecord,
    pub id: MediaId,
    pub favorite: bool,
}

/// One browsing session: the sorted catalog, the favorites, and the state.
#[derive(Debug)]
pub struct Directory<S: KeyValueStore> {
    catalog: Catalog,
    favorites: FavoritesStore<S>,
    settings: DisplayConfig,
    state: DirectoryState,
}

impl<S: KeyValueStore> Directory<S> {
    pub fn new(catalog: Catalog, favorites: FavoritesStore<S>, settings: DisplayConfig) -> Self {
        Self {
            catalog,
            favorites,
            settings,
            state: DirectoryState::default(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn state(&self) -> &DirectoryState {
        &self.state
    }

    pub fn favorites(&self) -> &FavoritesStore<S> {
        &self.favorites
    }

    pub fn priorities(&self) -> SortPriorities {
        self.settings.priorities()
    }

    /// Runs the side effect for favorite toggles, then the state transition.
    pub fn dispatch(&mut self, event: DirectoryEvent) {
        if let DirectoryEvent::ToggleFavorite(id) = &event {
            let now_favorite = self.favorites.toggle_id(id);
            if let Some(logger) = try_logger() {
                logger.debug(
                    "favorites.toggled",
                    json!({ "id": id, "favorite": now_favorite }),
                );
            }
        }

        let state = std::mem::take(&mut self.state);
        self.state = state.apply(
            &event,
            self.catalog.records(),
            self.favorites.favorites(),
            &self.settings,
        );
    }

    pub fn filtered(&self) -> Vec<&MediaRecord> {
        filter_catalog(
            self.catalog.records(),
            &self.state.filters,
            self.favorites.favorites(),
        )
    }

    pub fn view(&self) -> DirectoryView<'_> {
        let options = derive_options(
            self.catalog.records(),
            &self.state.filters,
            &self.priorities(),
        );
        let favorites = self.favorites.favorites();
        let cards: Vec<MediaCard<'_>> = self
            .filtered()
            .into_iter()
            .map(|record| {
                let id = record.id();
                MediaCard {
                    favorite: favorites.contains(&id),
                    record,
                    id,
                }
            })
            .collect();

        DirectoryView {
            filters: &self.state.filters,
            options,
            page: paginate(&cards, self.state.page, self.settings.page_size),
            total: self.catalog.len(),
        }
    }
}
