pub mod app_state;
pub mod catalog;
pub mod config;
pub mod favorites;
pub mod filters;
pub mod logging;
pub mod media;
pub mod options;
pub mod pagination;
pub mod render;

pub use app_state::{Directory, DirectoryEvent, DirectoryState, DirectoryView};
pub use catalog::{Catalog, CatalogError, CatalogLoader};
pub use favorites::{FavoriteSet, FavoritesStore, JsonFileStore, KeyValueStore, MemoryStore};
pub use filters::{filter_catalog, FilterDimension, FilterState};
pub use media::{MediaId, MediaRecord, SortPriorities};
