mod languages;
mod models;
mod normalize;
mod ordering;

pub use languages::language_label;
pub use models::{MediaId, MediaRecord, MEDIA_ID_SEPARATOR};
pub use normalize::{locale_cmp, normalize_search_text};
pub use ordering::{sort_catalog, SortPriorities};
