use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::io;
use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::logging::try_logger;
use crate::media::{MediaId, MediaRecord};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    InvalidData(String),
}

/// A string-to-string store, the local analog of browser local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Keeps every entry in one JSON object file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_entries(&self) -> Result<Map<String, Value>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(err) => return Err(err.into()),
        };
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&raw)? {
            Value::Object(entries) => Ok(entries),
            _ => Err(StorageError::InvalidData(format!(
                "{} does not hold a JSON object",
                self.path.display()
            ))),
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.read_entries()?;
        Ok(entries.get(key).and_then(|value| match value {
            Value::String(text) => Some(text.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        // A corrupt file is replaced rather than blocking every later write.
        let mut entries = self.read_entries().unwrap_or_default();
        entries.insert(key.to_string(), Value::String(value.to_string()));

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let serialized = serde_json::to_string_pretty(&Value::Object(entries))?;
        let staging = self.path.with_extension("tmp");
        fs::write(&staging, serialized)?;
        fs::rename(&staging, &self.path)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoriteSet {
    ids: BTreeSet<MediaId>,
}

impl FavoriteSet {
    pub fn contains(&self, id: &MediaId) -> bool {
        self.ids.contains(id)
    }

    pub fn contains_record(&self, record: &MediaRecord) -> bool {
        self.contains(&record.id())
    }

    /// Flips membership and returns whether the id is now a favorite.
    pub fn toggle(&mut self, id: &MediaId) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.clone());
            true
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MediaId> {
        self.ids.iter()
    }

    fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.ids.iter().map(MediaId::as_str).collect::<Vec<_>>())
    }

    /// Accepts an array of ids, an array of `{ "id": ... }` entries, or an
    /// object wrapping either under `entries` or `items`. Anything else is empty.
    fn from_json(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => Self {
                ids: normalize_ids_from_raw(&value),
            },
            Err(_) => Self::default(),
        }
    }
}

#[derive(Deserialize)]
struct LegacyEntry {
    id: Option<String>,
}

fn normalize_ids_from_raw(value: &Value) -> BTreeSet<MediaId> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(id) => MediaId::from_persisted(id),
                Value::Object(_) => serde_json::from_value::<LegacyEntry>(item.clone())
                    .ok()
                    .and_then(|entry| entry.id)
                    .and_then(|id| MediaId::from_persisted(&id)),
                _ => None,
            })
            .collect(),
        Value::Object(map) => {
            if let Some(entries) = map.get("entries") {
                return normalize_ids_from_raw(entries);
            }
            if let Some(items) = map.get("items") {
                return normalize_ids_from_raw(items);
            }
            BTreeSet::new()
        }
        _ => BTreeSet::new(),
    }
}

/// Favorites backed by a key-value store. Best effort: reads fall back to an
/// empty set and write failures are logged, never returned.
#[derive(Debug)]
pub struct FavoritesStore<S: KeyValueStore> {
    storage: S,
    key: String,
    favorites: FavoriteSet,
}

impl<S: KeyValueStore> FavoritesStore<S> {
    /// Creates the store and loads whatever is persisted under `key`.
    pub fn open(storage: S, key: impl Into<String>) -> Self {
        let mut store = Self {
            storage,
            key: key.into(),
            favorites: FavoriteSet::default(),
        };
        store.load();
        store
    }

    pub fn load(&mut self) {
        self.favorites = match self.storage.get(&self.key) {
            Ok(Some(raw)) => FavoriteSet::from_json(&raw),
            Ok(None) => FavoriteSet::default(),
            Err(err) => {
                if let Some(logger) = try_logger() {
                    logger.warn(
                        "favorites.load_failed",
                        json!({ "key": self.key, "error": err.to_string() }),
                    );
                }
                FavoriteSet::default()
            }
        };
    }

    pub fn save(&mut self) {
        let result = self
            .favorites
            .to_json()
            .map_err(StorageError::from)
            .and_then(|serialized| self.storage.set(&self.key, &serialized));
        if let Err(err) = result {
            if let Some(logger) = try_logger() {
                logger.warn(
                    "favorites.save_failed",
                    json!({ "key": self.key, "error": err.to_string() }),
                );
            }
        }
    }

    pub fn is_favorite(&self, record: &MediaRecord) -> bool {
        self.favorites.contains_record(record)
    }

    pub fn toggle(&mut self, record: &MediaRecord) -> bool {
        self.toggle_id(&record.id())
    }

    pub fn toggle_id(&mut self, id: &MediaId) -> bool {
        let now_favorite = self.favorites.toggle(id);
        self.save();
        now_favorite
    }

    pub fn favorites(&self) -> &FavoriteSet {
        &self.favorites
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}
