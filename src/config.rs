use std::env;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::media::SortPriorities;

pub const DEFAULT_FAVORITES_KEY: &str = "annuaireMediasFavorites";
pub const DEFAULT_PAGE_SIZE: usize = 24;
pub const MAX_PAGE_SIZE: usize = 500;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0}")]
    Message(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub favorites: FavoritesConfig,
    pub display: DisplayConfig,
    pub allow_insecure_transports: bool,
}

/// Where the catalog lives: a local file or a remote document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "location", rename_all = "camelCase")]
pub enum CatalogSource {
    File(PathBuf),
    Remote(String),
}

impl CatalogSource {
    pub fn parse(raw: &str, allow_insecure_transports: bool) -> Result<Self, ConfigError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::Message(
                "DIRECTORY_CATALOG_SOURCE must not be empty".into(),
            ));
        }

        if !trimmed.contains("://") {
            return Ok(CatalogSource::File(PathBuf::from(trimmed)));
        }

        let url = Url::parse(trimmed).map_err(|err| {
            ConfigError::Message(format!("Invalid DIRECTORY_CATALOG_SOURCE: {err}"))
        })?;
        match url.scheme() {
            "https" => Ok(CatalogSource::Remote(url.to_string())),
            "http" if allow_insecure_transports => Ok(CatalogSource::Remote(url.to_string())),
            "http" => Err(ConfigError::Message(
                "Catalog URLs must use HTTPS unless ALLOW_INSECURE_TRANSPORT=true".into(),
            )),
            "file" => url
                .to_file_path()
                .map(CatalogSource::File)
                .map_err(|_| ConfigError::Message("Invalid file:// catalog path".into())),
            other => Err(ConfigError::Message(format!(
                "Unsupported catalog scheme: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogConfig {
    pub source: CatalogSource,
    pub fetch_timeout_ms: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FavoritesConfig {
    pub path: PathBuf,
    pub key: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DisplayConfig {
    pub page_size: usize,
    pub preferred_continent: String,
    pub preferred_country: String,
}

impl DisplayConfig {
    pub fn priorities(&self) -> SortPriorities {
        SortPriorities::new(&self.preferred_continent, &self.preferred_country)
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            preferred_continent: "Europe".into(),
            preferred_country: "France".into(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let allow_insecure_transports = env::var("ALLOW_INSECURE_TRANSPORT")
            .map(|value| value == "true")
            .unwrap_or(false);
        let catalog = CatalogConfig::from_env(allow_insecure_transports)?;
        let favorites = FavoritesConfig::from_env()?;
        let display = DisplayConfig::from_env()?;

        Ok(Self {
            catalog,
            favorites,
            display,
            allow_insecure_transports,
        })
    }
}

impl CatalogConfig {
    fn from_env(allow_insecure_transports: bool) -> Result<Self, ConfigError> {
        let raw_source =
            env::var("DIRECTORY_CATALOG_SOURCE").unwrap_or_else(|_| "medias.json".into());
        let source = CatalogSource::parse(&raw_source, allow_insecure_transports)?;
        let fetch_timeout_ms = env_u64("DIRECTORY_FETCH_TIMEOUT_MS", 10_000)?.max(1);
        let user_agent = env::var("DIRECTORY_USER_AGENT")
            .unwrap_or_else(|_| format!("media-directory/{}", env!("CARGO_PKG_VERSION")));
        if user_agent.trim().is_empty() {
            return Err(ConfigError::Message(
                "DIRECTORY_USER_AGENT must not be empty".into(),
            ));
        }

        Ok(Self {
            source,
            fetch_timeout_ms,
            user_agent,
        })
    }
}

impl FavoritesConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let path = env::var("DIRECTORY_FAVORITES_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("favorites.json"));
        let key = env::var("DIRECTORY_FAVORITES_KEY")
            .unwrap_or_else(|_| DEFAULT_FAVORITES_KEY.to_string());
        if key.trim().is_empty() {
            return Err(ConfigError::Message(
                "DIRECTORY_FAVORITES_KEY must not be empty".into(),
            ));
        }
        Ok(Self { path, key })
    }
}

impl DisplayConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let page_size =
            env_usize("DIRECTORY_PAGE_SIZE", DEFAULT_PAGE_SIZE)?.clamp(1, MAX_PAGE_SIZE);
        let preferred_continent =
            env::var("DIRECTORY_PREFERRED_CONTINENT").unwrap_or_else(|_| "Europe".into());
        let preferred_country =
            env::var("DIRECTORY_PREFERRED_COUNTRY").unwrap_or_else(|_| "France".into());

        Ok(Self {
            page_size,
            preferred_continent: preferred_continent.trim().to_string(),
            preferred_country: preferred_country.trim().to_string(),
        })
    }
}

fn env_u64(key: &str, default: u64) -> Result<u64, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Message(format!("{key} must be a valid u64"))),
        Err(_) => Ok(default),
    }
}

fn env_usize(key: &str, default: usize) -> Result<usize, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Message(format!("{key} must be a valid usize"))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_paths_are_files() {
        let source = CatalogSource::parse("data/medias.json", false).unwrap();
        assert_eq!(source, CatalogSource::File(PathBuf::from("data/medias.json")));
    }

    #[test]
    fn https_urls_are_remote() {
        let source = CatalogSource::parse(" https://example.org/medias.json ", false).unwrap();
        assert_eq!(
            source,
            CatalogSource::Remote("https://example.org/medias.json".into())
        );
    }

    #[test]
    fn http_requires_insecure_opt_in() {
        assert!(CatalogSource::parse("http://example.org/medias.json", false).is_err());
        assert!(CatalogSource::parse("http://example.org/medias.json", true).is_ok());
    }

    #[test]
    fn empty_and_unknown_schemes_are_rejected() {
        assert!(CatalogSource::parse("   ", false).is_err());
        assert!(CatalogSource::parse("ftp://example.org/medias.json", true).is_err());
    }
}
