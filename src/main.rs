use std::env;

use anyhow::Context;
use serde_json::json;

use media_directory::config::Config;
use media_directory::logging::init_logger;
use media_directory::render::{render_load_failure, render_view};
use media_directory::{CatalogLoader, Directory, FavoritesStore, JsonFileStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let logger = init_logger("media-directory");

    let config = Config::load().context("failed to load configuration")?;

    if matches!(env::args().nth(1).as_deref(), Some("check-config")) {
        logger.info(
            "config.check_passed",
            serde_json::to_value(&config).unwrap_or_else(|_| json!({ "status": "ok" })),
        );
        return Ok(());
    }

    let favorites = FavoritesStore::open(
        JsonFileStore::new(&config.favorites.path),
        config.favorites.key.clone(),
    );
    logger.info(
        "favorites.loaded",
        json!({
            "path": config.favorites.path.display().to_string(),
            "count": favorites.favorites().len(),
        }),
    );

    let priorities = config.display.priorities();
    let loader =
        CatalogLoader::new(config.catalog.clone()).context("failed to build catalog loader")?;

    let catalog = match loader.load(&priorities).await {
        Ok(catalog) => catalog,
        Err(error) => {
            logger.error(
                "catalog.load_failed",
                json!({ "source": loader.source(), "error": error.to_string() }),
            );
            println!("{}", render_load_failure());
            return Ok(());
        }
    };

    let directory = Directory::new(catalog, favorites, config.display.clone());
    print!("{}", render_view(&directory.view()));
    Ok(())
}
