use std::{env, path::PathBuf, time::Duration};

use anyhow::Context;
use url::Url;

use crate::catalog::{SlugStrategy, pagination::DEFAULT_MAX_VISIBLE_PAGES};

pub const DEFAULT_CATEGORY_SLUG_PREFIX: &str = "category-";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    pub category_slug: SlugStrategy,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|n| n.parse::<u32>().ok())
            .unwrap_or(10);
        let category_slug = category_slug_strategy(
            env::var("CATEGORY_SLUG_STRATEGY").ok().as_deref(),
            env::var("CATEGORY_SLUG_PREFIX").ok(),
        )?;
        Ok(Self {
            port,
            database_url,
            host,
            max_connections,
            category_slug,
        })
    }
}

fn category_slug_strategy(name: Option<&str>, prefix: Option<String>) -> anyhow::Result<SlugStrategy> {
    let strategy = name
        .unwrap_or("prefixed-first-word")
        .parse::<SlugStrategy>()
        .context("invalid CATEGORY_SLUG_STRATEGY")?;
    Ok(match strategy {
        SlugStrategy::PrefixedFirstWord { .. } => SlugStrategy::PrefixedFirstWord {
            prefix: prefix.unwrap_or_else(|| DEFAULT_CATEGORY_SLUG_PREFIX.to_string()),
        },
        other => other,
    })
}

/// Settings for API consumers such as the `search` binary.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: Url,
    pub debounce: Duration,
    pub history_path: PathBuf,
    pub max_visible_pages: u64,
}

impl ClientConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let raw_url =
            env::var("SHOWROOM_API_URL").unwrap_or_else(|_| "http://127.0.0.1:3000/api".to_string());
        let api_url = Url::parse(&raw_url).context("invalid SHOWROOM_API_URL")?;
        let debounce = env::var("SEARCH_DEBOUNCE_MS")
            .ok()
            .and_then(|ms| ms.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(300));
        let history_path = env::var("SEARCH_HISTORY_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".showroom-history.json"));
        let max_visible_pages = env::var("PAGINATION_MAX_VISIBLE")
            .ok()
            .and_then(|n| n.parse::<u64>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_MAX_VISIBLE_PAGES);
        Ok(Self {
            api_url,
            debounce,
            history_path,
            max_visible_pages,
        })
    }
}
