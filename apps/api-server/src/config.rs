//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use blog_core::services::{DEFAULT_ADMIN_PAGE_SIZE, DEFAULT_PAGE_SIZE};
use blog_infra::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    /// Apply pending migrations at startup.
    pub auto_migrate: bool,
    pub blog: BlogConfig,
}

/// Listing sizes. Fixed per deployment, never taken from requests.
#[derive(Debug, Clone, Copy)]
pub struct BlogConfig {
    pub page_size: u64,
    pub admin_page_size: u64,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            admin_page_size: DEFAULT_ADMIN_PAGE_SIZE,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parsed("DB_MAX_CONNECTIONS", 100),
            min_connections: parsed("DB_MIN_CONNECTIONS", 10),
            sql_logging: flag("DB_SQL_LOGGING"),
        });

        let defaults = BlogConfig::default();
        let blog = BlogConfig {
            page_size: positive(parsed("BLOG_PAGE_SIZE", defaults.page_size), defaults.page_size),
            admin_page_size: positive(
                parsed("ADMIN_PAGE_SIZE", defaults.admin_page_size),
                defaults.admin_page_size,
            ),
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("PORT", 8080),
            database,
            auto_migrate: flag("AUTO_MIGRATE"),
            blog,
        }
    }
}

/// Parse `key`, falling back to `default` when unset or malformed.
fn parsed<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn flag(key: &str) -> bool {
    env::var(key).map(|v| is_truthy(&v)).unwrap_or(false)
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn positive(value: u64, default: u64) -> u64 {
    if value == 0 { default } else { value }
}
