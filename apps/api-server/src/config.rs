//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use remarks_core::Limits;
use remarks_infra::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub limits: Limits,
}

/// Parse `key` from the environment, falling back to `default` when unset or
/// unparseable.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid value `{raw}` for `{key}`");
            default
        }),
        Err(_) => default,
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| {
            let defaults = DatabaseConfig::new(url);
            DatabaseConfig {
                max_connections: env_or("DB_MAX_CONNECTIONS", defaults.max_connections),
                min_connections: env_or("DB_MIN_CONNECTIONS", defaults.min_connections),
                sql_logging: env_or("DB_SQL_LOGGING", defaults.sql_logging),
                ..defaults
            }
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env_or("PORT", 8080),
            database,
            limits: Self::limits_from_env(),
        }
    }

    /// Length limits and page size.
    /// Example: MAX_COMMENT_LENGTH=500 COMMENTS_PAGE_SIZE=25
    fn limits_from_env() -> Limits {
        let defaults = Limits::default();

        let page_size = env_or("COMMENTS_PAGE_SIZE", defaults.comments_page_size);
        let comments_page_size = if page_size == 0 {
            tracing::warn!(
                "COMMENTS_PAGE_SIZE must be positive, using {}",
                defaults.comments_page_size
            );
            defaults.comments_page_size
        } else {
            page_size
        };

        Limits {
            max_post_title_length: env_or("MAX_POST_TITLE_LENGTH", defaults.max_post_title_length),
            max_post_content_length: env_or(
                "MAX_POST_CONTENT_LENGTH",
                defaults.max_post_content_length,
            ),
            max_comment_length: env_or("MAX_COMMENT_LENGTH", defaults.max_comment_length),
            comments_page_size,
        }
    }
}
