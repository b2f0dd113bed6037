pub mod sqlite;

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::core::{error::Result, NewUser, User};

#[cfg(feature = "tracing")]
use tracing::info;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_table(&self) -> Result<()>;
    async fn insert(&self, user: &NewUser) -> Result<User>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn list(&self) -> Result<Vec<User>>;
}

/// Opens the pool, creating the database file if it does not exist yet.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = if is_memory(database_url) {
        // Every connection to `:memory:` is its own database, so hold exactly one forever.
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?
    } else {
        SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await?
    };
    #[cfg(feature = "tracing")]
    info!(url = %database_url, "Connected to SQLite");
    Ok(pool)
}

fn is_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}
