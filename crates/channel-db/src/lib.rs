pub mod channels;
pub mod migrate;
pub mod types;

pub use sqlx::sqlite::SqlitePool;
pub use types::*;

use sqlx::sqlite::SqlitePoolOptions;
use tracing::info;

/// Open a connection pool to the record store
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    info!("Connecting to database...");
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    info!("Database connection established");
    Ok(pool)
}
