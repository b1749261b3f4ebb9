//! Connection pool setup and table bootstrap.

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Schema};

use crate::config::DatabaseConfig;
use crate::entities::post;

/// Opens the pool. Every statement borrows a connection for its own duration
/// and hands it back on drop, whatever the outcome.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .sqlx_logging(config.log_statements);

    let db = Database::connect(options).await?;
    tracing::info!(backend = ?db.get_database_backend(), "database connected");
    Ok(db)
}

/// Creates the `posts` table from the entity definition unless it already exists.
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let mut table = Schema::new(backend).create_table_from_entity(post::Entity);
    table.if_not_exists();
    db.execute(backend.build(&table)).await?;
    Ok(())
}
