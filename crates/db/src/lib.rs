//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Database migrations
//! - Repositories that run each business operation in one database
//!   transaction, asking `loomledger-core` for every rule

#[allow(missing_docs)]
pub mod entities;
pub mod error;
pub mod migration;
pub mod repositories;

pub use error::RepoError;
pub use repositories::{
    DirectoryRepository, ExternalChequeRepository, LedgerRepository, PaymentRepository,
    PersonalChequeRepository, RawStockRepository, ReportRepository, TransactionRepository,
};

use loomledger_shared::config::DatabaseConfig;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use tracing::info;

/// Establishes a connection pool sized from configuration.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    info!(
        backend = ?db.get_database_backend(),
        max_connections = config.max_connections,
        "database connected"
    );
    Ok(db)
}
