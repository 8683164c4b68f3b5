use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrderDbError {
    #[error("The order record carries an empty order ID")]
    EmptyOrderId,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Could not run database migrations: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}
