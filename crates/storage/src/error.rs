use thiserror::Error;

/// Errors that can occur when reading or writing shop data.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The email is already on the subscriber list.
    #[error("Already subscribed: {0}")]
    AlreadySubscribed(String),

    /// An order with this id has already been stored.
    #[error("Duplicate order: {0}")]
    DuplicateOrder(String),

    /// A value does not fit the column it is stored in.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
