use thiserror::Error;

use super::types::SellId;

/// Errors raised by the sell GUI core and its storage layer.
///
/// The domain variants double as the player-facing feedback text: the
/// engine renders them into chat messages instead of propagating them, so
/// no interaction failure ever escapes to the scheduler.
#[derive(Debug, Error)]
pub enum SellGuiError {
    /// Wrapper around sled's error type.
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    /// Wrapper around property JSON encoding and decoding errors.
    #[error("property encoding error: {0}")]
    Json(#[from] serde_json::Error),

    /// Wrapper around IO errors (directory creation, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 decoding of a stored property failed.
    #[error("utf-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// A numeric form field failed the positive-integer rule.
    #[error("Please enter a positive integer for {field}.")]
    InvalidInput { field: &'static str },

    /// A create or edit collided with an id already in the registry.
    #[error("Score ID already assigned to {item_id}.")]
    DuplicateId { sell_id: SellId, item_id: String },

    /// The host has no scoreboard usable as a currency channel.
    #[error("Please define a scoreboard for currency.")]
    NoCurrencyChannel,

    /// Permission grant for a player already on the list.
    #[error("{0} already has permission")]
    AlreadyGranted(String),

    /// Permission revoke for a player not on the list.
    #[error("{0} does not have permission")]
    NotGranted(String),

    /// The owner can never lose permission.
    #[error("the owner's permission cannot be removed")]
    OwnerProtected,
}
