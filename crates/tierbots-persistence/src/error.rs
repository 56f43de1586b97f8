//! Errors surfaced by loading/saving a `ServerState`.

use tierbots_common::error::ContractError;

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Contract(#[from] ContractError),

    #[error("malformed .npy file: {0}")]
    MalformedNpy(String),

    #[error("failed to decode structured blob: {0}")]
    Decode(String),

    #[error("failed to encode structured blob: {0}")]
    Encode(String),
}
