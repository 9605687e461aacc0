/// Shared error type used across all simply-countdown crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid target date: {0}")]
    InvalidDate(String),
}

pub type Result<T> = std::result::Result<T, Error>;
