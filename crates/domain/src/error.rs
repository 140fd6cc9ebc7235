/// Shared error type used across all report crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config: {0}")]
    Config(String),

    #[error("invalid params: {0}")]
    InvalidParams(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("link resolution: {0}")]
    LinkResolution(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
