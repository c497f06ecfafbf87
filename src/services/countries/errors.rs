use http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CountryError {
    #[error("Country list request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Country list responded with status {0}")]
    Status(StatusCode),
    #[error("Country list returned an invalid response: {0}")]
    InvalidResponse(String),
}
