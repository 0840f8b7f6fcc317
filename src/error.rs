use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FieldError {
    #[error("Unknown field {0}")]
    UnknownField(String),

    #[error("{0} is required")]
    Empty(&'static str),

    #[error("{0} must be a number")]
    NotANumber(&'static str),

    #[error("{field} has no option {value}")]
    UnknownOption { field: &'static str, value: String },
}
