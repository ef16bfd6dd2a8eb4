use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),
    /// The server refused to decode the request (malformed key, signature, ...)
    #[error("malformed request: {0}")]
    BadRequest(String),
    #[error("HTTP status {0}: {1}")]
    HttpStatus(StatusCode, String),
}
