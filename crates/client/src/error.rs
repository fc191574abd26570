/// Error type for calls to the remote REST API.
///
/// The form layer only distinguishes success from failure; the variants
/// exist for logging and for the message shown in the error banner.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote server returned a non-2xx status code.
    #[error("API returned HTTP {0}")]
    HttpStatus(u16),

    /// The envelope reported `success: false`.
    #[error("API rejected the request: {0}")]
    Rejected(String),

    /// The response body did not match the expected shape.
    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Client configuration could not be loaded.
    #[error("Invalid client configuration: {0}")]
    Config(String),
}
