/// Errors that can occur when talking to a provider API.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Credentials were missing or incomplete before any request was made.
    #[error("API credentials not configured: {0}")]
    MissingCredentials(String),

    /// Network-level failure: connect, TLS, or timeout.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The provider answered with a non-success HTTP status.
    #[error("Provider returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The provider reported an application-level error.
    #[error("Provider error: {0}")]
    Api(String),

    /// The response body did not match the expected shape.
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}
