//! Error types exposed by the data gateway layer.

use thiserror::Error;

/// Errors surfaced while talking to the boat data service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DataError {
    /// The configured service URL could not be parsed or extended.
    #[error("data service URL is invalid: {0}")]
    InvalidUrl(String),

    /// The access token was rejected by the data service.
    #[error("data service rejected the token: {message}")]
    Authentication {
        /// Message returned with the 401/403 response.
        message: String,
    },

    /// The data service answered with a non-success status.
    #[error("data service error ({status}): {message}")]
    Api {
        /// HTTP status code of the response.
        status: u16,
        /// Message describing the failure, taken from the response body.
        message: String,
    },

    /// Networking failed while calling the data service.
    #[error("network error talking to the data service: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// The response body did not match the expected record shape.
    #[error("failed to decode data service response: {message}")]
    Decode {
        /// Deserialisation error detail.
        message: String,
    },

    /// Configuration could not be loaded or is incomplete.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// A reactive query was executed before parameters were bound to it.
    #[error("query has no bound parameters")]
    UnboundQuery,
}

impl DataError {
    /// Returns the service-facing message without the variant prefix.
    ///
    /// Notifications show this text, mirroring what the data service said
    /// rather than how the client classified it.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::InvalidUrl(message) => message.clone(),
            Self::Authentication { message }
            | Self::Api { message, .. }
            | Self::Network { message }
            | Self::Decode { message }
            | Self::Configuration { message }
            | Self::Io { message } => message.clone(),
            Self::UnboundQuery => self.to_string(),
        }
    }
}
