//! Warehouse client errors
//!
//! Failures from the query execution service. The detail carried here is
//! for server-side logs; the HTTP layer maps every variant to a generic
//! 500 and never forwards the text to callers.

use thiserror::Error;

/// Result type for warehouse operations
pub type WarehouseResult<T> = Result<T, WarehouseError>;

/// Warehouse execution errors
#[derive(Debug, Error)]
pub enum WarehouseError {
    /// Client-side configuration was unusable (bad credential, bad URL)
    #[error("invalid warehouse configuration: {0}")]
    Config(String),

    /// Network-level failure reaching the warehouse API
    #[error("warehouse transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("warehouse API error ({status}): {detail}")]
    Api { status: u16, detail: String },

    /// The query did not complete within the request deadline
    #[error("warehouse query did not complete within the request deadline")]
    Incomplete,

    /// The response payload did not match the expected wire shape
    #[error("malformed warehouse response: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_carries_detail_for_logs() {
        let err = WarehouseError::Api {
            status: 403,
            detail: "quotaExceeded".to_string(),
        };
        assert!(err.to_string().contains("403"));
        assert!(err.to_string().contains("quotaExceeded"));
    }
}
