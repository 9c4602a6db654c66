use thiserror::Error;

/// Error type for token operations.
///
/// `TokenExpired` is deliberately a separate variant from `InvalidToken`:
/// callers can prompt a re-login for an expired token while rejecting a
/// tampered one outright.
#[derive(Debug, Clone, Error)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is invalid: {0}")]
    InvalidToken(String),

    #[error("Token is expired")]
    TokenExpired,
}
