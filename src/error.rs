use thiserror::Error;

/// Gateway error types
#[derive(Error, Debug, Clone)]
pub enum GatewayError {
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for gateway state operations
pub type GatewayResult<T> = Result<T, GatewayError>;
