use astra::Response;
use thiserror::Error;

/// Errors surfaced at the HTTP boundary.
///
/// Query failures (`MalformedInput`, `InvalidQuery`, `StoreUnavailable`)
/// come from the query path; the rest come from routing and asset delivery.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Request body missing, not JSON, or coordinate fields not numeric.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Coordinate out of range, or a non-positive catchment radius.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Backing store unreachable or index not loaded yet. Retryable.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// The query finished after the configured deadline; result discarded.
    #[error("deadline exceeded after {0} ms")]
    DeadlineExceeded(u128),

    #[error("not found")]
    NotFound,

    /// Requested byte range lies outside the file.
    #[error("range not satisfiable")]
    RangeNotSatisfiable { len: u64 },

    #[error("internal error: {0}")]
    Internal(String),
}

// Type alias commonly used by route handlers.
pub type ResultResp = Result<Response, ServerError>;

impl ServerError {
    pub fn status(&self) -> u16 {
        match self {
            ServerError::MalformedInput(_) | ServerError::InvalidQuery(_) => 400,
            ServerError::StoreUnavailable(_) | ServerError::DeadlineExceeded(_) => 503,
            ServerError::NotFound => 404,
            ServerError::RangeNotSatisfiable { .. } => 416,
            ServerError::Internal(_) => 500,
        }
    }

    /// Stable machine-readable code placed next to the message.
    pub fn code(&self) -> &'static str {
        match self {
            ServerError::MalformedInput(_) => "malformed_input",
            ServerError::InvalidQuery(_) => "invalid_query",
            ServerError::StoreUnavailable(_) => "store_unavailable",
            ServerError::DeadlineExceeded(_) => "deadline_exceeded",
            ServerError::NotFound => "not_found",
            ServerError::RangeNotSatisfiable { .. } => "range_not_satisfiable",
            ServerError::Internal(_) => "internal",
        }
    }
}

impl From<rusqlite::Error> for ServerError {
    fn from(e: rusqlite::Error) -> Self {
        ServerError::StoreUnavailable(format!("database error: {e}"))
    }
}
