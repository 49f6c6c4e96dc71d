use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrreryError {
    #[error("NEO catalog unavailable: {0}")]
    CatalogUnavailable(String),

    #[error("NEO catalog rate limit exceeded (HTTP 429)")]
    RateLimited,

    #[error("Unable to resolve details for NEO {id}: {reason}")]
    DetailResolutionFailure { id: String, reason: String },

    #[error("Malformed catalog response: {0}")]
    MalformedResponse(String),

    #[error("Unable to read cached catalog: {0}")]
    CacheReadFailure(String),

    #[error("Unable to write cached catalog: {0}")]
    CacheWriteFailure(String),

    #[error("HTTP reqwest error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unable to perform file operation: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON (de)serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("UTF-8 Path error: {0}")]
    Utf8PathError(String),

    #[error("Base dir creation error for the catalog cache: {0}")]
    UnableToCreateBaseDir(String),
}

impl PartialEq for OrreryError {
    fn eq(&self, other: &Self) -> bool {
        use OrreryError::*;
        match (self, other) {
            (CatalogUnavailable(a), CatalogUnavailable(b)) => a == b,
            (MalformedResponse(a), MalformedResponse(b)) => a == b,
            (CacheReadFailure(a), CacheReadFailure(b)) => a == b,
            (CacheWriteFailure(a), CacheWriteFailure(b)) => a == b,
            (
                DetailResolutionFailure { id: a, reason: ra },
                DetailResolutionFailure { id: b, reason: rb },
            ) => a == b && ra == rb,
            (Utf8PathError(a), Utf8PathError(b)) => a == b,
            (UnableToCreateBaseDir(a), UnableToCreateBaseDir(b)) => a == b,

            // wrapped errors are not comparable: same variant is enough
            (Http(_), Http(_)) => true,
            (Io(_), Io(_)) => true,
            (Json(_), Json(_)) => true,

            (RateLimited, RateLimited) => true,

            _ => false,
        }
    }
}
