use thiserror::Error;

#[derive(Debug, Error)]
pub enum VersionError {
    #[error("Malformed version: {input}")]
    Malformed {
        input: String,
        #[source]
        source: semver::Error,
    },
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected status: {0}")]
    Status(reqwest::StatusCode),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Release cache lock poisoned")]
    CachePoisoned,
}

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error(transparent)]
    Version(#[from] VersionError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Failed to start blocking runtime: {0}")]
    Runtime(#[from] std::io::Error),
}
