use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("catalog returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}
