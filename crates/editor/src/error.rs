use thiserror::Error;

/// Errors produced while decoding persisted page content.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("content is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("content root must be a `doc` node, got `{0}`")]
    NotADocument(String),
}
