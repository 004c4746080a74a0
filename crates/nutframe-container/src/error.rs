/// Errors that can occur while loading a container description.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    /// The description file could not be read.
    #[error("failed to load container description: {0}")]
    LoadFailed(String),

    /// The description is not valid JSON for the expected shape.
    #[error("container description is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The description is well-formed JSON but describes an invalid container.
    #[error("invalid container description: {0}")]
    InvalidDescription(String),
}

pub type Result<T> = std::result::Result<T, ContainerError>;
