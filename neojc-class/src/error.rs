use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("Duplicate class: {0}")]
    DuplicateClass(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
