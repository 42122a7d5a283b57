use thiserror::Error;

#[derive(Error, Debug)]
pub enum GpError {
    #[error("Unknown type: {0}")]
    UnknownType(String),

    #[error("Unknown rule id: {0}")]
    UnknownRule(usize),

    #[error("Type {ty} cannot be completed within depth {max_depth}")]
    DepthBudget { ty: String, max_depth: usize },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Loss evaluation failed: {0}")]
    Loss(#[source] anyhow::Error),

    #[error("Evaluation error: {0}")]
    Evaluation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GpError>;
