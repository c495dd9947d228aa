use thiserror::Error;

#[derive(Debug, Error)]
pub enum NebulaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[error("invalid dataset: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid dataset source: {0}")]
    InvalidSource(String),

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid config value: {0}")]
    ConfigValue(String),

    #[error("window error: {0}")]
    Window(#[from] minifb::Error),
}

pub type Result<T> = std::result::Result<T, NebulaError>;
