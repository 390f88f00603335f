use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("preview request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("preview endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("no tokio runtime available to run the preview fetch")]
    NoRuntime,

    #[error("unknown embed button: {0}")]
    UnknownButton(String),

    #[error("no embed button given and the selected marker names none")]
    MissingButton,

    #[error("invalid preview base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),
}
