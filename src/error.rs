use thiserror::Error;

#[derive(Error, Debug)]
pub enum StreamError {
    #[error("Internal channel closed")]
    ChannelClosed,

    #[error("Failed to parse JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Unknown task: {0}")]
    UnknownTask(String),

    #[error("Task already has a live session: {0}")]
    DuplicateTask(String),

    #[error("Session task ended abnormally: {0}")]
    SessionAborted(String),

    #[error("Result store failure: {0}")]
    StoreError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}
