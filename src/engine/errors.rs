use crate::engine::config::WidgetOptionsError;

#[derive(Debug, thiserror::Error)]
pub enum ConsentError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid widget options: {0}")]
    InvalidOptions(#[from] WidgetOptionsError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Mount point rejected the widget: {0}")]
    Mount(String),

    #[error("Widget has been torn down")]
    WidgetClosed,
}
