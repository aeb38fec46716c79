#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
    /// Non-2xx reply from the layout service. `message` is already
    /// user-presentable: either the server's own text or the generic
    /// fallback when the body carried none.
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("config error: {0}")]
    Config(String),
    #[error("{0}")]
    Other(String),
}
