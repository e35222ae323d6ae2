use thiserror::Error;

/// Problems with the persisted menu configuration. Fatal to plugin
/// construction, never to the host.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown block `{0}`")]
    UnknownBlock(String),

    #[error("item block #{index} has neither a known command nor an action")]
    InvalidItem { index: usize },

    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Error)]
pub enum MenuError {
    #[error("menu source unavailable: {0}")]
    Unavailable(String),
}
