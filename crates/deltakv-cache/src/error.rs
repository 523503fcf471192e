use thiserror::Error;

/// Errors from loading cache configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration text is not valid TOML or has unknown fields.
    #[error("invalid cache config: {0}")]
    Parse(#[from] toml::de::Error),
}
