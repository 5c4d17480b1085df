/// Errors when loading or registering partial declarations
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The declarations could not be parsed
    #[error("Partial declarations could not be parsed: {0}")]
    Parse(String),
    /// The service already has a declaration
    #[error("Partial service '{0}' is already declared")]
    AlreadyDeclared(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(error: toml::de::Error) -> Self {
        Self::Parse(error.to_string())
    }
}
