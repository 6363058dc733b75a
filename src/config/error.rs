use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found; please check if '{0}' exists.")]
    ConfigFileNotFoundError(String),

    #[error("Required field '{0}' is not found; please set '{0}' in '{1}'.")]
    RequiredFieldNotFound(String, String),

    #[error("Unable to locate the home directory; please set $HOME.")]
    HomeDirectoryNotFoundError,

    #[error("Lua runtime error: {0}")]
    LuaRuntimeError(String),

    #[error("Invalid value for '{0}' in '{1}': {2}")]
    InvalidField(String, String, String),
}
