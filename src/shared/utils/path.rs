use std::path::{Path, PathBuf};

use crate::config::error::ConfigError;

const APP_DIR: &str = "freetime";

fn home() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::HomeDirectoryNotFoundError)
}

/// `~/.config/freetime/config.lua`
pub fn default_config_file() -> Result<PathBuf, ConfigError> {
    Ok(home()?.join(".config").join(APP_DIR).join("config.lua"))
}

/// `~/.local/share/freetime/oauth`, where the OAuth token is cached.
pub fn default_token_file() -> Result<PathBuf, ConfigError> {
    Ok(home()?
        .join(".local")
        .join("share")
        .join(APP_DIR)
        .join("oauth"))
}

/// Expands a leading `~` or `~/`. `~user` forms are returned untouched.
pub fn expand_tilde(path: &str) -> PathBuf {
    let rest = match path {
        "~" => "",
        p => match p.strip_prefix("~/") {
            Some(rest) => rest,
            None => return PathBuf::from(path),
        },
    };

    match dirs::home_dir() {
        Some(home) if rest.is_empty() => home,
        Some(home) => home.join(rest),
        None => PathBuf::from(path),
    }
}

/// Renders `path` for messages, abbreviating the home directory to `~`.
pub fn contract_tilde(path: &Path) -> String {
    let Some(home) = dirs::home_dir() else {
        return path.display().to_string();
    };

    match path.strip_prefix(&home) {
        Ok(rest) if rest.as_os_str().is_empty() => "~".to_string(),
        Ok(rest) => format!("~/{}", rest.display()),
        Err(_) => path.display().to_string(),
    }
}
