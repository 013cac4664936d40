use crate::ConfigError;
use std::env;
use url::Url;

/// Load a variable from the environment
pub fn load_string(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::missing(key))
}

/// Load a variable from the environment
pub fn load_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|val| !val.is_empty())
}

/// Load a variable from the environment
pub fn load_u64_opt(key: &str) -> Result<Option<u64>, ConfigError> {
    load_string_opt(key).map(|val| val.parse::<u64>()).transpose().map_err(Into::into)
}

/// Load a variable from the environment
pub fn load_u32_opt(key: &str) -> Result<Option<u32>, ConfigError> {
    load_string_opt(key).map(|val| val.parse::<u32>()).transpose().map_err(Into::into)
}

/// Load a variable from the environment. Accepts `true`/`false`/`1`/`0`,
/// case-insensitively.
pub fn load_bool_opt(key: &str) -> Result<Option<bool>, ConfigError> {
    let Some(val) = load_string_opt(key) else { return Ok(None) };
    match val.to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(Some(true)),
        "false" | "0" => Ok(Some(false)),
        _ => Err(ConfigError::ParseBool(key.to_string())),
    }
}

/// Load a variable from the environment
pub fn load_url(key: &str) -> Result<Url, ConfigError> {
    load_string(key)?.parse().map_err(Into::into)
}

/// Load a variable from the environment
pub fn load_url_opt(key: &str) -> Result<Option<Url>, ConfigError> {
    load_string_opt(key).map(|val| val.parse::<Url>()).transpose().map_err(Into::into)
}
