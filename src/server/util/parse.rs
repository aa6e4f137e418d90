use std::str::FromStr;

use crate::server::error::config::ConfigError;

/// Parses an environment variable value into `T`.
///
/// # Arguments
/// - `name` - Variable name, used in the error
/// - `value` - The raw value to parse
///
/// # Returns
/// - `Ok(T)` - Successfully parsed value
/// - `Err(ConfigError::InvalidEnvVar)` - The value does not parse as `T`
pub fn parse_env_value<T>(name: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            name: name.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        })
}

/// Parses a boolean flag. Accepts `true`/`false`, `1`/`0`, and `yes`/`no` in any case.
pub fn parse_env_flag(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        _ => Err(ConfigError::InvalidEnvVar {
            name: name.to_string(),
            value: value.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}

/// Parses a Discord snowflake id. Zero is rejected since no Discord object has id 0.
pub fn parse_env_snowflake(name: &str, value: &str) -> Result<u64, ConfigError> {
    match parse_env_value::<u64>(name, value)? {
        0 => Err(ConfigError::InvalidEnvVar {
            name: name.to_string(),
            value: value.to_string(),
            reason: "id must be non-zero".to_string(),
        }),
        id => Ok(id),
    }
}
