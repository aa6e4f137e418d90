use serenity::all::{ApplicationId, GuildId};
use std::{net::SocketAddr, time::Duration};
use url::Url;

use crate::server::{
    discord::RetryPolicy,
    error::{config::ConfigError, AppError},
    service::clear::engine::ClearPacing,
    util::parse::{parse_env_flag, parse_env_snowflake, parse_env_value},
};

const DISCORD_API_URL: &str = "https://discord.com/api/v10";
const BIND_ADDRESS: &str = "0.0.0.0:8787";

pub struct Config {
    pub discord_token: String,
    pub application_id: ApplicationId,
    pub guild_id: Option<GuildId>,
    pub discord_api_url: String,

    pub bind_address: SocketAddr,
    pub register_commands: bool,

    pub pacing: ClearPacing,
    pub retry: RetryPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self::from_lookup(|name| std::env::var(name).ok())?)
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let required = |name: &str| {
            var(name).ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
        };

        let millis = |name: &str, default: u64| -> Result<Duration, ConfigError> {
            match var(name) {
                Some(value) => parse_env_value::<u64>(name, &value).map(Duration::from_millis),
                None => Ok(Duration::from_millis(default)),
            }
        };

        let discord_token = required("DISCORD_TOKEN")?;
        let application_id = ApplicationId::new(parse_env_snowflake(
            "DISCORD_APPLICATION_ID",
            &required("DISCORD_APPLICATION_ID")?,
        )?);
        let guild_id = var("DISCORD_GUILD_ID")
            .map(|value| parse_env_snowflake("DISCORD_GUILD_ID", &value).map(GuildId::new))
            .transpose()?;

        let discord_api_url = var("DISCORD_API_URL").unwrap_or_else(|| DISCORD_API_URL.to_string());
        if let Err(e) = Url::parse(&discord_api_url) {
            return Err(ConfigError::InvalidEnvVar {
                name: "DISCORD_API_URL".to_string(),
                value: discord_api_url,
                reason: e.to_string(),
            });
        }

        let bind_address = parse_env_value::<SocketAddr>(
            "BIND_ADDRESS",
            &var("BIND_ADDRESS").unwrap_or_else(|| BIND_ADDRESS.to_string()),
        )?;
        let register_commands = var("REGISTER_COMMANDS")
            .map(|value| parse_env_flag("REGISTER_COMMANDS", &value))
            .transpose()?
            .unwrap_or(false);

        let defaults = ClearPacing::default();
        let pacing = ClearPacing {
            page_delay: millis("CLEAR_PAGE_DELAY_MS", defaults.page_delay.as_millis() as u64)?,
            delete_delay: millis(
                "CLEAR_DELETE_DELAY_MS",
                defaults.delete_delay.as_millis() as u64,
            )?,
            progress_interval: var("CLEAR_PROGRESS_INTERVAL")
                .map(|value| parse_env_value::<u32>("CLEAR_PROGRESS_INTERVAL", &value))
                .transpose()?
                .unwrap_or(defaults.progress_interval),
        };

        let retry = RetryPolicy {
            fallback_delay: millis(
                "RATE_LIMIT_FALLBACK_MS",
                RetryPolicy::default().fallback_delay.as_millis() as u64,
            )?,
            max_delay: var("RATE_LIMIT_MAX_MS")
                .map(|value| {
                    parse_env_value::<u64>("RATE_LIMIT_MAX_MS", &value).map(Duration::from_millis)
                })
                .transpose()?,
        };

        Ok(Self {
            discord_token,
            application_id,
            guild_id,
            discord_api_url,
            bind_address,
            register_commands,
            pacing,
            retry,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Config::from_lookup(|name| vars.get(name).cloned())
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("DISCORD_TOKEN", "secret"),
        ("DISCORD_APPLICATION_ID", "1234"),
    ];

    #[test]
    fn applies_defaults() {
        let config = config(&REQUIRED).unwrap();

        assert_eq!(config.application_id, ApplicationId::new(1234));
        assert_eq!(config.guild_id, None);
        assert_eq!(config.discord_api_url, DISCORD_API_URL);
        assert_eq!(config.bind_address.port(), 8787);
        assert!(!config.register_commands);
        assert_eq!(config.pacing, ClearPacing::default());
        assert_eq!(config.retry, RetryPolicy::default());
    }

    #[test]
    fn reports_missing_token() {
        let err = config(&[("DISCORD_APPLICATION_ID", "1234")]).err().unwrap();

        assert!(matches!(err, ConfigError::MissingEnvVar(name) if name == "DISCORD_TOKEN"));
    }

    #[test]
    fn reports_missing_application_id() {
        let err = config(&[("DISCORD_TOKEN", "secret")]).err().unwrap();

        assert!(
            matches!(err, ConfigError::MissingEnvVar(name) if name == "DISCORD_APPLICATION_ID")
        );
    }

    #[test]
    fn reads_overrides() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("DISCORD_GUILD_ID", "99"),
            ("DISCORD_API_URL", "http://127.0.0.1:9000/api"),
            ("BIND_ADDRESS", "127.0.0.1:3000"),
            ("REGISTER_COMMANDS", "true"),
            ("CLEAR_PAGE_DELAY_MS", "250"),
            ("CLEAR_DELETE_DELAY_MS", "500"),
            ("CLEAR_PROGRESS_INTERVAL", "0"),
            ("RATE_LIMIT_FALLBACK_MS", "2000"),
            ("RATE_LIMIT_MAX_MS", "30000"),
        ]);

        let config = config(&vars).unwrap();

        assert_eq!(config.guild_id, Some(GuildId::new(99)));
        assert_eq!(config.discord_api_url, "http://127.0.0.1:9000/api");
        assert_eq!(config.bind_address.to_string(), "127.0.0.1:3000");
        assert!(config.register_commands);
        assert_eq!(config.pacing.page_delay, Duration::from_millis(250));
        assert_eq!(config.pacing.delete_delay, Duration::from_millis(500));
        assert_eq!(config.pacing.progress_interval, 0);
        assert_eq!(config.retry.fallback_delay, Duration::from_secs(2));
        assert_eq!(config.retry.max_delay, Some(Duration::from_secs(30)));
    }

    #[test]
    fn rejects_relative_api_url() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("DISCORD_API_URL", "discord.com/api"));

        assert!(matches!(
            config(&vars),
            Err(ConfigError::InvalidEnvVar { name, .. }) if name == "DISCORD_API_URL"
        ));
    }

    #[test]
    fn rejects_non_numeric_delay() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("CLEAR_DELETE_DELAY_MS", "slow"));

        assert!(config(&vars).is_err());
    }
}
