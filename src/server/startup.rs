use std::sync::Arc;
use tokio_util::task::TaskTracker;
use tracing_subscriber::{prelude::*, EnvFilter};

use crate::server::{
    config::Config,
    discord::{DiscordApi, DiscordClient},
    error::AppError,
    service::{clear::ClearCommand, command::CommandRegistrationService},
    state::AppState,
};

/// Installs the global tracing subscriber.
///
/// The filter is read from `RUST_LOG`, falling back to `ddtbot=info`.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ddtbot=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Builds the shared outbound HTTP client.
///
/// Redirects are disabled: the bot token must only ever be sent to the configured API host.
///
/// # Returns
/// - `Ok(reqwest::Client)` - Configured client
/// - `Err(AppError::ReqwestErr)` - The TLS backend failed to initialise
pub fn setup_reqwest_client() -> Result<reqwest::Client, AppError> {
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .user_agent(concat!("DiscordBot (ddtbot, ", env!("CARGO_PKG_VERSION"), ")"))
        .build()?;

    Ok(client)
}

/// Creates the Discord REST client from configuration.
pub fn setup_discord_client(config: &Config, http: reqwest::Client) -> DiscordClient {
    DiscordClient::new(
        http,
        config.discord_api_url.clone(),
        &config.discord_token,
        config.retry,
    )
}

/// Builds the state shared by request handlers.
///
/// # Arguments
/// - `config` - Application configuration
/// - `discord` - Discord REST client used by background runs
/// - `tasks` - Registry that background clear runs are spawned on
pub fn setup_state(config: &Config, discord: DiscordClient, tasks: TaskTracker) -> AppState {
    let api: Arc<dyn DiscordApi> = Arc::new(discord);
    let clear = ClearCommand::new(api, config.pacing, tasks.clone());

    AppState::new(clear, tasks)
}

/// Publishes the command definitions when `REGISTER_COMMANDS` is enabled.
pub async fn register_commands(config: &Config, discord: &DiscordClient) -> Result<(), AppError> {
    if !config.register_commands {
        tracing::debug!("Skipping command registration");
        return Ok(());
    }

    match config.guild_id {
        Some(guild_id) => tracing::info!("Registering commands for guild {}", guild_id),
        None => tracing::info!("Registering commands globally"),
    }

    CommandRegistrationService::new(discord)
        .register(config.application_id, config.guild_id)
        .await?;

    Ok(())
}

/// Resolves once the process receives Ctrl-C.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }

    tracing::info!("Shutdown signal received");
}
