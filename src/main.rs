mod model;
mod server;

use tokio::net::TcpListener;
use tokio_util::task::TaskTracker;

use crate::server::{config::Config, error::AppError, router, startup};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    startup::init_tracing();

    let config = Config::from_env()?;

    let http_client = startup::setup_reqwest_client()?;
    let discord = startup::setup_discord_client(&config, http_client);

    startup::register_commands(&config, &discord).await?;

    let tasks = TaskTracker::new();
    let state = startup::setup_state(&config, discord, tasks.clone());
    let app = router::router().with_state(state);

    let listener = TcpListener::bind(config.bind_address).await?;
    tracing::info!("Listening for interactions on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(startup::shutdown_signal())
        .await?;

    tasks.close();
    if !tasks.is_empty() {
        tracing::info!("Waiting for {} clear runs to finish", tasks.len());
    }
    tasks.wait().await;

    tracing::info!("Shut down cleanly");

    Ok(())
}
