
mod config;
mod tasks;

use mealie_api::{Credentials, MealieClient};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the reports
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
    .init();

    let config = config::read().await?;

    let credentials = Credentials::load(&config.credentials)?;
    let client = MealieClient::new(&credentials)?;

    for task in &config.tasks {
        tasks::run(task, &config, &credentials, &client).await?;
    }

    Ok(())
}
