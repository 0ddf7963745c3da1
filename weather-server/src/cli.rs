use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use clap::Parser;
use weather_core::{Config, OpenWeatherClient};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-server", version, about = "Weather gateway server")]
pub struct Cli {
    /// Path to the config file; defaults to the platform config directory.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Bind address override, e.g. "0.0.0.0:8080".
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };

        let bind_address = self.bind.unwrap_or(config.bind_address);
        let api_key = config.api_key()?;

        let client = OpenWeatherClient::new(api_key);
        let app = crate::api::create_router(Arc::new(client));

        tracing::info!(address = %bind_address, "starting weather gateway");

        let listener = tokio::net::TcpListener::bind(bind_address).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
