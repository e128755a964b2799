use std::path::PathBuf;

use anyhow::Context;
use api::{router_from_settings, AppState};
use clap::Parser;
use pipeline::{Pipeline, Settings};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Text/image to music HTTP service.
#[derive(Parser, Debug)]
#[command(name = "tune-api", version)]
struct Args {
    /// TOML settings file; stock defaults when omitted
    #[arg(long, env = "TUNE_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, overrides `bind` from the settings
    #[arg(long, env = "TUNE_BIND")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        settings.bind = bind;
    }

    let pipeline = Pipeline::from_settings(&settings)?;
    let app = router_from_settings(AppState::new(pipeline), &settings);

    let listener = tokio::net::TcpListener::bind(&settings.bind)
        .await
        .with_context(|| format!("binding {}", settings.bind))?;
    tracing::info!("listening on http://{}", settings.bind);
    axum::serve(listener, app).await?;
    Ok(())
}
