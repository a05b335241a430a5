use anyhow::Context;
use clap::Parser;
use dice_server::{
    api::actix_roll_api::ActixRollApi,
    config::{
        Args,
        ServerConfig,
    },
    telemetry::init_tracing,
};
use fair_dice::Engine;

async fn handle_interrupt() {
    let res = tokio::signal::ctrl_c().await;
    match res {
        Ok(_) => {
            tracing::info!("Received interrupt, exiting");
        }
        Err(_) => {
            tracing::warn!("Received interrupt error, exiting anyway");
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _log_guard = if args.tracing {
        init_tracing(args.log_dir.as_deref()).context("initializing tracing")?
    } else {
        None
    };
    let config = ServerConfig::from(&args);
    if config.allowed_origins.is_empty() {
        tracing::info!("CORS allows any origin");
    } else {
        tracing::info!("CORS restricted to {:?}", config.allowed_origins);
    }

    let api = ActixRollApi::new(&config, Engine::new())
        .await
        .context("starting roll API")?;
    tracing::info!("Starting dice service at {}", api.base_url());

    handle_interrupt().await;
    drop(api);
    tracing::info!("Exiting dice service");
    Ok(())
}
