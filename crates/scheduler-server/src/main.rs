use anyhow::Context;
use clap::Parser;
use scheduler_core::db;
use scheduler_core::recurrence::{next_date, parse_date};
use scheduler_core::repository::SqliteRepository;
use scheduler_core::service::TaskService;
use tracing_subscriber::EnvFilter;

mod api;
mod cli;
mod config;
mod static_files;

use cli::{Cli, Commands, NextDateCommand};
use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();
    let mut config = Config::new(cli.config.as_deref()).context("failed to load configuration")?;

    // RUST_LOG wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded environment file"),
        Err(_) => tracing::debug!("no .env file found"),
    }

    match cli.command.unwrap_or_default() {
        Commands::Serve(command) => {
            config.apply_overrides(&command);
            serve(config).await
        }
        Commands::NextDate(command) => print_next_date(command),
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let db_path = config.database_path();
    let pool = db::establish_connection(&db_path)
        .await
        .with_context(|| format!("failed to open database {}", db_path.display()))?;

    let service = TaskService::new(SqliteRepository::new(pool));
    let state = api::AppState::new(service, config.search_limit, config.web_dir.clone());
    let app = api::router(state);

    let addr = config.listen_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        database = %db_path.display(),
        web_dir = %config.web_dir.display(),
        "scheduler listening on http://{local_addr}"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("scheduler stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

fn print_next_date(command: NextDateCommand) -> anyhow::Result<()> {
    let now = match command.now.as_deref() {
        Some(text) => parse_date(text).context("invalid --now")?,
        None => chrono::Local::now().date_naive(),
    };
    let next = next_date(now, &command.date, &command.repeat)?;
    println!("{}", next);
    Ok(())
}
