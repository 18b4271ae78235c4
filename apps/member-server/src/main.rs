//! HTTP server for the member service

mod config;

use anyhow::{Context, Result};
use clap::Parser;
use config::AppConfig;
use member_service::{Member, MemberServiceModule, Team};
use std::path::PathBuf;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "member-server", about = "Paginated member and team HTTP service")]
struct Args {
    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address, overriding the configuration
    #[arg(short, long)]
    bind: Option<String>,

    /// Members to seed at startup, overriding the configuration
    #[arg(long)]
    seed: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(seed) = args.seed {
        config.seed_members = seed;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    let module = MemberServiceModule::new(config.member_service.clone());
    seed(&module, config.seed_members)?;

    let app = module.router().layer(TraceLayer::new_for_http());
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "member server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")
}

/// Insert two teams and `count` members alternating between them
fn seed(module: &MemberServiceModule, count: u32) -> Result<()> {
    if count == 0 {
        return Ok(());
    }
    let service = module.service();
    let team_a = service.save_team(&Team::new("teamA"))?;
    let team_b = service.save_team(&Team::new("teamB"))?;
    for i in 1..=count {
        let team = if i % 2 == 0 { &team_a } else { &team_b };
        service.save_member(&Member::with_team(format!("member{i}"), i, team))?;
    }
    info!(members = count, "seeded sample data");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    info!("shutting down");
}
