// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Tokengate server binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokengate_server::{create_app_state, create_router};
use tokengate_server_config::LogFormat;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Tokengate server - exchanges CI OIDC tokens for secrets.
#[derive(Parser, Debug)]
#[command(
	name = "tokengate-server",
	about = "Exchange CI OIDC tokens for secrets",
	version
)]
struct Args {
	/// Config file to read instead of /etc/tokengate/server.toml
	#[arg(long, env = "TOKENGATE_SERVER_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version information
	Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!("tokengate-server {}", env!("CARGO_PKG_VERSION"));
		return Ok(());
	}

	// Load .env file if present
	dotenvy::dotenv().ok();

	let config = match &args.config {
		Some(path) => tokengate_server_config::load_config_with_file(path)?,
		None => tokengate_server_config::load_config()?,
	};

	let json = config.logging.format == LogFormat::Json;
	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| config.logging.level.clone().into()),
		)
		.with((!json).then(tracing_subscriber::fmt::layer))
		.with(json.then(|| tracing_subscriber::fmt::layer().json()))
		.init();

	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		tenants = config.tenants.len(),
		"starting tokengate-server"
	);

	let state = create_app_state(&config)?;
	let app = create_router(state).layer(TraceLayer::new_for_http());

	let addr = config.socket_addr();
	tracing::info!("listening on {}", addr);
	let listener = tokio::net::TcpListener::bind(&addr).await?;

	tokio::select! {
		result = axum::serve(listener, app) => {
			if let Err(e) = result {
				tracing::error!(error = %e, "Server error");
			}
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Received shutdown signal");
		}
	}

	tracing::info!("Server shutdown complete");
	Ok(())
}
