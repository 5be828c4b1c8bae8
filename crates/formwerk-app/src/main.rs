// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Formwerk — text to branded DOCX document service
//
// Entry point. Initialises logging, loads configuration and runs the HTTP
// service until Ctrl-C.

mod services;

use std::process::ExitCode;

use formwerk_server::DocumentServer;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Formwerk starting");

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Formwerk exited with an error");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> formwerk_core::error::Result<()> {
    let config = services::config_loader::load_from_env()?;
    let mut server = DocumentServer::new(config);
    server.start().await?;

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for Ctrl-C, shutting down");
    }

    tracing::info!(
        active_connections = server.active_connections(),
        "shutdown requested"
    );
    server.stop().await
}
