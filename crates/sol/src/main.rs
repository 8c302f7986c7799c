// SPDX-FileCopyrightText: 2026 Sol Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sol - a client-side chat outbox pipeline.
//!
//! This is the binary entry point for the Sol CLI.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sol_config::SolConfig;
use sol_core::{ChatStore, ChatTransport, SolError};
use sol_diagnostics::DiagnosticsStore;
use sol_outbox::OutboxEngine;
use sol_storage::SqliteStore;
use sol_transport::HttpChatTransport;

mod diag;
mod drain;
mod retry;
mod send;
mod status;

/// Sol - a client-side chat outbox pipeline.
#[derive(Parser, Debug)]
#[command(name = "sol", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Send a chat message and run one delivery cycle.
    Send {
        /// Existing thread id. A new thread is created when omitted.
        #[arg(long)]
        thread: Option<String>,
        /// Message text to send.
        #[arg(long)]
        message: String,
    },
    /// Process the outbox queue until it is empty.
    Drain {
        /// Run a single delivery cycle instead of draining until empty.
        #[arg(long)]
        once: bool,
    },
    /// Re-queue all failed transmissions.
    Retry,
    /// Show transmissions with status, error, and attempt count.
    Status {
        /// Output structured JSON for scripting.
        #[arg(long)]
        json: bool,
    },
    /// Print the redacted diagnostics export for this run.
    Diag,
}

/// The assembled pipeline. Every service is constructed once here and
/// injected; there are no ambient globals.
struct Stack {
    store: Arc<SqliteStore>,
    diagnostics: Arc<DiagnosticsStore>,
    engine: OutboxEngine,
}

async fn build_stack(config: &SolConfig) -> Result<Stack, SolError> {
    let store = Arc::new(SqliteStore::new(config.storage.clone()));
    store.initialize().await?;

    let diagnostics = Arc::new(DiagnosticsStore::new());
    let transport = Arc::new(HttpChatTransport::new(
        &config.server,
        Arc::clone(&diagnostics),
    )?);
    let engine = OutboxEngine::new(
        Arc::clone(&store) as Arc<dyn ChatStore>,
        transport as Arc<dyn ChatTransport>,
        config.outbox.debug_fail_prefix.as_str(),
    );

    Ok(Stack {
        store,
        diagnostics,
        engine,
    })
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match sol_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            sol_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    // RUST_LOG wins over the configured level when set.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.app.log_level.clone()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let stack = match build_stack(&config).await {
        Ok(stack) => stack,
        Err(e) => {
            eprintln!("sol: failed to start: {e}");
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Send { thread, message } => {
            send::run_send(&stack.store, &stack.engine, thread, &message).await
        }
        Commands::Drain { once } => {
            drain::run_drain(
                &stack.store,
                &stack.engine,
                config.outbox.poll_interval_secs,
                once,
            )
            .await
        }
        Commands::Retry => retry::run_retry(&stack.store, &stack.engine).await,
        Commands::Status { json } => status::run_status(&stack.store, json).await,
        Commands::Diag => diag::run_diag(&stack.diagnostics),
    };

    if let Err(e) = stack.store.close().await {
        tracing::warn!(error = %e, "failed to close store cleanly");
    }

    if let Err(e) = result {
        eprintln!("sol: {e}");
        std::process::exit(1);
    }
}
