//! Parkade terminal simulator.
//!
//! Runs the gate controller against mock hardware: the two presence loops
//! and the keypad are driven from stdin, the LCD is printed to the terminal
//! and gate motor changes are logged.

mod board;
mod commands;
mod terminal;

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser;
use parkade_controller::{GatePins, Orchestrator, Peripherals};
use parkade_core::{ControllerConfig, Level};
use parkade_hardware::{
    TokioClock,
    mock::{MockInput, MockKeypad},
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::{error, info, warn};

use board::{Board, ConsoleKeypad, LoggedOutput};
use commands::{Command, HELP};
use terminal::{Snapshot, TerminalDisplay};

// ── CLI argument definition ───────────────────────────────────────────────────

/// Parking gate controller simulator.
///
/// Example:
///   parkade-sim --config crates/parkade-sim/config/default.json --log-level debug
#[derive(Debug, Parser)]
#[command(name = "parkade-sim", version, about, long_about = None)]
struct Cli {
    /// Path to the JSON controller configuration.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set.
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over --log-level.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .init();

    if let Err(e) = run(cli).await {
        error!("{e:#}");
        // The console task may still be blocked on stdin.
        process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => ControllerConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => {
            warn!("No configuration file provided, using defaults");
            ControllerConfig::default()
        }
    };

    let active = if config.sensors_active_low {
        Level::Low
    } else {
        Level::High
    };
    let (entry_sensor, entry) = MockInput::new(active.inverted());
    let (exit_sensor, exit) = MockInput::new(active.inverted());
    let (keypad, keys) = MockKeypad::new();

    let peripherals = Peripherals {
        keypad: ConsoleKeypad::new(keypad, config.timing.poll_interval()),
        display: TerminalDisplay::new(),
        entry_sensor,
        exit_sensor,
        entry_gate: GatePins::new(
            LoggedOutput::new("entry_fwd"),
            LoggedOutput::new("entry_rev"),
        ),
        exit_gate: GatePins::new(LoggedOutput::new("exit_fwd"), LoggedOutput::new("exit_rev")),
        clock: TokioClock::new(),
    };
    let mut controller =
        Orchestrator::new(&config, peripherals).context("Failed to build controller")?;

    let (status_tx, status_rx) = watch::channel(Snapshot::of(&controller));
    let board = Board {
        entry,
        exit,
        keys,
        active,
    };

    info!(
        total_slots = config.total_slots,
        gate_open_ms = config.timing.gate_open_ms,
        "Simulator ready"
    );
    println!("{HELP}");

    let console = tokio::spawn(console(board, status_rx));

    tokio::select! {
        result = controller.run_with(|c, _| {
            status_tx.send_replace(Snapshot::of(c));
        }) => match result {
            Ok(never) => match never {},
            Err(e) => Err(e).context("Controller stopped"),
        },
        joined = console => {
            joined.context("Console task failed")??;
            let status = *status_tx.borrow();
            info!(%status, "Shutting down");
            Ok(())
        }
    }
}

/// Read commands until `quit` or end of input.
async fn console(board: Board, status: watch::Receiver<Snapshot>) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(command) => board.apply(command, &status)?,
            Err(e) => println!("{e}"),
        }
    }

    Ok(())
}
