//! Opswatch Console - dashboard client for the security-operations demo backend
//!
//! The console client:
//! - Polls the backend status endpoint and projects each snapshot onto the
//!   console view (threat banner, metric tiles, chart, agents, digital
//!   twin, cloud-service counters)
//! - Fabricates a synthetic threat log at startup
//! - Accepts interactive commands on stdin for the simulated actions
//!   (threat injection, service sync, connection test, agent control)

mod agents;
mod api;
mod clock;
mod config;
mod controller;
mod models;
mod render;
mod threatlog;
mod view;

use agents::{AgentAction, AgentName};
use anyhow::{Context, Result};
use api::ApiClient;
use clock::TokioClock;
use config::DashboardConfig;
use controller::{Command, DashboardController};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};
use view::ConsoleView;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    info!("Opswatch console starting...");

    let config = DashboardConfig::load_or_init()
        .await
        .context("Failed to load configuration")?;

    let api = ApiClient::new(
        &config.api.base_url,
        Duration::from_secs(config.api.request_timeout_secs),
    )
    .context("Failed to build API client")?;

    let mut controller = DashboardController::new(
        config,
        api,
        Box::new(ConsoleView::new()),
        Arc::new(TokioClock),
    );

    controller
        .init()
        .await
        .context("Failed to initialize dashboard")?;

    spawn_input_reader(controller.sender());

    controller.run().await.context("Dashboard loop failed")?;

    Ok(())
}

/// Reads stdin lines and forwards parsed commands to the controller.
fn spawn_input_reader(tx: UnboundedSender<Command>) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        while let Ok(Some(line)) = lines.next_line().await {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match parse_command(line) {
                Some(command) => {
                    if tx.send(command).is_err() {
                        break;
                    }
                }
                None => warn!("unrecognized command: {line}"),
            }
        }
    });
}

/// Command syntax:
/// - `refresh`
/// - `hide` / `show`
/// - `threat <type words...> <severity>`
/// - `sync <service>`
/// - `test <service>`
/// - `agent <watcher|analyzer|remediator> <start|pause|reset>`
/// - `quit`
fn parse_command(line: &str) -> Option<Command> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    match tokens.as_slice() {
        ["refresh"] => Some(Command::Refresh),
        ["hide"] => Some(Command::SetVisible(false)),
        ["show"] => Some(Command::SetVisible(true)),
        ["quit"] | ["exit"] => Some(Command::Shutdown),
        ["sync", service] => Some(Command::SyncService {
            service: service.to_string(),
        }),
        ["test", service] => Some(Command::TestConnection {
            service: service.to_string(),
        }),
        ["agent", name, action] => {
            let agent = AgentName::parse(name)?;
            let action = AgentAction::parse(action)?;
            Some(Command::ControlAgent { agent, action })
        }
        ["threat", middle @ .., severity] if !middle.is_empty() => {
            Some(Command::SimulateThreat {
                threat_type: middle.join(" "),
                severity: severity.to_string(),
            })
        }
        _ => None,
    }
}
