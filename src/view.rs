//! View binding for the dashboard
//!
//! The rendering core never touches an output device directly; it talks to
//! this trait through named setters. Implementations must tolerate unknown
//! service/counter keys (no-op), mirroring the tolerance for absent display
//! targets. `ConsoleView` is the real implementation; tests use a recording
//! double.

use crate::agents::AgentName;
use crate::models::{SimulatedThreat, ThreatLogEntry};

/// The four metric tiles on the command-center panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricTile {
    ThreatsDetected,
    ThreatsBlocked,
    CpuUsage,
    MemoryUsage,
}

/// Digital-twin gauges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TwinGauge {
    ApplicationHealth,
    ResponseTime,
    ErrorRate,
    Throughput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Testing,
    Connected,
    Failed,
}

impl ConnectionState {
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Testing => "Testing...",
            ConnectionState::Connected => "Connected",
            ConnectionState::Failed => "Failed",
        }
    }
}

pub trait DashboardView: Send {
    /// Threat banner: full class-token set plus display text.
    fn set_threat_banner(&mut self, classes: Vec<String>, text: String);

    fn set_metric(&mut self, tile: MetricTile, value: String);

    /// One of the five performance bars; height already clamped to [10, 100].
    fn set_chart_bar(&mut self, index: usize, height_percent: f64);

    /// Server-reported agent status (label text plus class token).
    fn set_agent_status(&mut self, agent: AgentName, label: String, class: String);

    /// Locally-driven control-panel status label.
    fn set_agent_control_status(&mut self, agent: AgentName, label: String);

    fn set_agent_activity(&mut self, agent: AgentName, lines: Vec<String>);

    fn set_twin_gauge(&mut self, gauge: TwinGauge, value: String);

    fn set_twin_health_bar(&mut self, percent: f64);

    /// Uniform healthy/warning state across all twin nodes.
    fn set_twin_node_state(&mut self, healthy: bool);

    /// Unknown service or counter keys are ignored.
    fn set_service_counter(&mut self, service: &str, counter: &str, value: String);

    fn set_connection_state(&mut self, service: &str, state: ConnectionState);

    fn set_last_sync(&mut self, service: &str, when: String);

    /// Prepend a simulated threat to the event feed display.
    fn push_event(&mut self, event: &SimulatedThreat);

    /// Drop feed entries beyond `max`, oldest first.
    fn trim_events(&mut self, max: usize);

    /// Replace the whole threat-log grid.
    fn replace_threat_log(&mut self, entries: &[ThreatLogEntry]);

    fn show_toast(&mut self, message: String);

    fn dismiss_toast(&mut self);
}

/// Console renderer. Each region update becomes one line on stdout, so the
/// dashboard stays usable over ssh or piped into a pager.
#[derive(Debug, Default)]
pub struct ConsoleView;

impl ConsoleView {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DashboardView for ConsoleView {
    fn set_threat_banner(&mut self, classes: Vec<String>, text: String) {
        println!("[threat] {} ({})", text, classes.join(" "));
    }

    fn set_metric(&mut self, tile: MetricTile, value: String) {
        println!("[metrics] {tile:?} = {value}");
    }

    fn set_chart_bar(&mut self, index: usize, height_percent: f64) {
        let filled = (height_percent / 10.0).round() as usize;
        println!("[chart] bar {index}: {:<10} {height_percent:.0}%", "#".repeat(filled));
    }

    fn set_agent_status(&mut self, agent: AgentName, label: String, class: String) {
        println!("[agents] {} status: {label} ({class})", agent.as_str());
    }

    fn set_agent_control_status(&mut self, agent: AgentName, label: String) {
        println!("[agents] {} control: {label}", agent.as_str());
    }

    fn set_agent_activity(&mut self, agent: AgentName, lines: Vec<String>) {
        println!("[agents] {} activity:", agent.as_str());
        for line in lines {
            println!("    {line}");
        }
    }

    fn set_twin_gauge(&mut self, gauge: TwinGauge, value: String) {
        println!("[twin] {gauge:?} = {value}");
    }

    fn set_twin_health_bar(&mut self, percent: f64) {
        println!("[twin] health bar {percent:.0}%");
    }

    fn set_twin_node_state(&mut self, healthy: bool) {
        let state = if healthy { "Healthy" } else { "Warning" };
        println!("[twin] nodes: {state}");
    }

    fn set_service_counter(&mut self, service: &str, counter: &str, value: String) {
        println!("[azure] {service}.{counter} = {value}");
    }

    fn set_connection_state(&mut self, service: &str, state: ConnectionState) {
        println!("[azure] {service} connection: {}", state.label());
    }

    fn set_last_sync(&mut self, service: &str, when: String) {
        println!("[azure] {service} last sync: {when}");
    }

    fn push_event(&mut self, event: &SimulatedThreat) {
        println!(
            "[events] {} {} [{}] {}",
            event.timestamp, event.threat_type, event.severity, event.description
        );
    }

    fn trim_events(&mut self, _max: usize) {
        // Scrollback is the console's event list; nothing to remove.
    }

    fn replace_threat_log(&mut self, entries: &[ThreatLogEntry]) {
        println!("[log] {} entries:", entries.len());
        for entry in entries {
            println!(
                "    {} [{}] {} {} -> {} ({})",
                entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                entry.severity,
                entry.threat_type,
                entry.source,
                entry.target,
                entry.status
            );
        }
    }

    fn show_toast(&mut self, message: String) {
        println!("*** {message}");
    }

    fn dismiss_toast(&mut self) {}
}
