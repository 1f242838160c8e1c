//! Snapshot-to-view projection
//!
//! Pure functions from a status snapshot (or a slice of one) onto the view
//! binding. Idempotent for equal input; agents and services are looked up
//! by name and silently skipped when absent from the payload.

use crate::agents::AgentName;
use crate::models::{AgentHealth, DigitalTwin, ServiceCounters, StatusSnapshot, SystemMetrics, ThreatLevel};
use crate::view::{DashboardView, MetricTile, TwinGauge};
use std::collections::HashMap;

/// Twin nodes flip from healthy to warning at this application-health level.
const TWIN_HEALTH_THRESHOLD: f64 = 80.0;

/// Placeholder tile values the demo backend never drives.
const PLACEHOLDER_THREATS_DETECTED: &str = "17";
const PLACEHOLDER_THREATS_BLOCKED: &str = "6";

/// Counter fields shown per service, in display order.
const SERVICE_COUNTER_FIELDS: &[(&str, &[&str])] = &[
    ("sentinel", &["alerts", "incidents"]),
    ("security_center", &["recommendations", "secure_score"]),
    ("log_analytics", &["data_ingestion", "queries_today"]),
    ("key_vault", &["secrets", "certificates"]),
];

/// Project a full snapshot onto every view region. `chart_jitter` is the
/// caller-supplied random demo value for the fifth bar.
pub fn render_all(snapshot: &StatusSnapshot, chart_jitter: f64, view: &mut dyn DashboardView) {
    render_threat_level(snapshot.threat_level, view);
    render_metrics(&snapshot.system_metrics, view);
    render_chart(&snapshot.system_metrics, chart_jitter, view);
    render_agents(&snapshot.agents, view);
    render_twin(&snapshot.digital_twin, view);
    render_services(&snapshot.azure_services, view);
}

pub fn render_threat_level(level: ThreatLevel, view: &mut dyn DashboardView) {
    view.set_threat_banner(
        vec!["threat-status".to_string(), level.css_class().to_string()],
        level.label().to_string(),
    );
}

pub fn render_metrics(metrics: &SystemMetrics, view: &mut dyn DashboardView) {
    view.set_metric(
        MetricTile::ThreatsDetected,
        PLACEHOLDER_THREATS_DETECTED.to_string(),
    );
    view.set_metric(
        MetricTile::ThreatsBlocked,
        PLACEHOLDER_THREATS_BLOCKED.to_string(),
    );
    view.set_metric(MetricTile::CpuUsage, format!("{}", metrics.cpu_usage.round()));
    view.set_metric(
        MetricTile::MemoryUsage,
        format!("{}", metrics.memory_usage.round()),
    );
}

pub fn render_chart(metrics: &SystemMetrics, jitter: f64, view: &mut dyn DashboardView) {
    let values = [
        metrics.cpu_usage,
        metrics.memory_usage,
        metrics.network_traffic / 50.0,
        metrics.active_connections / 20.0,
        jitter,
    ];

    for (index, value) in values.iter().enumerate() {
        view.set_chart_bar(index, clamp_bar(*value));
    }
}

/// Bar heights live in [10, 100] regardless of metric magnitude.
pub fn clamp_bar(value: f64) -> f64 {
    value.clamp(10.0, 100.0)
}

pub fn render_agents(agents: &HashMap<String, AgentHealth>, view: &mut dyn DashboardView) {
    for name in AgentName::ALL {
        if let Some(health) = agents.get(name.as_str()) {
            view.set_agent_status(name, capitalize(&health.status), health.status.clone());
        }
    }
}

pub fn render_twin(twin: &DigitalTwin, view: &mut dyn DashboardView) {
    view.set_twin_gauge(
        TwinGauge::ApplicationHealth,
        format!("{}", twin.application_health.round()),
    );
    view.set_twin_gauge(
        TwinGauge::ResponseTime,
        format!("{}", twin.response_time.round()),
    );
    view.set_twin_gauge(TwinGauge::ErrorRate, format!("{:.2}", twin.error_rate));
    view.set_twin_gauge(
        TwinGauge::Throughput,
        format!("{}", twin.throughput.round()),
    );
    view.set_twin_health_bar(twin.application_health);
    view.set_twin_node_state(twin.application_health > TWIN_HEALTH_THRESHOLD);
}

pub fn render_services(
    services: &HashMap<String, ServiceCounters>,
    view: &mut dyn DashboardView,
) {
    for (service, fields) in SERVICE_COUNTER_FIELDS {
        let Some(counters) = services.get(*service) else {
            continue;
        };
        for field in *fields {
            if let Some(value) = counters.counters.get(*field) {
                view.set_service_counter(service, field, format_counter(value));
            }
        }
    }
}

/// Numbers get thousands grouping, strings pass through unchanged.
pub fn format_counter(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                group_thousands(i)
            } else if let Some(f) = n.as_f64() {
                if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                    group_thousands(f as i64)
                } else {
                    format!("{f}")
                }
            } else {
                n.to_string()
            }
        }
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    let lead = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - lead) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
