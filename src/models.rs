//! Wire and display models for the Opswatch dashboard
//!
//! Everything the backend sends is deserialized into these structs. The
//! status payload replaces the cached copy wholesale on every poll; there is
//! no merging or diffing. Missing or malformed fields fall back to serde
//! defaults so a degraded backend degrades the display instead of killing
//! the client.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// Overall threat posture reported by the backend.
///
/// `normal` is the idle value; the four severities mirror the simulated
/// threat severities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThreatLevel {
    #[default]
    Normal,
    Low,
    Medium,
    High,
    Critical,
}

impl ThreatLevel {
    /// Lowercase class token used by view implementations.
    pub fn css_class(&self) -> &'static str {
        match self {
            ThreatLevel::Normal => "normal",
            ThreatLevel::Low => "low",
            ThreatLevel::Medium => "medium",
            ThreatLevel::High => "high",
            ThreatLevel::Critical => "critical",
        }
    }

    /// Uppercase display text for the threat banner.
    pub fn label(&self) -> &'static str {
        match self {
            ThreatLevel::Normal => "NORMAL",
            ThreatLevel::Low => "LOW",
            ThreatLevel::Medium => "MEDIUM",
            ThreatLevel::High => "HIGH",
            ThreatLevel::Critical => "CRITICAL",
        }
    }
}

/// Full status payload from `GET /api/status`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusSnapshot {
    #[serde(default)]
    pub threat_level: ThreatLevel,
    #[serde(default)]
    pub system_metrics: SystemMetrics,
    #[serde(default)]
    pub agents: HashMap<String, AgentHealth>,
    #[serde(default)]
    pub digital_twin: DigitalTwin,
    #[serde(default)]
    pub azure_services: HashMap<String, ServiceCounters>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemMetrics {
    #[serde(default)]
    pub cpu_usage: f64,
    #[serde(default)]
    pub memory_usage: f64,
    #[serde(default)]
    pub network_traffic: f64,
    #[serde(default)]
    pub active_connections: f64,
    #[serde(default)]
    pub threats_detected: u64,
    #[serde(default)]
    pub threats_blocked: u64,
}

/// Per-agent health as reported by the backend.
///
/// `last_update` is kept as the raw ISO string the backend emits (it carries
/// no timezone, so parsing it as UTC would be a lie).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentHealth {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub last_update: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DigitalTwin {
    #[serde(default)]
    pub application_health: f64,
    #[serde(default)]
    pub response_time: f64,
    #[serde(default)]
    pub error_rate: f64,
    #[serde(default)]
    pub throughput: f64,
    #[serde(default)]
    pub security_score: f64,
}

/// Counters for one cloud service.
///
/// Beyond the three named fields the backend sends a service-specific bag of
/// counters (alerts, incidents, secrets, ...); those are captured flattened
/// so the renderer's static mapping table can pick out what it knows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceCounters {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub last_sync: Option<String>,
    #[serde(flatten)]
    pub counters: HashMap<String, serde_json::Value>,
}

/// Threat event returned by `POST /api/simulate_threat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatedThreat {
    pub id: String,
    #[serde(rename = "type")]
    pub threat_type: String,
    pub severity: String,
    pub timestamp: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub status: String,
}

/// Client-fabricated threat log entry (never sent to the backend).
#[derive(Debug, Clone, Serialize)]
pub struct ThreatLogEntry {
    pub id: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "type")]
    pub threat_type: String,
    pub severity: String,
    pub source: String,
    pub target: String,
    pub description: String,
    pub status: String,
}

/// Bounded most-recent-first list of simulated threat events.
///
/// Pushing beyond capacity evicts the oldest entry.
#[derive(Debug, Clone)]
pub struct EventFeed {
    entries: VecDeque<SimulatedThreat>,
    capacity: usize,
}

impl EventFeed {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, event: SimulatedThreat) {
        self.entries.push_front(event);
        self.entries.truncate(self.capacity);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &SimulatedThreat> {
        self.entries.iter()
    }

    pub fn newest(&self) -> Option<&SimulatedThreat> {
        self.entries.front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn threat(id: &str) -> SimulatedThreat {
        SimulatedThreat {
            id: id.to_string(),
            threat_type: "DDoS Attack".to_string(),
            severity: "high".to_string(),
            timestamp: "2026-08-23T10:00:00".to_string(),
            description: "Simulated DDoS Attack attack detected".to_string(),
            source: "192.168.1.7".to_string(),
            target: "web-app-server".to_string(),
            status: "detected".to_string(),
        }
    }

    #[test]
    fn threat_level_wire_format_is_lowercase() {
        assert_eq!(
            serde_json::to_string(&ThreatLevel::Critical).unwrap(),
            "\"critical\""
        );
        let level: ThreatLevel = serde_json::from_str("\"medium\"").unwrap();
        assert_eq!(level, ThreatLevel::Medium);
        assert_eq!(level.css_class(), "medium");
        assert_eq!(level.label(), "MEDIUM");
    }

    #[test]
    fn snapshot_parses_backend_payload() {
        let payload = json!({
            "threat_level": "normal",
            "agents": {
                "watcher": {"status": "active", "last_update": "2026-08-23T09:59:58.120394"},
                "analyzer": {"status": "active", "last_update": "2026-08-23T09:59:58.120401"},
                "remediator": {"status": "standby", "last_update": "2026-08-23T09:59:58.120404"}
            },
            "system_metrics": {
                "cpu_usage": 45.2,
                "memory_usage": 62.0,
                "network_traffic": 1250.0,
                "active_connections": 847,
                "threats_detected": 0,
                "threats_blocked": 0
            },
            "azure_services": {
                "sentinel": {
                    "name": "Azure Sentinel",
                    "status": "connected",
                    "last_sync": "2026-08-23T09:59:58.120410",
                    "alerts": 23,
                    "incidents": 5
                },
                "log_analytics": {
                    "name": "Azure Log Analytics",
                    "status": "connected",
                    "last_sync": "2026-08-23T09:59:58.120415",
                    "data_ingestion": "2.5GB",
                    "queries_today": 1847
                }
            },
            "digital_twin": {
                "application_health": 95.0,
                "response_time": 150.0,
                "error_rate": 0.02,
                "throughput": 1200.0,
                "security_score": 88.0
            }
        });

        let snapshot: StatusSnapshot = serde_json::from_value(payload).unwrap();
        assert_eq!(snapshot.threat_level, ThreatLevel::Normal);
        assert_eq!(snapshot.agents["remediator"].status, "standby");
        assert_eq!(snapshot.system_metrics.active_connections, 847.0);

        let sentinel = &snapshot.azure_services["sentinel"];
        assert_eq!(sentinel.name, "Azure Sentinel");
        assert_eq!(sentinel.counters["alerts"], json!(23));

        let logs = &snapshot.azure_services["log_analytics"];
        assert_eq!(logs.counters["data_ingestion"], json!("2.5GB"));
    }

    #[test]
    fn snapshot_tolerates_missing_sections() {
        let snapshot: StatusSnapshot = serde_json::from_value(json!({})).unwrap();
        assert_eq!(snapshot.threat_level, ThreatLevel::Normal);
        assert!(snapshot.agents.is_empty());
        assert_eq!(snapshot.system_metrics.cpu_usage, 0.0);
    }

    #[test]
    fn event_feed_caps_at_capacity_and_keeps_newest_first() {
        let mut feed = EventFeed::new(10);
        for i in 0..11 {
            feed.push(threat(&format!("threat_{i}")));
        }
        assert_eq!(feed.len(), 10);
        assert_eq!(feed.newest().unwrap().id, "threat_10");
        // threat_0 was evicted
        assert!(feed.iter().all(|t| t.id != "threat_0"));
        assert_eq!(feed.iter().last().unwrap().id, "threat_1");
    }
}
