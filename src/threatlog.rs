//! Synthetic threat-log generator
//!
//! Fabricates a fixed-size set of plausible-looking threat log entries at
//! startup. Timestamps are uniform over the trailing window, result is
//! sorted newest-first. The set is never refreshed from the backend.

use crate::models::ThreatLogEntry;
use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

pub const THREAT_TYPES: &[&str] = &[
    "DDoS Attack",
    "SQL Injection",
    "Malware Detection",
    "Phishing Attempt",
    "Brute Force",
    "Zero Day Exploit",
    "Data Breach",
    "Ransomware",
];

pub const SEVERITIES: &[&str] = &["low", "medium", "high", "critical"];

pub const SOURCES: &[&str] = &[
    "192.168.1.45",
    "10.0.0.23",
    "172.16.0.8",
    "203.0.113.5",
    "198.51.100.14",
];

const TARGET: &str = "web-app-server";
const DESCRIPTION: &str = "Detected suspicious activity from external source";
const BLOCKED_PROBABILITY: f64 = 0.7;

/// Generate `count` synthetic entries with timestamps uniform in
/// `[now - window, now]`, newest first.
pub fn generate<R: Rng>(
    count: usize,
    window: Duration,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<ThreatLogEntry> {
    let window_ms = window.num_milliseconds().max(0);

    let mut entries: Vec<ThreatLogEntry> = (0..count)
        .map(|_| {
            let age_ms = rng.gen_range(0..=window_ms);
            let status = if rng.gen_bool(BLOCKED_PROBABILITY) {
                "blocked"
            } else {
                "investigating"
            };

            ThreatLogEntry {
                id: Uuid::new_v4().to_string(),
                timestamp: now - Duration::milliseconds(age_ms),
                threat_type: pick(THREAT_TYPES, rng),
                severity: pick(SEVERITIES, rng),
                source: pick(SOURCES, rng),
                target: TARGET.to_string(),
                description: DESCRIPTION.to_string(),
                status: status.to_string(),
            }
        })
        .collect();

    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    entries
}

fn pick<R: Rng>(options: &[&str], rng: &mut R) -> String {
    options
        .choose(rng)
        .copied()
        .unwrap_or_default()
        .to_string()
}
