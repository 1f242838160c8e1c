//! Agent control panel state
//!
//! Three fixed agents with a cosmetic status/activity display. Control
//! actions flip a status label and swap in canned activity lines; nothing
//! runs behind them. Agents are addressed by name, never by panel position.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentName {
    Watcher,
    Analyzer,
    Remediator,
}

impl AgentName {
    pub const ALL: [AgentName; 3] = [
        AgentName::Watcher,
        AgentName::Analyzer,
        AgentName::Remediator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentName::Watcher => "watcher",
            AgentName::Analyzer => "analyzer",
            AgentName::Remediator => "remediator",
        }
    }

    /// Capitalized display name, used in toasts.
    pub fn label(&self) -> &'static str {
        match self {
            AgentName::Watcher => "Watcher",
            AgentName::Analyzer => "Analyzer",
            AgentName::Remediator => "Remediator",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "watcher" => Some(AgentName::Watcher),
            "analyzer" => Some(AgentName::Analyzer),
            "remediator" => Some(AgentName::Remediator),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentAction {
    Start,
    Pause,
    Reset,
}

impl AgentAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentAction::Start => "start",
            AgentAction::Pause => "pause",
            AgentAction::Reset => "reset",
        }
    }

    /// Status label shown while the action is in effect. `Resetting` is
    /// transient; a delayed `start` follows it.
    pub fn status_label(&self) -> &'static str {
        match self {
            AgentAction::Start => "Active",
            AgentAction::Pause => "Paused",
            AgentAction::Reset => "Resetting",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "start" => Some(AgentAction::Start),
            "pause" => Some(AgentAction::Pause),
            "reset" => Some(AgentAction::Reset),
            _ => None,
        }
    }
}

/// Canned activity lines per agent and action.
pub fn activity_lines(agent: AgentName, action: AgentAction) -> &'static [&'static str] {
    match (agent, action) {
        (AgentName::Watcher, AgentAction::Start) => &[
            "• Monitoring network traffic patterns",
            "• Analyzing user behavior anomalies",
            "• Scanning for suspicious connections",
            "• Real-time threat detection active",
        ],
        (AgentName::Watcher, AgentAction::Pause) => &[
            "• Monitoring paused",
            "• Maintaining current threat database",
            "• Ready to resume on command",
        ],
        (AgentName::Watcher, AgentAction::Reset) => &[
            "• Resetting monitoring parameters",
            "• Clearing temporary data",
            "• Reinitializing detection algorithms",
        ],
        (AgentName::Analyzer, AgentAction::Start) => &[
            "• Analyzing threat patterns from Watcher",
            "• Calculating risk scores",
            "• Generating response recommendations",
            "• Machine learning models active",
        ],
        (AgentName::Analyzer, AgentAction::Pause) => &[
            "• Analysis paused",
            "• Maintaining current assessments",
            "• Ready to resume processing",
        ],
        (AgentName::Analyzer, AgentAction::Reset) => &[
            "• Resetting analysis parameters",
            "• Clearing analysis cache",
            "• Reinitializing ML models",
        ],
        (AgentName::Remediator, AgentAction::Start) => &[
            "• Active remediation mode enabled",
            "• Monitoring for high-priority threats",
            "• Ready to execute countermeasures",
            "• Automated response systems online",
        ],
        (AgentName::Remediator, AgentAction::Pause) => &[
            "• Remediation paused",
            "• Manual approval required for actions",
            "• Monitoring system health",
        ],
        (AgentName::Remediator, AgentAction::Reset) => &[
            "• Resetting remediation protocols",
            "• Clearing action queue",
            "• Reinitializing response systems",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_agent_action_pair_has_activity_lines() {
        for agent in AgentName::ALL {
            for action in [AgentAction::Start, AgentAction::Pause, AgentAction::Reset] {
                let lines = activity_lines(agent, action);
                assert!(!lines.is_empty(), "{agent:?}/{action:?} has no lines");
                assert!(lines.iter().all(|l| l.starts_with('•')));
            }
        }
    }

    #[test]
    fn status_labels_follow_action() {
        assert_eq!(AgentAction::Start.status_label(), "Active");
        assert_eq!(AgentAction::Pause.status_label(), "Paused");
        assert_eq!(AgentAction::Reset.status_label(), "Resetting");
    }

    #[test]
    fn names_parse_case_insensitively() {
        assert_eq!(AgentName::parse("Watcher"), Some(AgentName::Watcher));
        assert_eq!(AgentName::parse("REMEDIATOR"), Some(AgentName::Remediator));
        assert_eq!(AgentName::parse("ghost"), None);
        assert_eq!(AgentAction::parse("Reset"), Some(AgentAction::Reset));
        assert_eq!(AgentAction::parse("stop"), None);
    }
}
