//! Dashboard controller
//!
//! Owns the cached snapshot, the bounded event feed and the synthetic
//! threat log, and drives everything from a single command loop:
//! - a poll timer refreshes the status snapshot every interval while the
//!   dashboard is visible; hiding it drops the timer, showing it recreates
//!   one (the only cancellable resource);
//! - user actions and delayed effects (reset restart, connection-test
//!   resolution, toast dismissal) arrive as commands on a channel.
//!
//! A failed poll is logged and the previous render stays on screen; there
//! is no retry, no backoff and no user-facing error state.

use crate::agents::{activity_lines, AgentAction, AgentName};
use crate::api::ApiClient;
use crate::clock::Clock;
use crate::config::DashboardConfig;
use crate::models::EventFeed;
use crate::render;
use crate::threatlog;
use crate::view::{ConnectionState, DashboardView};
use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// Everything the controller reacts to. User input, delayed effects and
/// internal refresh requests all funnel through here.
#[derive(Debug, Clone)]
pub enum Command {
    /// Out-of-cadence status fetch.
    Refresh,
    /// Visible -> poll timer runs; hidden -> timer dropped.
    SetVisible(bool),
    SimulateThreat {
        threat_type: String,
        severity: String,
    },
    SyncService {
        service: String,
    },
    TestConnection {
        service: String,
    },
    ControlAgent {
        agent: AgentName,
        action: AgentAction,
    },
    /// Delayed outcome of a connection test, decided when it was started.
    ConnectionTestResolved {
        service: String,
        success: bool,
    },
    DismissToast,
    Shutdown,
}

enum Step {
    Command(Option<Command>),
    Tick,
    Interrupt,
}

pub struct DashboardController {
    config: DashboardConfig,
    api: ApiClient,
    view: Box<dyn DashboardView>,
    clock: Arc<dyn Clock>,
    rng: StdRng,
    snapshot: Option<crate::models::StatusSnapshot>,
    events: EventFeed,
    threat_log: Vec<crate::models::ThreatLogEntry>,
    poll: Option<Interval>,
    tx: mpsc::UnboundedSender<Command>,
    rx: mpsc::UnboundedReceiver<Command>,
}

impl DashboardController {
    pub fn new(
        config: DashboardConfig,
        api: ApiClient,
        view: Box<dyn DashboardView>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let events = EventFeed::new(config.ui.event_feed_capacity);

        Self {
            config,
            api,
            view,
            clock,
            rng: StdRng::from_entropy(),
            snapshot: None,
            events,
            threat_log: Vec::new(),
            poll: None,
            tx,
            rx,
        }
    }

    /// Handle for feeding commands in from outside the loop (input reader,
    /// signal handlers, tests).
    pub fn sender(&self) -> mpsc::UnboundedSender<Command> {
        self.tx.clone()
    }

    /// Initial fetch, synthetic log generation and first render; arms the
    /// poll timer.
    pub async fn init(&mut self) -> Result<()> {
        self.threat_log = threatlog::generate(
            self.config.threat_log.entry_count,
            chrono::Duration::hours(self.config.threat_log.window_hours),
            self.clock.now(),
            &mut self.rng,
        );
        self.view.replace_threat_log(&self.threat_log);
        info!(
            "generated {} synthetic threat log entries",
            self.threat_log.len()
        );

        self.refresh_status().await;
        self.set_visible(true);
        Ok(())
    }

    /// Command loop; returns on shutdown, Ctrl-C or a closed channel.
    pub async fn run(&mut self) -> Result<()> {
        info!(
            "dashboard running (poll every {}ms)",
            self.config.poll.interval_ms
        );

        loop {
            let step = {
                let rx = &mut self.rx;
                match self.poll.as_mut() {
                    Some(timer) => {
                        tokio::select! {
                            maybe = rx.recv() => Step::Command(maybe),
                            _ = timer.tick() => Step::Tick,
                            _ = tokio::signal::ctrl_c() => Step::Interrupt,
                        }
                    }
                    None => {
                        tokio::select! {
                            maybe = rx.recv() => Step::Command(maybe),
                            _ = tokio::signal::ctrl_c() => Step::Interrupt,
                        }
                    }
                }
            };

            match step {
                Step::Tick => self.refresh_status().await,
                Step::Command(Some(command)) => {
                    if !self.on_command(command).await {
                        break;
                    }
                }
                Step::Command(None) | Step::Interrupt => break,
            }
        }

        self.shutdown();
        Ok(())
    }

    /// Drops the poll timer; mirrors the page-unload path.
    pub fn shutdown(&mut self) {
        self.poll = None;
        info!("dashboard stopped");
    }

    async fn on_command(&mut self, command: Command) -> bool {
        match command {
            Command::Refresh => self.refresh_status().await,
            Command::SetVisible(visible) => self.set_visible(visible),
            Command::SimulateThreat {
                threat_type,
                severity,
            } => self.simulate_threat(&threat_type, &severity).await,
            Command::SyncService { service } => self.sync_service(&service).await,
            Command::TestConnection { service } => self.start_connection_test(&service),
            Command::ConnectionTestResolved { service, success } => {
                self.finish_connection_test(&service, success)
            }
            Command::ControlAgent { agent, action } => self.control_agent(agent, action),
            Command::DismissToast => self.view.dismiss_toast(),
            Command::Shutdown => return false,
        }
        true
    }

    fn set_visible(&mut self, visible: bool) {
        if visible {
            if self.poll.is_none() {
                let mut timer =
                    interval(Duration::from_millis(self.config.poll.interval_ms));
                timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
                self.poll = Some(timer);
                debug!("polling resumed");
            }
        } else if self.poll.take().is_some() {
            debug!("polling suspended");
        }
    }

    /// Fetch the status snapshot and re-render everything. On failure the
    /// previous render stays.
    async fn refresh_status(&mut self) {
        match self.api.status().await {
            Ok(snapshot) => {
                self.snapshot = Some(snapshot);
                self.render();
            }
            Err(e) => warn!("status poll failed, keeping stale view: {e}"),
        }
    }

    fn render(&mut self) {
        let Some(snapshot) = self.snapshot.as_ref() else {
            return;
        };
        let jitter = self.rng.gen_range(20.0..100.0);
        render::render_all(snapshot, jitter, self.view.as_mut());
    }

    async fn simulate_threat(&mut self, threat_type: &str, severity: &str) {
        match self.api.simulate_threat(threat_type, severity).await {
            Ok(response) if response.status == "success" => {
                if let Some(threat) = response.threat {
                    self.view.push_event(&threat);
                    self.view.trim_events(self.events.capacity());
                    self.events.push(threat);
                    debug!("event feed holds {} entries", self.events.len());
                    self.show_toast(format!(
                        "Threat simulated: {threat_type} ({severity})"
                    ));
                }
            }
            Ok(response) => debug!("simulate_threat rejected: {}", response.status),
            Err(e) => error!("simulate_threat failed: {e}"),
        }
    }

    async fn sync_service(&mut self, service: &str) {
        match self.api.sync_service(service).await {
            Ok(response) if response.status == "success" => {
                self.show_toast(format!("Azure service synchronized: {service}"));
                // Out-of-cadence refresh so the new sync time shows up now.
                self.refresh_status().await;
            }
            Ok(response) => debug!("sync of {service} rejected: {}", response.status),
            Err(e) => error!("sync of {service} failed: {e}"),
        }
    }

    /// Purely local simulation; the outcome is drawn up front and delivered
    /// after the configured delay.
    fn start_connection_test(&mut self, service: &str) {
        self.view
            .set_connection_state(service, ConnectionState::Testing);

        let success = self.rng.gen_bool(self.config.connection_test.success_rate);
        self.schedule(
            Duration::from_millis(self.config.connection_test.delay_ms),
            Command::ConnectionTestResolved {
                service: service.to_string(),
                success,
            },
        );
    }

    fn finish_connection_test(&mut self, service: &str, success: bool) {
        if success {
            self.view
                .set_connection_state(service, ConnectionState::Connected);
            let now = self.clock.now().format("%Y-%m-%d %H:%M:%S").to_string();
            self.view.set_last_sync(service, now);
            self.show_toast(format!("Azure {service} connection test successful"));
        } else {
            self.view
                .set_connection_state(service, ConnectionState::Failed);
            self.show_toast(format!("Azure {service} connection test failed"));
        }
    }

    fn control_agent(&mut self, agent: AgentName, action: AgentAction) {
        self.view
            .set_agent_control_status(agent, action.status_label().to_string());

        let lines = activity_lines(agent, action)
            .iter()
            .map(|line| line.to_string())
            .collect();
        self.view.set_agent_activity(agent, lines);

        self.show_toast(format!(
            "{} agent {} command executed",
            agent.label(),
            action.as_str()
        ));

        // Each reset schedules its own restart; repeated resets stack.
        if action == AgentAction::Reset {
            self.schedule(
                Duration::from_millis(self.config.agents.reset_restart_delay_ms),
                Command::ControlAgent {
                    agent,
                    action: AgentAction::Start,
                },
            );
        }
    }

    fn show_toast(&mut self, message: String) {
        self.view.show_toast(message);
        self.schedule(
            Duration::from_millis(self.config.ui.toast_duration_ms),
            Command::DismissToast,
        );
    }

    /// Deliver a command back to the loop after a clock delay.
    fn schedule(&self, delay: Duration, command: Command) {
        let sleep = self.clock.sleep(delay);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            sleep.await;
            let _ = tx.send(command);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::testing::InstantClock;
    use crate::view::testing::RecordingView;

    fn controller(view: RecordingView) -> DashboardController {
        let config = DashboardConfig::default();
        // Nothing in these tests performs a request; the port is a dead end.
        let api = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        DashboardController::new(config, api, Box::new(view), Arc::new(InstantClock))
    }

    /// Receive scheduled commands until `pred` matches, dispatching
    /// everything else (toast dismissals and the like) along the way.
    async fn drive_until(
        c: &mut DashboardController,
        pred: impl Fn(&Command) -> bool,
    ) -> Command {
        for _ in 0..16 {
            let command = tokio::time::timeout(Duration::from_secs(1), c.rx.recv())
                .await
                .expect("timed out waiting for scheduled command")
                .expect("command channel closed");
            if pred(&command) {
                return command;
            }
            c.on_command(command).await;
        }
        panic!("expected command never arrived");
    }

    #[tokio::test]
    async fn reset_transitions_back_to_active_start_state() {
        let view = RecordingView::default();
        let mut c = controller(view.clone());

        c.control_agent(AgentName::Watcher, AgentAction::Reset);
        assert_eq!(view.state().control_status[&AgentName::Watcher], "Resetting");
        let reset_lines: Vec<String> = activity_lines(AgentName::Watcher, AgentAction::Reset)
            .iter()
            .map(|l| l.to_string())
            .collect();
        assert_eq!(view.state().activity[&AgentName::Watcher], reset_lines);

        let restart = drive_until(&mut c, |cmd| {
            matches!(cmd, Command::ControlAgent { action: AgentAction::Start, .. })
        })
        .await;
        c.on_command(restart).await;

        assert_eq!(view.state().control_status[&AgentName::Watcher], "Active");
        let start_lines: Vec<String> = activity_lines(AgentName::Watcher, AgentAction::Start)
            .iter()
            .map(|l| l.to_string())
            .collect();
        assert_eq!(view.state().activity[&AgentName::Watcher], start_lines);
    }

    #[tokio::test]
    async fn visibility_toggles_the_poll_timer_exactly_once_each_way() {
        let mut c = controller(RecordingView::default());
        assert!(c.poll.is_none());

        c.set_visible(true);
        assert!(c.poll.is_some());
        c.set_visible(true); // idempotent
        assert!(c.poll.is_some());

        c.set_visible(false);
        assert!(c.poll.is_none());
        c.set_visible(false);
        assert!(c.poll.is_none());

        c.set_visible(true);
        assert!(c.poll.is_some());
        c.shutdown();
        assert!(c.poll.is_none());
    }

    #[tokio::test]
    async fn connection_test_badge_and_last_sync_on_success() {
        let view = RecordingView::default();
        let mut c = controller(view.clone());

        c.start_connection_test("sentinel");
        assert_eq!(
            view.state().connection["sentinel"],
            ConnectionState::Testing
        );

        let resolved = drive_until(&mut c, |cmd| {
            matches!(cmd, Command::ConnectionTestResolved { .. })
        })
        .await;
        // Force the outcome so the assertion is deterministic.
        let Command::ConnectionTestResolved { service, .. } = resolved else {
            unreachable!()
        };
        c.on_command(Command::ConnectionTestResolved {
            service,
            success: true,
        })
        .await;

        assert_eq!(
            view.state().connection["sentinel"],
            ConnectionState::Connected
        );
        assert!(view.state().last_sync.contains_key("sentinel"));
        assert!(view
            .state()
            .toasts
            .iter()
            .any(|t| t == "Azure sentinel connection test successful"));
    }

    #[tokio::test]
    async fn connection_test_failure_sets_failed_badge_without_sync_time() {
        let view = RecordingView::default();
        let mut c = controller(view.clone());

        c.finish_connection_test("key_vault", false);
        assert_eq!(
            view.state().connection["key_vault"],
            ConnectionState::Failed
        );
        assert!(!view.state().last_sync.contains_key("key_vault"));
    }

    #[tokio::test]
    async fn connection_test_outcomes_converge_to_the_success_rate() {
        let view = RecordingView::default();
        let mut c = controller(view.clone());
        c.rng = StdRng::seed_from_u64(1234);

        let samples = 4_000;
        for _ in 0..samples {
            c.start_connection_test("sentinel");
        }

        let mut successes = 0usize;
        for _ in 0..samples {
            let command = tokio::time::timeout(Duration::from_secs(5), c.rx.recv())
                .await
                .expect("timed out waiting for resolved connection test")
                .expect("command channel closed");
            match command {
                Command::ConnectionTestResolved { success, .. } => {
                    if success {
                        successes += 1;
                    }
                }
                other => panic!("unexpected command: {other:?}"),
            }
        }

        let ratio = successes as f64 / samples as f64;
        assert!((0.88..=0.92).contains(&ratio), "ratio was {ratio}");
    }

    #[tokio::test]
    async fn toast_is_shown_then_auto_dismissed() {
        let view = RecordingView::default();
        let mut c = controller(view.clone());

        c.show_toast("hello".to_string());
        assert!(view.state().toast_visible);
        assert_eq!(view.state().toasts, vec!["hello".to_string()]);

        let dismiss = drive_until(&mut c, |cmd| matches!(cmd, Command::DismissToast)).await;
        c.on_command(dismiss).await;
        assert!(!view.state().toast_visible);
    }

    #[tokio::test]
    async fn shutdown_command_stops_the_loop() {
        let mut c = controller(RecordingView::default());
        assert!(!c.on_command(Command::Shutdown).await);
        assert!(c.on_command(Command::DismissToast).await);
    }

    #[tokio::test]
    async fn repeated_resets_schedule_independent_restarts() {
        let view = RecordingView::default();
        let mut c = controller(view.clone());

        c.control_agent(AgentName::Analyzer, AgentAction::Reset);
        c.control_agent(AgentName::Analyzer, AgentAction::Reset);

        let mut restarts = 0;
        for _ in 0..2 {
            let restart = drive_until(&mut c, |cmd| {
                matches!(cmd, Command::ControlAgent { action: AgentAction::Start, .. })
            })
            .await;
            c.on_command(restart).await;
            restarts += 1;
        }
        assert_eq!(restarts, 2);
        assert_eq!(view.state().control_status[&AgentName::Analyzer], "Active");
    }
}
