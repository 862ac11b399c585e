/// Async driver for the poll scheduler
///
/// Owns a `PollerState`, a one-second ticker and a command channel. Cycles
/// run on their own task so ticks and commands keep being processed while a
/// fetch is in flight; the state machine guarantees at most one cycle at a
/// time.
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::state::{PollAction, PollPhase, PollerState};
use crate::activities::IngestReport;
use crate::errors::TrackerError;
use crate::logger::{self, LogTag};

/// One ingestion cycle, as seen by the scheduler
#[async_trait]
pub trait CycleRunner: Send + Sync {
    async fn run_cycle(&self) -> Result<IngestReport, TrackerError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollCommand {
    SetEnabled(bool),
    SetWalletCount(usize),
    SetInterval(u64),
    TriggerNow,
}

/// Snapshot published after every transition
#[derive(Debug, Clone, PartialEq)]
pub struct PollerStatus {
    pub phase: PollPhase,
    pub enabled: bool,
    pub countdown: Option<u64>,
    pub interval_secs: u64,
    pub last_poll_time: Option<i64>,
    pub cycles_completed: u64,
    pub last_report: Option<IngestReport>,
    pub last_error: Option<String>,
}

impl PollerStatus {
    fn from_state(state: &PollerState, previous: &PollerStatus) -> Self {
        Self {
            phase: state.phase(),
            enabled: state.is_enabled(),
            countdown: state.countdown(),
            interval_secs: state.interval_secs(),
            last_poll_time: state.last_poll_time(),
            cycles_completed: previous.cycles_completed,
            last_report: previous.last_report.clone(),
            last_error: previous.last_error.clone(),
        }
    }
}

// =============================================================================
// HANDLE
// =============================================================================

#[derive(Clone)]
pub struct PollerHandle {
    commands: mpsc::UnboundedSender<PollCommand>,
    status: watch::Receiver<PollerStatus>,
    shutdown: Arc<Notify>,
}

impl PollerHandle {
    fn send(&self, command: PollCommand) {
        if self.commands.send(command).is_err() {
            logger::debug(LogTag::Poller, "Poller stopped, command dropped");
        }
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.send(PollCommand::SetEnabled(enabled));
    }

    pub fn set_wallet_count(&self, count: usize) {
        self.send(PollCommand::SetWalletCount(count));
    }

    pub fn set_interval(&self, interval_secs: u64) {
        self.send(PollCommand::SetInterval(interval_secs));
    }

    pub fn trigger_now(&self) {
        self.send(PollCommand::TriggerNow);
    }

    pub fn status(&self) -> PollerStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PollerStatus> {
        self.status.clone()
    }

    /// Forward every wallet count change from `counts` to the scheduler
    pub fn follow_wallet_count(&self, mut counts: watch::Receiver<usize>) -> JoinHandle<()> {
        let handle = self.clone();
        tokio::spawn(async move {
            while counts.changed().await.is_ok() {
                let count = *counts.borrow_and_update();
                handle.set_wallet_count(count);
            }
        })
    }

    /// Stop the driver; an in-flight cycle finishes on its own task
    pub fn shutdown(&self) {
        self.shutdown.notify_one();
    }
}

// =============================================================================
// DRIVER
// =============================================================================

/// Start the scheduler loop on its own task
pub fn spawn_poller(
    runner: Arc<dyn CycleRunner>,
    initial: PollerState,
) -> (PollerHandle, JoinHandle<()>) {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let initial_status = PollerStatus {
        phase: initial.phase(),
        enabled: initial.is_enabled(),
        countdown: initial.countdown(),
        interval_secs: initial.interval_secs(),
        last_poll_time: initial.last_poll_time(),
        cycles_completed: 0,
        last_report: None,
        last_error: None,
    };
    let (status_tx, status_rx) = watch::channel(initial_status);
    let shutdown = Arc::new(Notify::new());

    let task = tokio::spawn(run_poller(
        runner,
        initial,
        command_rx,
        status_tx,
        shutdown.clone(),
    ));

    let handle = PollerHandle {
        commands: command_tx,
        status: status_rx,
        shutdown,
    };
    (handle, task)
}

async fn run_poller(
    runner: Arc<dyn CycleRunner>,
    mut state: PollerState,
    mut commands: mpsc::UnboundedReceiver<PollCommand>,
    status: watch::Sender<PollerStatus>,
    shutdown: Arc<Notify>,
) {
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Result<IngestReport, TrackerError>>();

    let mut ticker = interval_at(
        Instant::now() + Duration::from_secs(1),
        Duration::from_secs(1),
    );
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    logger::debug(LogTag::Poller, "Poller started");

    loop {
        let action = tokio::select! {
            _ = shutdown.notified() => {
                logger::info(LogTag::Poller, "Poller shutting down");
                break;
            }
            _ = ticker.tick() => state.on_second(),
            command = commands.recv() => match command {
                Some(command) => apply_command(&mut state, command),
                None => break,
            },
            Some(result) = done_rx.recv() => {
                state.on_cycle_complete(chrono::Utc::now().timestamp_millis());
                status.send_modify(|s| {
                    s.cycles_completed += 1;
                    match result {
                        Ok(report) => {
                            s.last_report = Some(report);
                            s.last_error = None;
                        }
                        Err(e) => {
                            logger::error(LogTag::Poller, &format!("Poll cycle failed: {}", e));
                            s.last_error = Some(e.to_string());
                        }
                    }
                });
                PollAction::None
            }
        };

        if action == PollAction::StartCycle {
            logger::debug(LogTag::Poller, "Starting poll cycle");
            let runner = runner.clone();
            let done_tx = done_tx.clone();
            tokio::spawn(async move {
                let result = runner.run_cycle().await;
                if done_tx.send(result).is_err() {
                    logger::debug(
                        LogTag::Poller,
                        "Poller stopped before the cycle finished, result dropped",
                    );
                }
            });
        }

        status.send_modify(|s| *s = PollerStatus::from_state(&state, s));
    }
}

fn apply_command(state: &mut PollerState, command: PollCommand) -> PollAction {
    logger::verbose(LogTag::Poller, &format!("Command: {:?}", command));
    match command {
        PollCommand::SetEnabled(enabled) => {
            if enabled != state.is_enabled() {
                logger::info(
                    LogTag::Poller,
                    if enabled { "Polling enabled" } else { "Polling disabled" },
                );
            }
            state.set_enabled(enabled)
        }
        PollCommand::SetWalletCount(count) => state.set_wallet_count(count),
        PollCommand::SetInterval(interval_secs) => {
            state.set_interval(interval_secs);
            PollAction::None
        }
        PollCommand::TriggerNow => {
            let action = state.trigger();
            if action == PollAction::None {
                logger::debug(LogTag::Poller, "Manual refresh ignored");
            }
            action
        }
    }
}
