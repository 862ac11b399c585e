/// Poll scheduler state machine
///
/// Pure and clock-free: the driver feeds it one `on_second` per elapsed
/// second plus user commands, and performs the `PollAction` it returns.
///
/// ```text
///   Idle ──(enabled && wallets > 0)──> Armed ──fires at once──> Fetching
///   Armed ──(countdown hits 0 | manual)──> Fetching
///   Fetching ──(cycle done, still enabled with wallets)──> Armed
///   Fetching ──(cycle done, disabled or no wallets)──> Idle
///   Armed ──(disabled | no wallets)──> Idle
/// ```
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PollPhase {
    Idle,
    Armed,
    Fetching,
}

/// What the driver must do after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollAction {
    None,
    StartCycle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollerState {
    phase: PollPhase,
    enabled: bool,
    wallet_count: usize,
    /// Interval applied at the next countdown reset
    interval_secs: u64,
    /// Seconds until the next automatic cycle; only meaningful while Armed
    countdown: u64,
    /// Completion time of the last cycle, ms since epoch
    last_poll_time: Option<i64>,
}

impl PollerState {
    pub fn new(interval_secs: u64) -> Self {
        Self {
            phase: PollPhase::Idle,
            enabled: false,
            wallet_count: 0,
            interval_secs,
            countdown: interval_secs,
            last_poll_time: None,
        }
    }

    pub fn phase(&self) -> PollPhase {
        self.phase
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn interval_secs(&self) -> u64 {
        self.interval_secs
    }

    /// Seconds until the next automatic cycle, `None` unless Armed
    pub fn countdown(&self) -> Option<u64> {
        match self.phase {
            PollPhase::Armed => Some(self.countdown),
            _ => None,
        }
    }

    pub fn last_poll_time(&self) -> Option<i64> {
        self.last_poll_time
    }

    fn can_arm(&self) -> bool {
        self.enabled && self.wallet_count > 0
    }

    /// Re-evaluate Idle/Armed after a precondition changed
    fn reconcile(&mut self) -> PollAction {
        match self.phase {
            PollPhase::Idle if self.can_arm() => {
                // Arming fires immediately
                self.phase = PollPhase::Fetching;
                PollAction::StartCycle
            }
            PollPhase::Armed if !self.can_arm() => {
                self.phase = PollPhase::Idle;
                PollAction::None
            }
            // An in-flight cycle always runs to completion
            _ => PollAction::None,
        }
    }

    // =========================================================================
    // INPUTS
    // =========================================================================

    pub fn set_enabled(&mut self, enabled: bool) -> PollAction {
        self.enabled = enabled;
        self.reconcile()
    }

    pub fn set_wallet_count(&mut self, count: usize) -> PollAction {
        self.wallet_count = count;
        self.reconcile()
    }

    /// New interval, used from the next countdown reset on
    pub fn set_interval(&mut self, interval_secs: u64) {
        self.interval_secs = interval_secs;
    }

    /// One second elapsed
    pub fn on_second(&mut self) -> PollAction {
        if self.phase != PollPhase::Armed {
            return PollAction::None;
        }
        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown == 0 {
            self.phase = PollPhase::Fetching;
            return PollAction::StartCycle;
        }
        PollAction::None
    }

    /// Manual refresh; ignored while a cycle runs or with no wallets
    pub fn trigger(&mut self) -> PollAction {
        if self.phase == PollPhase::Fetching || self.wallet_count == 0 {
            return PollAction::None;
        }
        self.phase = PollPhase::Fetching;
        PollAction::StartCycle
    }

    /// A cycle finished (successfully or not) at `now_ms`
    pub fn on_cycle_complete(&mut self, now_ms: i64) {
        self.last_poll_time = Some(now_ms);
        self.countdown = self.interval_secs;
        self.phase = if self.can_arm() {
            PollPhase::Armed
        } else {
            PollPhase::Idle
        };
    }
}
