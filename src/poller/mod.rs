/// Poll scheduler
///
/// - `state`: the Idle / Armed / Fetching state machine
/// - `driver`: tokio task feeding it ticks and commands and running cycles
pub mod driver;
pub mod state;


pub use driver::{spawn_poller, CycleRunner, PollCommand, PollerHandle, PollerStatus};
pub use state::{PollAction, PollPhase, PollerState};
