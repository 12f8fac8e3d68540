//! Countdown state machine for the cabinet power saver
//!
//! Pure state transitions only; relay and timer side effects are applied
//! by the scheduler (or the firmware interrupt handlers) from the outcome
//! values returned here.

use crate::types::{ActivityPolicy, InputLevel, RelayState, SaverConfig, SaverState, TimeoutSetting};

/// Result of delivering one timer tick
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TickOutcome {
    /// Countdown not running, tick ignored
    Ignored,
    /// Countdown decremented, still running
    Running,
    /// Countdown reached zero on this tick: stop the tick source and
    /// de-energize the relay
    Expired,
}

/// Result of delivering one activity event
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ActivityOutcome {
    /// Countdown reset to the full timeout and (re)started; relay on
    Restarted,
    /// Countdown stopped while the control is held; relay on
    Held,
}

/// Main saver state machine
///
/// Field writer discipline: `countdown` is written only by `start()`
/// (reset to the timeout) and `on_tick()` (decrement). Nothing else
/// touches it.
pub struct SaverFsm {
    state: SaverState,
    countdown: u32,
    timeout: TimeoutSetting,
    config: SaverConfig,
}

impl SaverFsm {
    /// Create a new state machine with the boot-time timeout setting.
    ///
    /// Starts in `Held`: relay on, countdown not yet running. The boot
    /// sequence calls `start()` once the tick source is armed.
    pub fn new(timeout: TimeoutSetting, config: SaverConfig) -> Self {
        Self {
            state: SaverState::Held,
            countdown: timeout.as_ticks(),
            timeout,
            config,
        }
    }

    /// Get current state
    pub fn current_state(&self) -> SaverState {
        self.state
    }

    /// Remaining ticks in the current countdown
    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    /// Boot-time timeout setting
    pub fn timeout(&self) -> TimeoutSetting {
        self.timeout
    }

    /// Get current configuration
    pub fn config(&self) -> &SaverConfig {
        &self.config
    }

    /// True while the tick source should be enabled
    pub fn timer_running(&self) -> bool {
        self.state.timer_running()
    }

    /// Relay state implied by the current machine state.
    ///
    /// The relay only drops on countdown expiry, never as a side effect
    /// of anything else.
    pub fn relay_state(&self) -> RelayState {
        match self.state {
            SaverState::Expired => RelayState::DeEnergized,
            SaverState::Held | SaverState::Counting => RelayState::Energized,
        }
    }

    /// Reset the countdown to the full timeout and (re)start it.
    ///
    /// Safe to call in any state, including while already counting
    /// (idempotent restart) and after expiry.
    pub fn start(&mut self) {
        self.countdown = self.timeout.as_ticks();
        self.state = SaverState::Counting;
    }

    /// Stop the countdown without touching the counter value.
    ///
    /// A subsequent `start()` resets the counter, so the stale value is
    /// never counted from. Expiry is terminal for the awake period: a
    /// plain `stop()` after expiry does not re-energize anything.
    pub fn stop(&mut self) {
        if self.state == SaverState::Counting {
            self.state = SaverState::Held;
        }
    }

    /// Deliver one timer tick
    pub fn on_tick(&mut self) -> TickOutcome {
        if self.state != SaverState::Counting {
            return TickOutcome::Ignored;
        }

        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown == 0 {
            self.state = SaverState::Expired;
            #[cfg(feature = "defmt")]
            defmt::debug!("countdown expired, load off");
            TickOutcome::Expired
        } else {
            TickOutcome::Running
        }
    }

    /// Deliver one activity event with the input level sampled at the
    /// time of the edge.
    ///
    /// Every activity event leaves the relay energized, whichever policy
    /// is configured.
    pub fn on_activity(&mut self, level: InputLevel) -> ActivityOutcome {
        match self.config.policy {
            ActivityPolicy::AnyEdge => {
                self.start();
                ActivityOutcome::Restarted
            }
            ActivityPolicy::LevelSensitive => match level {
                InputLevel::Low => {
                    // Control held: relay stays on for as long as the
                    // line is low, countdown parked.
                    self.state = SaverState::Held;
                    ActivityOutcome::Held
                }
                InputLevel::High => {
                    self.start();
                    ActivityOutcome::Restarted
                }
            },
        }
    }
}
