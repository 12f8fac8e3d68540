//! Test utilities for saver core functionality

pub mod harness {
    //! Deterministic harness driving a mock-backed saver.
    //!
    //! Ticks are delivered the way hardware would deliver them: only
    //! while the tick source is enabled. Activity events sample the
    //! simulated line level exactly as the pin-change handler does.

    use crate::fsm::{ActivityOutcome, TickOutcome};
    use crate::hal::mock::MockSaverHal;
    use crate::hal::HalError;
    use crate::scheduler::{BootError, Saver};
    use crate::types::{SaverConfig, SleepMode};

    pub struct SaverHarness {
        saver: Saver<MockSaverHal>,
        ticks_elapsed: u64,
    }

    impl SaverHarness {
        /// Boot with the jumper absent and the knob at `raw_sample`
        pub fn boot(raw_sample: u16, config: SaverConfig) -> Result<Self, BootError<HalError>> {
            let saver = Saver::boot(MockSaverHal::new(raw_sample), config)?;
            Ok(Self {
                saver,
                ticks_elapsed: 0,
            })
        }

        /// Boot with the disable jumper fitted
        pub fn boot_disabled(config: SaverConfig) -> Result<Self, BootError<HalError>> {
            let saver = Saver::boot(MockSaverHal::with_jumper(0), config)?;
            Ok(Self {
                saver,
                ticks_elapsed: 0,
            })
        }

        pub fn saver(&self) -> &Saver<MockSaverHal> {
            &self.saver
        }

        /// Wall-clock ticks simulated so far (delivered or not)
        pub fn ticks_elapsed(&self) -> u64 {
            self.ticks_elapsed
        }

        /// Let `n` tick periods pass. The tick interrupt only fires
        /// while the tick source is enabled.
        pub fn advance_ticks(&mut self, n: u64) -> TickOutcome {
            let mut last = TickOutcome::Ignored;
            for _ in 0..n {
                self.ticks_elapsed += 1;
                if self.saver.hal().ticks.is_enabled() {
                    last = self.saver.handle_tick().unwrap();
                }
            }
            last
        }

        /// Simulate an edge on the activity line, leaving the line at
        /// the given level when the handler samples it.
        pub fn touch(&mut self, line_low: bool) -> Option<ActivityOutcome> {
            self.saver.hal().activity.set_low(line_low);
            self.saver.handle_activity().unwrap()
        }

        pub fn relay_on(&self) -> bool {
            self.saver.hal().relay.is_energized()
        }

        pub fn timer_enabled(&self) -> bool {
            self.saver.hal().ticks.is_enabled()
        }

        pub fn sleep_mode(&self) -> Option<SleepMode> {
            self.saver.hal().sleep.mode()
        }

        /// Countdown length latched at boot, in ticks
        pub fn timeout_ticks(&self) -> u64 {
            u64::from(self.saver.fsm().timeout().as_ticks())
        }
    }
}

pub mod activity_script {
    //! Scripted activity sequences for scenario tests

    use super::harness::SaverHarness;
    use heapless::Vec;

    /// One scripted edge on the activity line
    #[derive(Debug, Clone, Copy)]
    pub struct ActivityEvent {
        /// Tick count (from script start) at which the edge fires
        pub at_tick: u64,
        /// Line level when the handler samples it
        pub line_low: bool,
    }

    /// A bounded sequence of activity edges
    #[derive(Debug, Clone, Default)]
    pub struct ActivityScript {
        events: Vec<ActivityEvent, 32>,
    }

    impl ActivityScript {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn edge(mut self, at_tick: u64, line_low: bool) -> Self {
            self.events
                .push(ActivityEvent { at_tick, line_low })
                .expect("script capacity exceeded");
            self
        }

        /// A press-and-release pair
        pub fn press_release(self, press_at: u64, hold_ticks: u64) -> Self {
            self.edge(press_at, true).edge(press_at + hold_ticks, false)
        }

        /// Run the script, then let `trailing_ticks` more pass.
        pub fn run(&self, harness: &mut SaverHarness, trailing_ticks: u64) {
            let mut cursor = 0u64;
            for event in &self.events {
                debug_assert!(event.at_tick >= cursor, "script events out of order");
                harness.advance_ticks(event.at_tick - cursor);
                cursor = event.at_tick;
                harness.touch(event.line_low);
            }
            harness.advance_ticks(trailing_ticks);
        }
    }
}
