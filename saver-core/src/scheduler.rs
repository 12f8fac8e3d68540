//! Power scheduler and boot sequence
//!
//! Owns the HAL and the state machine, latches the operating mode from
//! the disable jumper exactly once at boot, and maps state machine
//! outcomes onto relay/timer side effects. After boot the main sequence
//! only parks the processor; all decisions happen in the two handlers,
//! invoked asynchronously from interrupt context.

use crate::calibration::{read_timeout_setting, CalibrationError};
use crate::fsm::{ActivityOutcome, SaverFsm, TickOutcome};
use crate::hal::{
    ActivityInput, DisableJumper, RelayOutput, SaverHal, SleepControl, TickSource,
};
use crate::types::{InputLevel, OperatingMode, SaverConfig, SleepMode, TimeoutSetting};

/// Errors from the boot sequence
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BootError<E> {
    /// Calibration read failed
    Calibration(CalibrationError<E>),
    /// Hardware setup failed
    Hal(E),
}

impl<E> From<CalibrationError<E>> for BootError<E> {
    fn from(e: CalibrationError<E>) -> Self {
        BootError::Calibration(e)
    }
}

#[cfg(feature = "std")]
impl<E: core::fmt::Display> core::fmt::Display for BootError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BootError::Calibration(e) => write!(f, "calibration failed: {}", e),
            BootError::Hal(e) => write!(f, "hardware setup failed: {}", e),
        }
    }
}

/// The assembled power saver: HAL plus state machine plus boot-time
/// operating mode.
pub struct Saver<H: SaverHal> {
    hal: H,
    fsm: SaverFsm,
    mode: OperatingMode,
}

impl<H: SaverHal> Saver<H> {
    /// Run the boot sequence and return the assembled saver.
    ///
    /// Jumper fitted: relay on, deepest sleep mode, nothing armed — the
    /// device is inert until power-cycled. Otherwise: arm the activity
    /// interrupt, calibrate the timeout, energize the relay, start the
    /// countdown and pick a sleep mode both interrupt sources can wake
    /// from.
    pub fn boot(mut hal: H, config: SaverConfig) -> Result<Self, BootError<H::Error>> {
        hal.initialize().map_err(BootError::Hal)?;

        if hal.jumper().is_fitted().map_err(BootError::Hal)? {
            hal.relay().energize().map_err(BootError::Hal)?;
            hal.sleep()
                .set_mode(SleepMode::PowerDown)
                .map_err(BootError::Hal)?;

            #[cfg(feature = "defmt")]
            defmt::info!("disable jumper fitted, load permanently on");

            // No interrupt source is ever armed; the state machine is
            // constructed but never started.
            let fsm = SaverFsm::new(TimeoutSetting::from_ticks(0), config);
            return Ok(Self {
                hal,
                fsm,
                mode: OperatingMode::Disabled,
            });
        }

        hal.activity().enable_interrupt().map_err(BootError::Hal)?;

        let timeout = read_timeout_setting(hal.adc(), &config)?;

        hal.relay().energize().map_err(BootError::Hal)?;

        let mut fsm = SaverFsm::new(timeout, config);
        fsm.start();
        hal.ticks().enable().map_err(BootError::Hal)?;

        hal.sleep()
            .set_mode(SleepMode::Idle)
            .map_err(BootError::Hal)?;

        #[cfg(feature = "defmt")]
        defmt::info!("booted, timeout {}s", timeout.as_secs(config.tick_hz));

        Ok(Self {
            hal,
            fsm,
            mode: OperatingMode::Active,
        })
    }

    /// Operating mode latched at boot
    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    /// State machine view (read-only)
    pub fn fsm(&self) -> &SaverFsm {
        &self.fsm
    }

    /// HAL view (read-only; mock inspection in tests)
    pub fn hal(&self) -> &H {
        &self.hal
    }

    /// Tick interrupt handler body
    pub fn handle_tick(&mut self) -> Result<TickOutcome, H::Error> {
        if self.mode == OperatingMode::Disabled {
            return Ok(TickOutcome::Ignored);
        }

        let outcome = self.fsm.on_tick();
        if outcome == TickOutcome::Expired {
            self.hal.ticks().disable()?;
            self.hal.relay().de_energize()?;
        }
        Ok(outcome)
    }

    /// Activity (pin-change) interrupt handler body.
    ///
    /// Samples the input level at the edge, feeds the state machine,
    /// and always leaves the relay energized. Returns `None` when the
    /// device is in Disabled mode (the interrupt is never armed there,
    /// so this is belt-and-braces only).
    pub fn handle_activity(&mut self) -> Result<Option<ActivityOutcome>, H::Error> {
        if self.mode == OperatingMode::Disabled {
            return Ok(None);
        }

        let level = InputLevel::from_is_low(self.hal.activity().is_low()?);
        let outcome = self.fsm.on_activity(level);

        self.hal.relay().energize()?;
        match outcome {
            ActivityOutcome::Restarted => self.hal.ticks().enable()?,
            ActivityOutcome::Held => self.hal.ticks().disable()?,
        }
        Ok(Some(outcome))
    }

    /// Park the processor once; an enabled interrupt wakes it
    pub fn park_once(&mut self) -> Result<(), H::Error> {
        self.hal.sleep().sleep()
    }

    /// The forever loop: sleep, wake on interrupt, sleep again.
    ///
    /// The loop body never inspects state; the handlers do everything.
    pub fn run(&mut self) -> Result<core::convert::Infallible, H::Error> {
        loop {
            self.park_once()?;
        }
    }
}

/// Soft tick driver for platforms without a dedicated tick timer.
///
/// Delivers ticks at the configured rate and returns once the countdown
/// expires; the caller re-invokes it after the next activity event.
#[cfg(feature = "embassy-time")]
pub async fn drive_ticks<H: SaverHal>(saver: &mut Saver<H>) -> Result<(), H::Error> {
    use embassy_time::{Duration, Timer};

    let period = Duration::from_hz(u64::from(saver.fsm().config().tick_hz));
    loop {
        Timer::after(period).await;
        if matches!(saver.handle_tick()?, TickOutcome::Expired) {
            return Ok(());
        }
    }
}
