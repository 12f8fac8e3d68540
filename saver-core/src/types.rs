//! Core data types for the cabinet power saver

/// Countdown tick rate in ticks per second.
///
/// The reference hardware clocks its 8-bit timer so that the overflow
/// interrupt fires 500 times per second; all timeout durations are held
/// in these ticks.
pub const TICK_HZ: u32 = 500;

/// Shortest auto-off timeout in seconds (calibration knob at minimum).
pub const TIMEOUT_FLOOR_SECS: u32 = 1800;

/// Calibration scale numerator: seconds above the floor per sample step.
pub const TIMEOUT_SCALE_NUM: u32 = 225;

/// Calibration scale denominator.
pub const TIMEOUT_SCALE_DEN: u32 = 32;

/// Largest usable calibration sample (10-bit conversion, low bit dropped).
pub const CAL_SAMPLE_MAX: u16 = 511;

/// Warm-up conversions discarded before the calibration sample is taken.
pub const ADC_WARMUP_READS: u8 = 8;

/// Relay drive state (logic high = load powered)
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum RelayState {
    /// Relay coil driven, load receives AC power
    Energized,
    /// Relay coil released, load unpowered
    DeEnergized,
}

impl RelayState {
    pub const fn is_energized(&self) -> bool {
        matches!(self, RelayState::Energized)
    }
}

/// Logic level observed on the activity input
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum InputLevel {
    Low,
    High,
}

impl InputLevel {
    pub const fn from_is_low(is_low: bool) -> Self {
        if is_low {
            InputLevel::Low
        } else {
            InputLevel::High
        }
    }
}

/// Activity handling policies
///
/// Both policies energize the relay on every activity event; they differ
/// in what they do to the countdown timer.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ActivityPolicy {
    /// Any edge restarts the countdown from the full timeout (default).
    AnyEdge,
    /// Level-sensitive: a low level holds the relay on with the countdown
    /// stopped; a high level (control released) restarts the countdown.
    LevelSensitive,
}

/// Saver state machine states
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SaverState {
    /// Relay on, countdown stopped (boot, explicit stop, or level hold)
    Held,
    /// Relay on, countdown running
    Counting,
    /// Countdown reached zero: relay off, tick source stopped
    Expired,
}

impl SaverState {
    /// Returns true while the tick source should be running
    pub const fn timer_running(&self) -> bool {
        matches!(self, SaverState::Counting)
    }
}

/// Operating mode latched once at boot from the disable jumper
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum OperatingMode {
    /// Normal timed operation
    Active,
    /// Jumper present: relay permanently on, no timing logic runs
    Disabled,
}

/// Processor sleep depth
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SleepMode {
    /// Light sleep; timer and pin-change interrupts still wake the CPU
    Idle,
    /// Deepest sleep; with no interrupt sources armed the device never
    /// wakes until power is removed
    PowerDown,
}

/// Auto-off duration, fixed at boot from one calibration sample
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct TimeoutSetting {
    ticks: u32,
}

impl TimeoutSetting {
    /// Map a raw 10-bit conversion onto the timeout range.
    ///
    /// The low bit of the conversion is discarded (sample 0..=511), then
    /// scaled linearly from 30 minutes at 0 up to ~90 minutes at 511.
    pub const fn from_raw_conversion(raw: u16, tick_hz: u32) -> Self {
        Self::from_sample(raw >> 1, tick_hz)
    }

    /// Build from an already-truncated sample (0..=511)
    pub const fn from_sample(sample: u16, tick_hz: u32) -> Self {
        Self {
            ticks: Self::scaled_secs(sample) * tick_hz,
        }
    }

    /// Build directly from a tick count (tests, fixed configurations)
    pub const fn from_ticks(ticks: u32) -> Self {
        Self { ticks }
    }

    /// `225 * sample / 32 + 1800`, the knob-to-seconds mapping
    pub const fn scaled_secs(sample: u16) -> u32 {
        TIMEOUT_SCALE_NUM * sample as u32 / TIMEOUT_SCALE_DEN + TIMEOUT_FLOOR_SECS
    }

    /// Countdown length in ticks
    pub const fn as_ticks(&self) -> u32 {
        self.ticks
    }

    /// Countdown length in whole seconds at the given tick rate
    pub const fn as_secs(&self, tick_hz: u32) -> u32 {
        self.ticks / tick_hz
    }
}

/// Saver configuration parameters
#[derive(Copy, Clone, Debug)]
pub struct SaverConfig {
    /// Activity handling policy
    pub policy: ActivityPolicy,
    /// Tick source frequency in Hz
    pub tick_hz: u32,
    /// Discarded ADC conversions before the calibration sample
    pub warmup_reads: u8,
    /// Completion polls allowed per ADC conversion before giving up
    pub conversion_poll_budget: u32,
}

impl Default for SaverConfig {
    fn default() -> Self {
        Self {
            policy: ActivityPolicy::AnyEdge,
            tick_hz: TICK_HZ,
            warmup_reads: ADC_WARMUP_READS,
            conversion_poll_budget: 1_000_000,
        }
    }
}

impl SaverConfig {
    /// Create a new configuration with validation
    pub fn new(
        policy: ActivityPolicy,
        tick_hz: u32,
        warmup_reads: u8,
        conversion_poll_budget: u32,
    ) -> Result<Self, &'static str> {
        if tick_hz == 0 || tick_hz > 10_000 {
            return Err("Tick rate must be between 1 and 10000 Hz");
        }
        if warmup_reads > 64 {
            return Err("Warm-up reads must be <= 64");
        }
        if conversion_poll_budget == 0 {
            return Err("Conversion poll budget must be nonzero");
        }

        Ok(Self {
            policy,
            tick_hz,
            warmup_reads,
            conversion_poll_budget,
        })
    }

    /// Shortest possible timeout in ticks (sample 0)
    pub const fn min_timeout_ticks(&self) -> u32 {
        TIMEOUT_FLOOR_SECS * self.tick_hz
    }

    /// Longest possible timeout in ticks (sample 511)
    pub const fn max_timeout_ticks(&self) -> u32 {
        TimeoutSetting::scaled_secs(CAL_SAMPLE_MAX) * self.tick_hz
    }
}
