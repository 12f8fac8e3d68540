//! Hardware Abstraction Layer for the power saver
//!
//! One trait per physical resource: activity line, relay pin, disable
//! jumper, calibration ADC, tick source, sleep control. The firmware
//! implements them over raw registers; tests use the `mock` module.

use crate::types::SleepMode;
use embedded_hal::digital::{InputPin, OutputPin};

/// Error types for HAL operations
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HalError {
    /// GPIO operation failed
    GpioError,
    /// ADC operation failed
    AdcError,
    /// Timer operation failed
    TimingError,
    /// Interrupt configuration failed
    InterruptError,
    /// Hardware not initialized
    NotInitialized,
}

#[cfg(feature = "std")]
impl core::fmt::Display for HalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HalError::GpioError => write!(f, "GPIO operation failed"),
            HalError::AdcError => write!(f, "ADC operation failed"),
            HalError::TimingError => write!(f, "Timer operation failed"),
            HalError::InterruptError => write!(f, "Interrupt configuration failed"),
            HalError::NotInitialized => write!(f, "Hardware not initialized"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HalError {}

/// Trait for the activity input line (user controls)
pub trait ActivityInput {
    type Error: From<HalError>;

    /// Sample the current level (true = line held low)
    fn is_low(&mut self) -> Result<bool, Self::Error>;

    /// Arm edge interrupts for this line
    fn enable_interrupt(&mut self) -> Result<(), Self::Error>;

    /// Disarm edge interrupts for this line
    fn disable_interrupt(&mut self) -> Result<(), Self::Error>;
}

/// Trait for the relay drive pin
pub trait RelayOutput {
    type Error: From<HalError>;

    /// Drive the relay coil (true = energized = load powered)
    fn set_state(&mut self, state: bool) -> Result<(), Self::Error>;

    /// Get current drive state
    fn get_state(&self) -> Result<bool, Self::Error>;

    /// Energize the relay. Idempotent.
    fn energize(&mut self) -> Result<(), Self::Error> {
        self.set_state(true)
    }

    /// De-energize the relay. Idempotent.
    fn de_energize(&mut self) -> Result<(), Self::Error> {
        self.set_state(false)
    }
}

/// Trait for the disable jumper input, read once at boot
pub trait DisableJumper {
    type Error: From<HalError>;

    /// True when the jumper is fitted (line pulled low)
    fn is_fitted(&mut self) -> Result<bool, Self::Error>;
}

/// Trait for the calibration ADC, used for one read at boot
pub trait CalibrationAdc {
    type Error: From<HalError>;

    /// Enable the analog front end on the calibration channel
    fn power_up(&mut self) -> Result<(), Self::Error>;

    /// Kick off one conversion
    fn start_conversion(&mut self) -> Result<(), Self::Error>;

    /// Poll for conversion completion
    fn conversion_ready(&mut self) -> Result<bool, Self::Error>;

    /// Read the completed 10-bit conversion (0..=1023)
    fn read_conversion(&mut self) -> Result<u16, Self::Error>;

    /// Power the analog subsystem down for good
    fn power_down(&mut self) -> Result<(), Self::Error>;
}

/// Trait for the periodic tick source
pub trait TickSource {
    type Error: From<HalError>;

    /// Reload and enable the tick interrupt
    fn enable(&mut self) -> Result<(), Self::Error>;

    /// Disable the tick interrupt
    fn disable(&mut self) -> Result<(), Self::Error>;
}

/// Trait for processor sleep control
pub trait SleepControl {
    type Error: From<HalError>;

    /// Select the sleep mode used by subsequent `sleep()` calls
    fn set_mode(&mut self, mode: SleepMode) -> Result<(), Self::Error>;

    /// Park the processor until an enabled interrupt wakes it
    fn sleep(&mut self) -> Result<(), Self::Error>;
}

/// Complete saver HAL interface
///
/// Component error types are unified so the scheduler can propagate a
/// single error type through the boot sequence and handlers.
pub trait SaverHal {
    type Error: From<HalError>;
    type Activity: ActivityInput<Error = Self::Error>;
    type Relay: RelayOutput<Error = Self::Error>;
    type Jumper: DisableJumper<Error = Self::Error>;
    type Adc: CalibrationAdc<Error = Self::Error>;
    type Ticks: TickSource<Error = Self::Error>;
    type Sleep: SleepControl<Error = Self::Error>;

    /// One-time hardware bring-up: watchdog off, pin directions, pullups
    fn initialize(&mut self) -> Result<(), Self::Error>;

    fn activity(&mut self) -> &mut Self::Activity;
    fn relay(&mut self) -> &mut Self::Relay;
    fn jumper(&mut self) -> &mut Self::Jumper;
    fn adc(&mut self) -> &mut Self::Adc;
    fn ticks(&mut self) -> &mut Self::Ticks;
    fn sleep(&mut self) -> &mut Self::Sleep;
}

/// Generic activity input over an embedded-hal pin.
///
/// Interrupt arming stays platform-specific; a wrapper type must
/// override the interrupt methods for real hardware.
pub struct EmbeddedHalActivity<P> {
    pin: P,
}

impl<P> EmbeddedHalActivity<P>
where
    P: InputPin,
{
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P> ActivityInput for EmbeddedHalActivity<P>
where
    P: InputPin,
{
    type Error = HalError;

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.pin.is_low().map_err(|_| HalError::GpioError)
    }

    fn enable_interrupt(&mut self) -> Result<(), Self::Error> {
        // Platform-specific implementation required
        Err(HalError::InterruptError)
    }

    fn disable_interrupt(&mut self) -> Result<(), Self::Error> {
        // Platform-specific implementation required
        Err(HalError::InterruptError)
    }
}

/// Generic relay drive over an embedded-hal output pin
pub struct EmbeddedHalRelay<P> {
    pin: P,
    inverted: bool,
    state: bool,
}

impl<P> EmbeddedHalRelay<P>
where
    P: OutputPin,
{
    pub fn new(pin: P, inverted: bool) -> Self {
        Self {
            pin,
            inverted,
            state: false,
        }
    }
}

impl<P> RelayOutput for EmbeddedHalRelay<P>
where
    P: OutputPin,
{
    type Error = HalError;

    fn set_state(&mut self, state: bool) -> Result<(), Self::Error> {
        let drive = if self.inverted { !state } else { state };
        let result = if drive {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        result.map_err(|_| HalError::GpioError)?;
        self.state = state;
        Ok(())
    }

    fn get_state(&self) -> Result<bool, Self::Error> {
        Ok(self.state)
    }
}

/// Generic disable jumper over an embedded-hal pin (pulled up, jumper
/// shorts the line to ground)
pub struct EmbeddedHalJumper<P> {
    pin: P,
}

impl<P> EmbeddedHalJumper<P>
where
    P: InputPin,
{
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P> DisableJumper for EmbeddedHalJumper<P>
where
    P: InputPin,
{
    type Error = HalError;

    fn is_fitted(&mut self) -> Result<bool, Self::Error> {
        self.pin.is_low().map_err(|_| HalError::GpioError)
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    //! Mock implementations for testing

    use super::*;
    use core::cell::RefCell;

    #[derive(Default)]
    pub struct MockActivity {
        low: RefCell<bool>,
        interrupt_enabled: RefCell<bool>,
    }

    impl MockActivity {
        pub fn new() -> Self {
            Self::default()
        }

        /// Drive the simulated line level
        pub fn set_low(&self, low: bool) {
            *self.low.borrow_mut() = low;
        }

        pub fn interrupt_enabled(&self) -> bool {
            *self.interrupt_enabled.borrow()
        }
    }

    impl ActivityInput for MockActivity {
        type Error = HalError;

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(*self.low.borrow())
        }

        fn enable_interrupt(&mut self) -> Result<(), Self::Error> {
            *self.interrupt_enabled.borrow_mut() = true;
            Ok(())
        }

        fn disable_interrupt(&mut self) -> Result<(), Self::Error> {
            *self.interrupt_enabled.borrow_mut() = false;
            Ok(())
        }
    }

    #[derive(Default)]
    pub struct MockRelay {
        state: RefCell<bool>,
        writes: RefCell<u32>,
    }

    impl MockRelay {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn is_energized(&self) -> bool {
            *self.state.borrow()
        }

        /// Number of pin writes seen (idempotency checks)
        pub fn write_count(&self) -> u32 {
            *self.writes.borrow()
        }
    }

    impl RelayOutput for MockRelay {
        type Error = HalError;

        fn set_state(&mut self, state: bool) -> Result<(), Self::Error> {
            *self.state.borrow_mut() = state;
            *self.writes.borrow_mut() += 1;
            Ok(())
        }

        fn get_state(&self) -> Result<bool, Self::Error> {
            Ok(*self.state.borrow())
        }
    }

    #[derive(Default)]
    pub struct MockJumper {
        fitted: bool,
    }

    impl MockJumper {
        pub fn new(fitted: bool) -> Self {
            Self { fitted }
        }
    }

    impl DisableJumper for MockJumper {
        type Error = HalError;

        fn is_fitted(&mut self) -> Result<bool, Self::Error> {
            Ok(self.fitted)
        }
    }

    /// Scripted ADC: returns a fixed sample after a configurable number
    /// of completion polls per conversion.
    pub struct MockAdc {
        sample: u16,
        latency_polls: u32,
        polls_left: RefCell<u32>,
        conversion_started: RefCell<bool>,
        conversions: RefCell<u32>,
        powered: RefCell<bool>,
        powered_down: RefCell<bool>,
        stuck: bool,
    }

    impl MockAdc {
        pub fn new(sample: u16) -> Self {
            Self {
                sample,
                latency_polls: 1,
                polls_left: RefCell::new(0),
                conversion_started: RefCell::new(false),
                conversions: RefCell::new(0),
                powered: RefCell::new(false),
                powered_down: RefCell::new(false),
                stuck: false,
            }
        }

        /// Completion polls needed before each conversion finishes
        pub fn with_latency(mut self, polls: u32) -> Self {
            self.latency_polls = polls;
            self
        }

        /// Simulate hardware that never signals completion
        pub fn stuck(mut self) -> Self {
            self.stuck = true;
            self
        }

        /// Conversions completed so far (warm-up + calibration)
        pub fn conversions(&self) -> u32 {
            *self.conversions.borrow()
        }

        pub fn was_powered_down(&self) -> bool {
            *self.powered_down.borrow()
        }
    }

    impl CalibrationAdc for MockAdc {
        type Error = HalError;

        fn power_up(&mut self) -> Result<(), Self::Error> {
            *self.powered.borrow_mut() = true;
            Ok(())
        }

        fn start_conversion(&mut self) -> Result<(), Self::Error> {
            if !*self.powered.borrow() || *self.powered_down.borrow() {
                return Err(HalError::AdcError);
            }
            *self.conversion_started.borrow_mut() = true;
            *self.polls_left.borrow_mut() = self.latency_polls;
            Ok(())
        }

        fn conversion_ready(&mut self) -> Result<bool, Self::Error> {
            if self.stuck {
                return Ok(false);
            }
            let mut left = self.polls_left.borrow_mut();
            if *left > 0 {
                *left -= 1;
            }
            Ok(*left == 0)
        }

        fn read_conversion(&mut self) -> Result<u16, Self::Error> {
            if !*self.conversion_started.borrow() {
                return Err(HalError::AdcError);
            }
            *self.conversion_started.borrow_mut() = false;
            *self.conversions.borrow_mut() += 1;
            Ok(self.sample)
        }

        fn power_down(&mut self) -> Result<(), Self::Error> {
            *self.powered.borrow_mut() = false;
            *self.powered_down.borrow_mut() = true;
            Ok(())
        }
    }

    #[derive(Default)]
    pub struct MockTicks {
        enabled: RefCell<bool>,
        enables: RefCell<u32>,
    }

    impl MockTicks {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn is_enabled(&self) -> bool {
            *self.enabled.borrow()
        }

        pub fn enable_count(&self) -> u32 {
            *self.enables.borrow()
        }
    }

    impl TickSource for MockTicks {
        type Error = HalError;

        fn enable(&mut self) -> Result<(), Self::Error> {
            *self.enabled.borrow_mut() = true;
            *self.enables.borrow_mut() += 1;
            Ok(())
        }

        fn disable(&mut self) -> Result<(), Self::Error> {
            *self.enabled.borrow_mut() = false;
            Ok(())
        }
    }

    #[derive(Default)]
    pub struct MockSleep {
        mode: RefCell<Option<SleepMode>>,
        sleeps: RefCell<u32>,
    }

    impl MockSleep {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn mode(&self) -> Option<SleepMode> {
            *self.mode.borrow()
        }

        pub fn sleep_count(&self) -> u32 {
            *self.sleeps.borrow()
        }
    }

    impl SleepControl for MockSleep {
        type Error = HalError;

        fn set_mode(&mut self, mode: SleepMode) -> Result<(), Self::Error> {
            *self.mode.borrow_mut() = Some(mode);
            Ok(())
        }

        fn sleep(&mut self) -> Result<(), Self::Error> {
            *self.sleeps.borrow_mut() += 1;
            Ok(())
        }
    }

    /// Full mock hardware collection
    pub struct MockSaverHal {
        pub activity: MockActivity,
        pub relay: MockRelay,
        pub jumper: MockJumper,
        pub adc: MockAdc,
        pub ticks: MockTicks,
        pub sleep: MockSleep,
        pub initialized: bool,
    }

    impl MockSaverHal {
        /// Jumper absent, knob at the given raw conversion value
        pub fn new(raw_sample: u16) -> Self {
            Self {
                activity: MockActivity::new(),
                relay: MockRelay::new(),
                jumper: MockJumper::new(false),
                adc: MockAdc::new(raw_sample),
                ticks: MockTicks::new(),
                sleep: MockSleep::new(),
                initialized: false,
            }
        }

        /// Same, with the disable jumper fitted
        pub fn with_jumper(raw_sample: u16) -> Self {
            let mut hal = Self::new(raw_sample);
            hal.jumper = MockJumper::new(true);
            hal
        }
    }

    impl SaverHal for MockSaverHal {
        type Error = HalError;
        type Activity = MockActivity;
        type Relay = MockRelay;
        type Jumper = MockJumper;
        type Adc = MockAdc;
        type Ticks = MockTicks;
        type Sleep = MockSleep;

        fn initialize(&mut self) -> Result<(), Self::Error> {
            self.initialized = true;
            Ok(())
        }

        fn activity(&mut self) -> &mut Self::Activity {
            &mut self.activity
        }

        fn relay(&mut self) -> &mut Self::Relay {
            &mut self.relay
        }

        fn jumper(&mut self) -> &mut Self::Jumper {
            &mut self.jumper
        }

        fn adc(&mut self) -> &mut Self::Adc {
            &mut self.adc
        }

        fn ticks(&mut self) -> &mut Self::Ticks {
            &mut self.ticks
        }

        fn sleep(&mut self) -> &mut Self::Sleep {
            &mut self.sleep
        }
    }
}
