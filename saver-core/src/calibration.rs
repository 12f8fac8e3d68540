//! Boot-time timeout calibration
//!
//! One analog read at power-up decides the auto-off duration for the
//! rest of this power cycle. The analog front end is warmed up with a
//! handful of discarded conversions, sampled once, then powered down
//! and never touched again.

use crate::hal::CalibrationAdc;
use crate::types::{SaverConfig, TimeoutSetting};

/// Errors from the one-shot calibration read
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CalibrationError<E> {
    /// Conversion never signalled completion within the poll budget.
    ///
    /// On real hardware the budget is generous enough that this only
    /// happens when the ADC is broken; the original design simply hung
    /// at boot in that case.
    ConversionTimeout,
    /// Underlying HAL failure
    Hal(E),
}

#[cfg(feature = "std")]
impl<E: core::fmt::Display> core::fmt::Display for CalibrationError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CalibrationError::ConversionTimeout => {
                write!(f, "ADC conversion never completed")
            }
            CalibrationError::Hal(e) => write!(f, "HAL failure: {}", e),
        }
    }
}

/// Run one conversion with a bounded completion poll
fn convert<A: CalibrationAdc>(
    adc: &mut A,
    poll_budget: u32,
) -> Result<u16, CalibrationError<A::Error>> {
    adc.start_conversion().map_err(CalibrationError::Hal)?;

    for _ in 0..poll_budget {
        if adc.conversion_ready().map_err(CalibrationError::Hal)? {
            return adc.read_conversion().map_err(CalibrationError::Hal);
        }
    }

    Err(CalibrationError::ConversionTimeout)
}

/// Read the calibration knob and derive the timeout setting.
///
/// Performs `config.warmup_reads` discarded conversions to let the
/// input settle, takes one real conversion, then powers the ADC down.
pub fn read_timeout_setting<A: CalibrationAdc>(
    adc: &mut A,
    config: &SaverConfig,
) -> Result<TimeoutSetting, CalibrationError<A::Error>> {
    adc.power_up().map_err(CalibrationError::Hal)?;

    for _ in 0..config.warmup_reads {
        convert(adc, config.conversion_poll_budget)?;
    }

    let raw = convert(adc, config.conversion_poll_budget)?;
    let setting = TimeoutSetting::from_raw_conversion(raw, config.tick_hz);

    adc.power_down().map_err(CalibrationError::Hal)?;

    #[cfg(feature = "defmt")]
    defmt::info!(
        "calibration: raw={} timeout={}s",
        raw,
        setting.as_secs(config.tick_hz)
    );

    Ok(setting)
}
