//! Property tests for the knob-to-timeout calibration mapping

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use saver_core::test_utils::harness::SaverHarness;
    use saver_core::{
        SaverConfig, TimeoutSetting, CAL_SAMPLE_MAX, TICK_HZ, TIMEOUT_FLOOR_SECS,
    };

    proptest! {
        #[test]
        fn prop_timeout_monotonic_in_sample(a in 0u16..=511, b in 0u16..=511) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(
                TimeoutSetting::scaled_secs(lo) <= TimeoutSetting::scaled_secs(hi)
            );
        }

        #[test]
        fn prop_timeout_bounded(raw in 0u16..=1023) {
            let setting = TimeoutSetting::from_raw_conversion(raw, TICK_HZ);
            let secs = setting.as_secs(TICK_HZ);
            prop_assert!(secs >= TIMEOUT_FLOOR_SECS);
            prop_assert!(secs <= TimeoutSetting::scaled_secs(CAL_SAMPLE_MAX));
        }

        #[test]
        fn prop_ticks_scale_with_rate(sample in 0u16..=511, hz in 1u32..=10_000) {
            let setting = TimeoutSetting::from_sample(sample, hz);
            prop_assert_eq!(
                setting.as_ticks(),
                TimeoutSetting::scaled_secs(sample) * hz
            );
        }

        #[test]
        fn prop_low_bit_of_conversion_is_ignored(raw in 0u16..=1022) {
            let even = TimeoutSetting::from_raw_conversion(raw & !1, TICK_HZ);
            let odd = TimeoutSetting::from_raw_conversion(raw | 1, TICK_HZ);
            prop_assert_eq!(even, odd);
        }

        #[test]
        fn prop_boot_timeout_always_in_range(raw in 0u16..=1023) {
            let harness = SaverHarness::boot(raw, SaverConfig::default()).unwrap();
            let ticks = harness.timeout_ticks();
            prop_assert!(ticks >= u64::from(TIMEOUT_FLOOR_SECS * TICK_HZ));
            prop_assert!(ticks <= u64::from(5392 * TICK_HZ));
            prop_assert!(harness.relay_on());
        }
    }

    /// The three reference points called out in the hardware notes
    #[test]
    fn test_reference_knob_positions() {
        assert_eq!(TimeoutSetting::scaled_secs(0), 1800); // 30 min
        assert_eq!(TimeoutSetting::scaled_secs(256), 3600); // 60 min
        assert_eq!(TimeoutSetting::scaled_secs(511), 5392); // ~90 min
    }
}
