//! End-to-end scenarios from boot to relay transitions

#[cfg(test)]
mod tests {
    use saver_core::test_utils::activity_script::ActivityScript;
    use saver_core::test_utils::harness::SaverHarness;
    use saver_core::{
        ActivityPolicy, OperatingMode, SaverConfig, SaverState, SleepMode, TickOutcome,
    };

    /// Full-rate config exactly as the reference hardware runs
    fn hardware_config() -> SaverConfig {
        SaverConfig::default()
    }

    /// 1 Hz ticks keep scenario counts human-sized
    fn slow_config(policy: ActivityPolicy) -> SaverConfig {
        SaverConfig::new(policy, 1, 8, 1000).unwrap()
    }

    #[test]
    fn test_knob_at_minimum_cuts_power_after_30_minutes() {
        // Full 500 Hz tick rate: 1800 s * 500 = 900000 ticks
        let mut harness = SaverHarness::boot(0, hardware_config()).unwrap();
        assert_eq!(harness.timeout_ticks(), 900_000);

        assert_eq!(harness.advance_ticks(899_999), TickOutcome::Running);
        assert!(harness.relay_on());

        assert_eq!(harness.advance_ticks(1), TickOutcome::Expired);
        assert!(!harness.relay_on());
        assert!(!harness.timer_enabled());
    }

    #[test]
    fn test_knob_at_midpoint_gives_one_hour() {
        let harness = SaverHarness::boot(512, hardware_config()).unwrap();
        assert_eq!(harness.timeout_ticks(), 3600 * 500);
    }

    #[test]
    fn test_knob_at_maximum_gives_about_90_minutes() {
        let harness = SaverHarness::boot(1023, hardware_config()).unwrap();
        assert_eq!(harness.timeout_ticks(), 5392 * 500);
    }

    #[test]
    fn test_boot_leaves_load_powered() {
        let harness = SaverHarness::boot(0, slow_config(ActivityPolicy::AnyEdge)).unwrap();
        assert!(harness.relay_on());
        assert!(harness.timer_enabled());
        assert_eq!(harness.sleep_mode(), Some(SleepMode::Idle));
        assert_eq!(harness.saver().mode(), OperatingMode::Active);
    }

    #[test]
    fn test_activity_keeps_load_alive_indefinitely() {
        let mut harness = SaverHarness::boot(0, slow_config(ActivityPolicy::AnyEdge)).unwrap();
        let timeout = harness.timeout_ticks();

        // A player touches a control just before each deadline, five
        // awake periods in a row
        for _ in 0..5 {
            harness.advance_ticks(timeout - 1);
            assert!(harness.relay_on());
            harness.touch(true);
        }

        // Walk away: expiry lands exactly one timeout after the last touch
        harness.advance_ticks(timeout - 1);
        assert!(harness.relay_on());
        harness.advance_ticks(1);
        assert!(!harness.relay_on());
    }

    #[test]
    fn test_activity_after_power_down_restores_load() {
        let mut harness = SaverHarness::boot(0, slow_config(ActivityPolicy::AnyEdge)).unwrap();
        let timeout = harness.timeout_ticks();

        harness.advance_ticks(timeout);
        assert!(!harness.relay_on());
        assert_eq!(harness.saver().fsm().current_state(), SaverState::Expired);

        // Coin drop wakes the cabinet back up
        harness.touch(false);
        assert!(harness.relay_on());
        assert!(harness.timer_enabled());

        // And the countdown runs fresh from the top
        harness.advance_ticks(timeout - 1);
        assert!(harness.relay_on());
        harness.advance_ticks(1);
        assert!(!harness.relay_on());
    }

    #[test]
    fn test_ticks_while_stopped_change_nothing() {
        let mut harness = SaverHarness::boot(0, slow_config(ActivityPolicy::AnyEdge)).unwrap();
        let timeout = harness.timeout_ticks();

        harness.advance_ticks(timeout);
        assert!(!harness.relay_on());

        // Tick source is off; these periods pass without any interrupt
        assert_eq!(harness.advance_ticks(10 * timeout), TickOutcome::Ignored);
        assert!(!harness.relay_on());
        assert_eq!(harness.ticks_elapsed(), 11 * timeout);
    }

    #[test]
    fn test_scripted_press_release_sequence() {
        let mut harness =
            SaverHarness::boot(0, slow_config(ActivityPolicy::AnyEdge)).unwrap();
        let timeout = harness.timeout_ticks();

        // Two button presses mid-countdown, then silence until expiry
        ActivityScript::new()
            .press_release(100, 5)
            .press_release(500, 2)
            .run(&mut harness, timeout);

        assert!(!harness.relay_on());
        // 502 ticks elapsed at the last edge, plus one full timeout
        assert_eq!(harness.ticks_elapsed(), 502 + timeout);
    }

    #[test]
    fn test_disabled_mode_is_permanent() {
        let mut harness = SaverHarness::boot_disabled(hardware_config()).unwrap();

        assert_eq!(harness.saver().mode(), OperatingMode::Disabled);
        assert!(harness.relay_on());
        assert!(!harness.timer_enabled());
        assert_eq!(harness.sleep_mode(), Some(SleepMode::PowerDown));

        // Days of tick periods and stray edges later, nothing moved
        harness.advance_ticks(10_000_000);
        harness.touch(true);
        harness.touch(false);
        assert!(harness.relay_on());
        assert!(!harness.timer_enabled());
    }

    #[test]
    fn test_disabled_mode_never_touches_the_adc() {
        let harness = SaverHarness::boot_disabled(hardware_config()).unwrap();
        assert_eq!(harness.saver().hal().adc.conversions(), 0);
    }
}
