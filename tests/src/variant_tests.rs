//! Activity policy behaviors, Variant A (any-edge) vs Variant B
//! (level-sensitive)

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use saver_core::test_utils::harness::SaverHarness;
    use saver_core::{ActivityOutcome, ActivityPolicy, SaverConfig};

    fn harness(policy: ActivityPolicy) -> SaverHarness {
        let config = SaverConfig::new(policy, 1, 8, 1000).unwrap();
        SaverHarness::boot(0, config).unwrap()
    }

    #[rstest]
    #[case::line_low(true)]
    #[case::line_high(false)]
    fn test_any_edge_restarts_whatever_the_level(#[case] line_low: bool) {
        let mut h = harness(ActivityPolicy::AnyEdge);
        let timeout = h.timeout_ticks();

        h.advance_ticks(timeout / 2);
        assert_eq!(h.touch(line_low), Some(ActivityOutcome::Restarted));
        assert!(h.relay_on());
        assert!(h.timer_enabled());
        assert_eq!(u64::from(h.saver().fsm().countdown()), timeout);
    }

    #[rstest]
    #[case::line_low(true)]
    #[case::line_high(false)]
    fn test_every_activity_event_energizes_the_relay(#[case] line_low: bool) {
        // Holds for both policies, including Variant B's released branch
        for policy in [ActivityPolicy::AnyEdge, ActivityPolicy::LevelSensitive] {
            let mut h = harness(policy);
            let timeout = h.timeout_ticks();

            h.advance_ticks(timeout);
            assert!(!h.relay_on());

            h.touch(line_low);
            assert!(h.relay_on(), "{:?} with line_low={}", policy, line_low);
        }
    }

    #[test]
    fn test_level_sensitive_hold_defeats_the_countdown() {
        let mut h = harness(ActivityPolicy::LevelSensitive);
        let timeout = h.timeout_ticks();

        assert_eq!(h.touch(true), Some(ActivityOutcome::Held));
        assert!(!h.timer_enabled());

        // A control stuck low simply means auto-off never fires
        h.advance_ticks(100 * timeout);
        assert!(h.relay_on());
    }

    #[test]
    fn test_level_sensitive_release_arms_the_countdown() {
        let mut h = harness(ActivityPolicy::LevelSensitive);
        let timeout = h.timeout_ticks();

        h.touch(true);
        h.advance_ticks(42);

        assert_eq!(h.touch(false), Some(ActivityOutcome::Restarted));
        assert!(h.timer_enabled());
        assert_eq!(u64::from(h.saver().fsm().countdown()), timeout);

        h.advance_ticks(timeout - 1);
        assert!(h.relay_on());
        h.advance_ticks(1);
        assert!(!h.relay_on());
    }

    #[test]
    fn test_level_sensitive_hold_release_cycles() {
        let mut h = harness(ActivityPolicy::LevelSensitive);
        let timeout = h.timeout_ticks();

        for _ in 0..3 {
            h.touch(true);
            h.advance_ticks(timeout * 2);
            assert!(h.relay_on());

            h.touch(false);
            h.advance_ticks(timeout / 2);
            assert!(h.relay_on());
        }

        // Last release left half the countdown spent
        h.advance_ticks(timeout - timeout / 2);
        assert!(!h.relay_on());
    }
}
