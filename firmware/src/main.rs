#![no_std]
#![no_main]

//! Cabinet power saver firmware for the ATtiny13A board.
//!
//! Boot latches the operating mode from the disable jumper, calibrates
//! the auto-off timeout from the pot, energizes the relay and starts
//! the 500 Hz countdown. After that the main loop only sleeps; the two
//! interrupt handlers below do all the work.

use panic_halt as _;

use avr_device::interrupt;

use saver_core::calibration::read_timeout_setting;
use saver_core::controller::SharedCountdown;
use saver_core::types::{ActivityPolicy, SaverConfig, TICK_HZ};

mod attiny13_hardware;
use attiny13_hardware as hw;

/// Countdown shared between the two interrupt handlers
static COUNTDOWN: SharedCountdown = SharedCountdown::new();

#[used]
static CREDITS: &[u8] = b"rustysaver cabinet power saver";

/// Stop, reload and restart the countdown timer. Safe to call whether
/// or not the timer is currently running.
fn restart_countdown() {
    interrupt::free(|_| {
        hw::stop_tick_timer();
        COUNTDOWN.arm();
        hw::start_tick_timer();
    });
}

#[avr_device::entry]
fn main() -> ! {
    // A watchdog reset mid-sleep would defeat the whole point
    hw::disable_watchdog();
    hw::init_pins();

    if hw::jumper_fitted() {
        // Permanently disabled: load on, indicator on, deepest sleep,
        // no interrupt source armed. Only a power cycle gets out.
        hw::relay_on();
        hw::debug_high();
        hw::select_power_down_sleep();
    } else {
        hw::arm_activity_interrupt();

        let config = SaverConfig {
            policy: ActivityPolicy::AnyEdge,
            tick_hz: TICK_HZ,
            ..SaverConfig::default()
        };

        // One knob read decides the timeout for this power cycle. A
        // conversion that never completes leaves the board stalled
        // here, same as the original hardware.
        let timeout = loop {
            if let Ok(t) = read_timeout_setting(&mut hw::KnobAdc, &config) {
                break t;
            }
        };
        COUNTDOWN.set_timeout(timeout.as_ticks());

        hw::relay_on();
        restart_countdown();
        hw::select_idle_sleep();

        unsafe { interrupt::enable() };
    }

    // Interrupts do the rest; sit here and sleep
    loop {
        hw::sleep_now();
    }
}

/// Tick handler: count down, and on expiry stop the timer and drop the
/// load. The next pin change wakes everything up again.
#[avr_device::interrupt(attiny13a)]
fn TIM0_OVF() {
    // Scope trace of the tick
    hw::debug_toggle();

    if COUNTDOWN.tick() {
        hw::stop_tick_timer();
        hw::relay_off();
    } else {
        hw::reload_tick_timer();
    }
}

/// Activity handler: any edge on the control line restarts the
/// countdown and makes sure the load is powered.
#[avr_device::interrupt(attiny13a)]
fn PCINT0() {
    restart_countdown();
    hw::relay_on();
}
