//! Register-level hardware access for the ATtiny13A board
//!
//! Pinout: PB1 disable jumper (pulled up), PB2 calibration pot (ADC1),
//! PB3 activity line (PCINT3), PB4 relay drive, PB5 tick debug output.

use avr_device::attiny13a;
use saver_core::hal::{CalibrationAdc, HalError};

/// Timer reload value. The timer counts at 75 kHz (4.8 MHz / 64); 150
/// counts to overflow gives the 500 Hz tick.
pub const TIMER_RELOAD: u8 = (256 - 150) as u8;

// PORTB bits
const JUMPER_BIT: u8 = 1 << 1;
const RELAY_BIT: u8 = 1 << 4;
const DEBUG_BIT: u8 = 1 << 5;

// Timer0 register bits
const TOIE0: u8 = 1 << 1;
const TOV0: u8 = 1 << 1;
const CS01_CS00: u8 = 0x03; // clk/64

// ADC register bits
const ADEN: u8 = 1 << 7;
const ADSC: u8 = 1 << 6;
const ADIF: u8 = 1 << 4;
const ADPS_DIV32: u8 = 0x05; // 4.8 MHz / 32 = 150 kHz
const MUX_ADC1: u8 = 0x01; // Vcc reference, right adjusted, ADC1 on PB2
const ADC1D: u8 = 1 << 1;
const PRADC: u8 = 1 << 0;

// Pin change interrupt bits
const PCINT3: u8 = 1 << 3;
const PCIE: u8 = 1 << 5;

// Sleep control bits in MCUCR
const SE: u8 = 1 << 5;
const SM1: u8 = 1 << 4;

// Watchdog bits in WDTCR
const WDCE: u8 = 1 << 4;
const WDE: u8 = 1 << 3;

/// Turn the watchdog off for good. Long power-down sleeps must not be
/// interrupted by watchdog resets.
pub fn disable_watchdog() {
    unsafe {
        avr_device::asm::wdr();
        let wdt = &(*attiny13a::WDT::ptr());
        wdt.wdtcr.modify(|r, w| w.bits(r.bits() | WDCE | WDE));
        wdt.wdtcr.write(|w| w.bits(0));
    }
}

/// Pullup on the jumper line, relay and debug pins as outputs (low)
pub fn init_pins() {
    unsafe {
        let portb = &(*attiny13a::PORTB::ptr());
        portb.portb.write(|w| w.bits(JUMPER_BIT));
        portb.ddrb.write(|w| w.bits(RELAY_BIT | DEBUG_BIT));
    }
    // Port state needs two cycles to synchronise before the first read
    avr_device::asm::nop();
    avr_device::asm::nop();
}

/// True when the disable jumper pulls PB1 low
pub fn jumper_fitted() -> bool {
    unsafe {
        let portb = &(*attiny13a::PORTB::ptr());
        portb.pinb.read().bits() & JUMPER_BIT == 0
    }
}

pub fn relay_on() {
    unsafe {
        let portb = &(*attiny13a::PORTB::ptr());
        portb.portb.modify(|r, w| w.bits(r.bits() | RELAY_BIT));
    }
}

pub fn relay_off() {
    unsafe {
        let portb = &(*attiny13a::PORTB::ptr());
        portb.portb.modify(|r, w| w.bits(r.bits() & !RELAY_BIT));
    }
}

/// Latch the debug line high (disable-mode indicator)
pub fn debug_high() {
    unsafe {
        let portb = &(*attiny13a::PORTB::ptr());
        portb.portb.modify(|r, w| w.bits(r.bits() | DEBUG_BIT));
    }
}

/// Toggle the debug line (scope trace of the tick, writing PINB toggles)
pub fn debug_toggle() {
    unsafe {
        let portb = &(*attiny13a::PORTB::ptr());
        portb.pinb.write(|w| w.bits(DEBUG_BIT));
    }
}

/// Arm the pin change interrupt on the activity line
pub fn arm_activity_interrupt() {
    unsafe {
        let exint = &(*attiny13a::EXINT::ptr());
        exint.pcmsk.write(|w| w.bits(PCINT3));
        exint.gimsk.write(|w| w.bits(PCIE));
    }
}

/// Reload and enable the tick timer
pub fn start_tick_timer() {
    unsafe {
        let tc0 = &(*attiny13a::TC0::ptr());
        tc0.tcnt0.write(|w| w.bits(TIMER_RELOAD));
        tc0.timsk0.write(|w| w.bits(TOIE0));
        tc0.tccr0b.write(|w| w.bits(CS01_CS00));
    }
}

/// Stop the tick timer and clear any pending overflow
pub fn stop_tick_timer() {
    unsafe {
        let tc0 = &(*attiny13a::TC0::ptr());
        tc0.timsk0.write(|w| w.bits(0));
        tc0.tifr0.write(|w| w.bits(TOV0));
        tc0.tccr0a.write(|w| w.bits(0));
        tc0.tccr0b.write(|w| w.bits(0));
        tc0.tcnt0.write(|w| w.bits(0));
    }
}

/// Reload the counter for the next tick period
pub fn reload_tick_timer() {
    unsafe {
        let tc0 = &(*attiny13a::TC0::ptr());
        tc0.tcnt0.write(|w| w.bits(TIMER_RELOAD));
        tc0.tifr0.write(|w| w.bits(TOV0));
    }
}

/// Idle sleep: timer and pin change interrupts still wake the CPU
pub fn select_idle_sleep() {
    unsafe {
        let cpu = &(*attiny13a::CPU::ptr());
        cpu.mcucr.modify(|r, w| w.bits((r.bits() & !SM1) | SE));
    }
}

/// Power-down sleep: nothing armed means nothing ever wakes us
pub fn select_power_down_sleep() {
    unsafe {
        let cpu = &(*attiny13a::CPU::ptr());
        cpu.mcucr.modify(|r, w| w.bits(r.bits() | SM1 | SE));
    }
}

/// Park the CPU until an enabled interrupt fires
pub fn sleep_now() {
    avr_device::asm::sleep();
}

/// Calibration pot on ADC1, used once at boot through the core's
/// calibration reader.
pub struct KnobAdc;

impl CalibrationAdc for KnobAdc {
    type Error = HalError;

    fn power_up(&mut self) -> Result<(), Self::Error> {
        unsafe {
            let adc = &(*attiny13a::ADC::ptr());
            adc.didr0.write(|w| w.bits(ADC1D));
            adc.admux.write(|w| w.bits(MUX_ADC1));
            adc.adcsrb.write(|w| w.bits(0));
            adc.adcsra.write(|w| w.bits(ADEN | ADPS_DIV32));
        }
        avr_device::asm::nop();
        avr_device::asm::nop();
        Ok(())
    }

    fn start_conversion(&mut self) -> Result<(), Self::Error> {
        unsafe {
            let adc = &(*attiny13a::ADC::ptr());
            adc.adcsra.modify(|r, w| w.bits(r.bits() | ADSC));
        }
        Ok(())
    }

    fn conversion_ready(&mut self) -> Result<bool, Self::Error> {
        unsafe {
            let adc = &(*attiny13a::ADC::ptr());
            Ok(adc.adcsra.read().bits() & ADIF != 0)
        }
    }

    fn read_conversion(&mut self) -> Result<u16, Self::Error> {
        unsafe {
            let adc = &(*attiny13a::ADC::ptr());
            // Writing the flag bit clears it
            adc.adcsra.modify(|r, w| w.bits(r.bits() | ADIF));
            Ok(adc.adc.read().bits())
        }
    }

    fn power_down(&mut self) -> Result<(), Self::Error> {
        unsafe {
            let adc = &(*attiny13a::ADC::ptr());
            adc.adcsra.write(|w| w.bits(0));
            let cpu = &(*attiny13a::CPU::ptr());
            cpu.prr.write(|w| w.bits(PRADC));
        }
        Ok(())
    }
}
