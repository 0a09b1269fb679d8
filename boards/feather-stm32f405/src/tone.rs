#![deny(unsafe_code)]
#![deny(warnings)]
//! Piezo buzzer on a timer PWM channel

use defmt::debug;
use embassy_stm32::gpio::OutputType;
use embassy_stm32::peripherals::{PB8, TIM4};
use embassy_stm32::time::Hertz;
use embassy_stm32::timer::low_level::CountingMode;
use embassy_stm32::timer::simple_pwm::{PwmPin, SimplePwm};
use embassy_stm32::Peri;
use hal_abstractions::ToneOutput;

/// Frequency the timer is set up with before the first tone
const IDLE_FREQUENCY_HZ: u32 = 1_000;

/// Square wave at 50% duty on TIM4 channel 3
pub struct PwmTone {
    pwm: SimplePwm<'static, TIM4>,
    sounding_hz: Option<u32>,
}

impl PwmTone {
    /// Set up the timer with the output disabled
    pub fn new(timer: Peri<'static, TIM4>, pin: Peri<'static, PB8>) -> Self {
        let ch3 = PwmPin::new(pin, OutputType::PushPull);
        let mut pwm = SimplePwm::new(
            timer,
            None,
            None,
            Some(ch3),
            None,
            Hertz(IDLE_FREQUENCY_HZ),
            CountingMode::EdgeAlignedUp,
        );
        pwm.ch3().disable();
        Self {
            pwm,
            sounding_hz: None,
        }
    }
}

impl ToneOutput for PwmTone {
    fn start_tone(&mut self, frequency_hz: u32) {
        if frequency_hz == 0 {
            self.stop_tone();
            return;
        }
        // Reprogramming the timer every cycle would restart the waveform
        if self.sounding_hz == Some(frequency_hz) {
            return;
        }
        self.pwm.set_frequency(Hertz(frequency_hz));
        let mut ch = self.pwm.ch3();
        ch.set_duty_cycle_fraction(1, 2);
        ch.enable();
        self.sounding_hz = Some(frequency_hz);
        debug!("Buzzer on at {} Hz", frequency_hz);
    }

    fn stop_tone(&mut self) {
        if self.sounding_hz.take().is_some() {
            self.pwm.ch3().disable();
            debug!("Buzzer off");
        }
    }
}
