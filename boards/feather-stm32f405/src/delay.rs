#![deny(unsafe_code)]
#![deny(warnings)]
//! `embedded-hal-async` delay on top of the RTIC monotonic

use embedded_hal_async::delay::DelayNs;
use rtic_monotonics::stm32::prelude::*;

use crate::Mono;

/// Sleeps on TIM2 (1 MHz tick); sub-microsecond requests round up
#[derive(Clone, Copy, Default)]
pub struct MonoDelay;

impl DelayNs for MonoDelay {
    async fn delay_ns(&mut self, ns: u32) {
        Mono::delay(u64::from(ns.div_ceil(1_000)).micros()).await;
    }

    async fn delay_us(&mut self, us: u32) {
        Mono::delay(u64::from(us).micros()).await;
    }

    async fn delay_ms(&mut self, ms: u32) {
        Mono::delay(u64::from(ms).millis()).await;
    }
}
