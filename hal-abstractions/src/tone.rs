//! Alert actuator port

/// Port for a tone-capable output (piezo buzzer on a PWM pin)
///
/// Used as a binary alarm: either sounding at one frequency or silent.
/// Both calls must be idempotent; the control loop repeats them every cycle.
pub trait ToneOutput {
    /// Start (or keep) sounding a square wave at `frequency_hz`
    fn start_tone(&mut self, frequency_hz: u32);

    /// Silence the output
    fn stop_tone(&mut self);
}
