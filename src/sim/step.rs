//! Fixed-step driver
//!
//! Hosts render at whatever rate they get; the sim only ever sees `SIM_DT`.
//! Leftover frame time carries over to the next frame.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

#[derive(Debug, Clone)]
pub struct FixedStep {
    accumulator: f32,
    step: f32,
    max_substeps: u32,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }
}

impl FixedStep {
    pub fn new(step: f32, max_substeps: u32) -> Self {
        Self {
            accumulator: 0.0,
            step,
            max_substeps,
        }
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Add a frame's elapsed time and return how many ticks to run
    ///
    /// Long stalls are clamped so a hitch never turns into a burst of ticks.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= self.step && substeps < self.max_substeps {
            self.accumulator -= self.step;
            substeps += 1;
        }
        substeps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_partial_frames() {
        let mut stepper = FixedStep::new(0.01, 8);
        assert_eq!(stepper.advance(0.004), 0);
        assert_eq!(stepper.advance(0.004), 0);
        assert_eq!(stepper.advance(0.004), 1);
        assert_eq!(stepper.advance(0.009), 1);
    }

    #[test]
    fn test_substeps_capped() {
        let mut stepper = FixedStep::new(0.001, 8);
        assert_eq!(stepper.advance(0.05), 8);
    }

    #[test]
    fn test_long_stall_clamped() {
        let mut stepper = FixedStep::new(0.01, 1000);
        let ticks = stepper.advance(5.0);
        assert!(ticks <= 10);
    }
}
