//! Simulation clock.
//!
//! The clock holds the current time-step index, the single piece of loop
//! state that survives from one step to the next. Every step-indexed
//! decision (disruptions starting now, flow capture, the stop condition)
//! reads it from here.

use disruptsc_types::TimeResolution;

/// Errors that can occur during clock operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClockError {
    /// Time-step counter would overflow.
    #[error("time step overflow: cannot advance beyond u32::MAX")]
    TimeStepOverflow,
}

/// Time-step counter with its real-world resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationClock {
    /// Current time step, 0 being the initial equilibrium.
    time_step: u32,
    /// Real-world duration of one step.
    resolution: TimeResolution,
}

impl SimulationClock {
    /// Create a clock at time step 0.
    pub const fn new(resolution: TimeResolution) -> Self {
        Self {
            time_step: 0,
            resolution,
        }
    }

    /// Advance by one time step. Returns the new time step.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TimeStepOverflow`] if the counter would exceed
    /// `u32::MAX`.
    pub fn advance(&mut self) -> Result<u32, ClockError> {
        self.time_step = self
            .time_step
            .checked_add(1)
            .ok_or(ClockError::TimeStepOverflow)?;
        Ok(self.time_step)
    }

    /// Go back to time step 0.
    pub const fn reset(&mut self) {
        self.time_step = 0;
    }

    /// Current time step.
    pub const fn time_step(&self) -> u32 {
        self.time_step
    }

    /// Real-world duration of one step.
    pub const fn resolution(&self) -> TimeResolution {
        self.resolution
    }

    /// Days represented by one step (a month counts 30 days, a year 365).
    pub const fn days_per_step(&self) -> u32 {
        match self.resolution {
            TimeResolution::Day => 1,
            TimeResolution::Week => 7,
            TimeResolution::Month => 30,
            TimeResolution::Year => 365,
        }
    }

    /// Days elapsed since the initial equilibrium, saturating at `u64::MAX`.
    pub fn elapsed_days(&self) -> u64 {
        u64::from(self.time_step).saturating_mul(u64::from(self.days_per_step()))
    }
}
