//! Simulation runs.
//!
//! [`run_static`] executes the initial time step only. [`run_disruption`]
//! executes the initial step, then steps `1..=t_final`, where `t_final`
//! follows from the longest disruption. Once every disruption has started,
//! a run stops early when the agents are back to equilibrium.

use chrono::{DateTime, Utc};
use disruptsc_types::RunId;
use serde::Serialize;
use tracing::info;

use crate::agents::EconomicAgents;
use crate::clock::ClockError;
use crate::config::SimulationSettings;
use crate::disruption::DisruptionList;
use crate::step::{self, SimulationState, StepError, StepSummary};

/// Errors that can occur during a simulation run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A disruption run was requested without any disruption event.
    #[error("no disruption to simulate")]
    NoDisruption,

    /// No horizon is configured for the longest disruption duration.
    #[error("no simulation duration configured for a disruption of {duration} time steps")]
    UnknownHorizon {
        /// The longest disruption duration.
        duration: u32,
    },

    /// A time step failed.
    #[error("step error: {source}")]
    Step {
        /// The underlying step error.
        #[from]
        source: StepError,
    },

    /// The clock could not advance.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// Only the initial time step was run.
    StaticRun,
    /// The horizon derived from the longest disruption was reached.
    MaxDurationReached,
    /// Every equilibrium indicator fell below the stop epsilon.
    BackToEquilibrium,
}

/// Result of a simulation run.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationResult {
    /// Identifier of the run.
    pub run_id: RunId,
    /// Wall-clock start of the run.
    pub started_at: DateTime<Utc>,
    /// Wall-clock end of the run.
    pub finished_at: DateTime<Utc>,
    /// The reason the run ended.
    pub end_reason: EndReason,
    /// Number of time steps executed, the initial one included.
    pub steps: u32,
    /// Summary of every executed step.
    pub summaries: Vec<StepSummary>,
}

impl SimulationResult {
    /// The last step summary, if any step completed.
    pub fn final_summary(&self) -> Option<&StepSummary> {
        self.summaries.last()
    }
}

/// Callback invoked after each time step completes.
pub trait StepObserver {
    /// Called after a step completes successfully.
    fn on_step(&mut self, summary: &StepSummary, state: &SimulationState);
}

/// A no-op step observer.
pub struct NoOpObserver;

impl StepObserver for NoOpObserver {
    fn on_step(&mut self, _summary: &StepSummary, _state: &SimulationState) {}
}

/// Last time step of a disruption run.
///
/// An explicit `max_duration` wins; otherwise the longest disruption
/// duration is looked up in `duration_dic`.
///
/// # Errors
///
/// Returns [`RunnerError::NoDisruption`] for an empty list and
/// [`RunnerError::UnknownHorizon`] when the duration has no entry.
pub fn simulation_horizon(
    settings: &SimulationSettings,
    disruptions: &DisruptionList,
) -> Result<u32, RunnerError> {
    let duration = disruptions.max_duration().ok_or(RunnerError::NoDisruption)?;
    if let Some(max_duration) = settings.max_duration {
        return Ok(max_duration);
    }
    settings
        .duration_dic
        .get(&duration)
        .copied()
        .ok_or(RunnerError::UnknownHorizon { duration })
}

/// Run the initial time step only.
///
/// # Errors
///
/// Returns [`RunnerError::Step`] if the step fails.
pub fn run_static(
    state: &mut SimulationState,
    agents: &mut dyn EconomicAgents,
    observer: &mut dyn StepObserver,
) -> Result<SimulationResult, RunnerError> {
    let run_id = RunId::new();
    let started_at = Utc::now();
    info!(%run_id, "Static simulation starting");

    state.clock.reset();
    let summary = step::run_time_step(state, agents)?;
    observer.on_step(&summary, state);

    Ok(SimulationResult {
        run_id,
        started_at,
        finished_at: Utc::now(),
        end_reason: EndReason::StaticRun,
        steps: 1,
        summaries: vec![summary],
    })
}

/// Run the initial time step, then the disrupted steps until the horizon
/// or until the agents are back to equilibrium.
///
/// The equilibrium check only runs when `epsilon_stop_condition` is set,
/// and only for time steps strictly after the latest disruption start.
///
/// # Errors
///
/// Returns [`RunnerError::NoDisruption`] or [`RunnerError::UnknownHorizon`]
/// before any step runs, and [`RunnerError::Step`] or
/// [`RunnerError::Clock`] if a step fails.
pub fn run_disruption(
    state: &mut SimulationState,
    agents: &mut dyn EconomicAgents,
    observer: &mut dyn StepObserver,
) -> Result<SimulationResult, RunnerError> {
    let t_final = simulation_horizon(&state.config.simulation, &state.disruptions)?;
    let latest_start = state.disruptions.latest_start_time().unwrap_or_default();
    let epsilon = state.config.simulation.epsilon_stop_condition;
    let run_id = RunId::new();
    let started_at = Utc::now();
    info!(%run_id, t_final, latest_start, ?epsilon, "Disruption simulation starting");
    state.disruptions.log_info();

    state.clock.reset();
    let mut summaries = Vec::new();
    let initial = step::run_time_step(state, agents)?;
    observer.on_step(&initial, state);
    summaries.push(initial);

    let mut end_reason = EndReason::MaxDurationReached;
    for _ in 1..=t_final {
        let time_step = state.clock.advance()?;
        let summary = step::run_time_step(state, agents)?;
        observer.on_step(&summary, state);
        let back_to_equilibrium = time_step > latest_start
            && epsilon.is_some_and(|eps| summary.indicators.is_back_to_equilibrium(eps));
        summaries.push(summary);
        if back_to_equilibrium {
            info!(time_step, "Economy is back to equilibrium");
            end_reason = EndReason::BackToEquilibrium;
            break;
        }
    }

    let steps = u32::try_from(summaries.len()).unwrap_or(u32::MAX);
    Ok(SimulationResult {
        run_id,
        started_at,
        finished_at: Utc::now(),
        end_reason,
        steps,
        summaries,
    })
}

/// Log the end of a run.
pub fn log_simulation_end(result: &SimulationResult) {
    let elapsed_ms = result
        .finished_at
        .signed_duration_since(result.started_at)
        .num_milliseconds();
    info!(
        run_id = %result.run_id,
        reason = ?result.end_reason,
        steps = result.steps,
        final_time_step = result.final_summary().map(|s| s.time_step),
        elapsed_ms,
        "Simulation ended"
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use disruptsc_types::EdgeId;

    use super::*;
    use crate::disruption::{Disruption, TransportDisruption};

    fn transport(start_time: u32, duration: u32) -> Disruption {
        Disruption::Transport(TransportDisruption {
            nodes: Vec::new(),
            edges: vec![EdgeId::new(1)],
            start_time,
            duration,
        })
    }

    #[test]
    fn horizon_follows_longest_duration() {
        let settings = SimulationSettings::default();
        let list = DisruptionList::new(vec![transport(1, 1), transport(2, 3)]);
        assert_eq!(simulation_horizon(&settings, &list).unwrap(), 11);

        let short = DisruptionList::new(vec![transport(1, 2)]);
        assert_eq!(simulation_horizon(&settings, &short).unwrap(), 8);
    }

    #[test]
    fn horizon_override_and_failures() {
        let mut settings = SimulationSettings {
            max_duration: Some(6),
            ..SimulationSettings::default()
        };
        let list = DisruptionList::new(vec![transport(1, 9)]);
        assert_eq!(simulation_horizon(&settings, &list).unwrap(), 6);

        settings.max_duration = None;
        assert!(matches!(
            simulation_horizon(&settings, &list),
            Err(RunnerError::UnknownHorizon { duration: 9 })
        ));
        settings.duration_dic = BTreeMap::from([(9, 20)]);
        assert_eq!(simulation_horizon(&settings, &list).unwrap(), 20);

        assert!(matches!(
            simulation_horizon(&settings, &DisruptionList::default()),
            Err(RunnerError::NoDisruption)
        ));
    }
}
