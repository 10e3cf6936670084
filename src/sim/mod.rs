//! Schelling self-segregation simulation
//!
//! Implements the model economist Thomas Schelling created to help explain
//! residential self-segregation: agents of two colors on a grid relocate to
//! random vacant cells until enough of their neighbors look like them.

pub mod grid;

pub use grid::SimGrid;

use serde::{Deserialize, Serialize};

use crate::core::error::Result;

/// Configuration for the simulation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimConfig {
    pub rows: usize,
    pub cols: usize,
    pub seed: u64,
    /// An agent is satisfied when the fraction of occupied neighbors sharing
    /// its color strictly exceeds this value.
    pub satisfaction_threshold: f64,
    /// Each cell starts vacant with probability 1 in `vacancy_odds`.
    /// Must be at least 1; a value of 1 makes every cell vacant.
    pub vacancy_odds: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            rows: 30,
            cols: 30,
            seed: 12345,
            satisfaction_threshold: 0.3,
            vacancy_odds: 10,
        }
    }
}

/// Result of running a grid until it settles.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunOutcome {
    /// Rounds that relocated at least one agent.
    pub rounds: u32,
    /// Unsatisfied-agent count found by each of those rounds.
    pub unsatisfied_per_round: Vec<usize>,
    /// Stored satisfaction percentage after the final round.
    pub final_percent: f64,
    /// Whether a round found zero unsatisfied agents within `max_rounds`.
    pub settled: bool,
}

/// Steps `grid` until a round finds zero unsatisfied agents, or until
/// `max_rounds` rounds have relocated agents without settling.
///
/// Convergence is detected by the unsatisfied count reaching zero, not by
/// the stored percentage: on a grid with any vacancy the percentage tops out
/// below 100 because its denominator is the total cell count.
pub fn run(grid: &mut SimGrid, max_rounds: u32) -> Result<RunOutcome> {
    let mut unsatisfied_per_round = Vec::new();
    let mut settled = false;

    for _ in 0..max_rounds {
        let unsatisfied = grid.step()?;
        if unsatisfied == 0 {
            settled = true;
            break;
        }
        unsatisfied_per_round.push(unsatisfied);
    }

    Ok(RunOutcome {
        rounds: unsatisfied_per_round.len() as u32,
        unsatisfied_per_round,
        final_percent: grid.satisfied_percent(),
        settled,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_reference_shell() {
        let config = SimConfig::default();
        assert_eq!(config.rows, 30);
        assert_eq!(config.cols, 30);
        assert_eq!(config.vacancy_odds, 10);
        assert!((config.satisfaction_threshold - 0.3).abs() < f64::EPSILON);
    }
}
