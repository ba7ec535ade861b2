//! Shared types for the dining table
//!
//! These types are used by:
//! - Conductor and philosopher actors (message payloads, snapshots)
//! - The `dining` binary (JSON run report)
//!
//! Serializable with serde so a finished run can be printed or archived.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Forks
// ============================================================================

/// Which of its two adjacent forks a philosopher believes it holds.
///
/// This is the only externally observable philosopher state. It is queried,
/// never pushed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ForkState {
    NoFork,
    LeftFork,
    BothForks,
}

impl ForkState {
    /// Number of physical forks this belief accounts for.
    pub fn held(self) -> usize {
        match self {
            ForkState::NoFork => 0,
            ForkState::LeftFork => 1,
            ForkState::BothForks => 2,
        }
    }

    /// Whether the fork shared with the right-hand neighbor is held.
    pub fn holds_right(self) -> bool {
        matches!(self, ForkState::BothForks)
    }

    /// Whether the fork shared with the left-hand neighbor is held.
    pub fn holds_left(self) -> bool {
        !matches!(self, ForkState::NoFork)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ForkState::NoFork => "no_fork",
            ForkState::LeftFork => "left_fork",
            ForkState::BothForks => "both_forks",
        }
    }
}

impl fmt::Display for ForkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Side of a fork request, relative to the requesting philosopher.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ForkSide {
    Left,
    Right,
}

impl fmt::Display for ForkSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForkSide::Left => f.write_str("left"),
            ForkSide::Right => f.write_str("right"),
        }
    }
}

// ============================================================================
// Seats
// ============================================================================

/// Philosopher lifecycle phase
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum PhilosopherPhase {
    #[default]
    Thinking,
    Hungry,
    HungryLeftFork,
    Eating,
}

impl PhilosopherPhase {
    /// Fork belief implied by the phase.
    pub fn fork_state(self) -> ForkState {
        match self {
            PhilosopherPhase::Thinking | PhilosopherPhase::Hungry => ForkState::NoFork,
            PhilosopherPhase::HungryLeftFork => ForkState::LeftFork,
            PhilosopherPhase::Eating => ForkState::BothForks,
        }
    }
}

/// Index of the left-hand neighbor of `index` at a table of `seats`.
pub fn left_of(index: usize, seats: usize) -> usize {
    (index + seats - 1) % seats
}

/// Index of the right-hand neighbor of `index` at a table of `seats`.
pub fn right_of(index: usize, seats: usize) -> usize {
    (index + 1) % seats
}

/// Point-in-time view of one philosopher
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhilosopherSnapshot {
    pub index: usize,
    pub phase: PhilosopherPhase,
    pub fork_state: ForkState,
    /// Completed thinking -> eating -> thinking cycles
    pub meals: u64,
}

/// Per-seat counters kept by the conductor
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeatStats {
    pub ticks: u64,
    pub left_grants: u64,
    pub left_denials: u64,
    /// Left denials caused by the livelock guard rather than the neighbor
    pub guard_denials: u64,
    pub right_grants: u64,
    pub right_denials: u64,
    pub meals: u64,
}

// ============================================================================
// Conductor
// ============================================================================

/// Point-in-time view of the conductor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableSnapshot {
    pub run_id: String,
    pub started: bool,
    pub seats: usize,
    pub tick_count: u64,
    pub tick_limit: u64,
    pub busy_forks: usize,
}

/// How a run ended
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SimulationOutcome {
    /// Tick limit reached
    Completed,
    /// Explicit `die` request
    Shutdown,
    /// Two adjacent philosophers believed they held the same fork
    InvariantViolated { detail: String },
    /// Any other fatal conductor error
    Failed { reason: String },
}

impl SimulationOutcome {
    /// Completed and shutdown runs are not errors.
    pub fn is_clean(&self) -> bool {
        matches!(
            self,
            SimulationOutcome::Completed | SimulationOutcome::Shutdown
        )
    }
}

/// Summary published by the conductor when it terminates
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationReport {
    /// Unique run ID (ULID)
    pub run_id: String,
    pub seats: usize,
    pub tick_limit: u64,
    pub ticks_completed: u64,
    pub busy_forks: usize,
    pub outcome: SimulationOutcome,
    pub seat_stats: Vec<SeatStats>,
    /// Highest `busy_forks` observed immediately after a left-fork grant
    pub max_busy_after_left_grant: usize,
    /// Fork states captured at the final quiescent point, if any
    pub final_fork_states: Option<Vec<ForkState>>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SimulationReport {
    pub fn new_run_id() -> String {
        ulid::Ulid::new().to_string()
    }

    pub fn total_meals(&self) -> u64 {
        self.seat_stats.iter().map(|s| s.meals).sum()
    }

    /// Whether every seat completed at least one meal.
    pub fn everyone_ate(&self) -> bool {
        !self.seat_stats.is_empty() && self.seat_stats.iter().all(|s| s.meals > 0)
    }
}
