//! Fork-grant arbitration policy
//!
//! The conductor asks the arbiter three questions: whether the livelock
//! guard blocks a left-fork request outright, and whether a neighbor's
//! reported fork state leaves the shared fork free for a left or right grab.

use shared_types::ForkState;

/// Grant rules applied by the conductor
pub trait ForkArbiter: Send + Sync + 'static {
    /// Deny a left-fork request without consulting the neighbor.
    fn livelock_guard(&self, busy_forks: usize, seats: usize) -> bool;

    /// Grant a left fork given the LEFT neighbor's fork state.
    fn grant_left(&self, left_neighbor: ForkState) -> bool;

    /// Grant a right fork given the RIGHT neighbor's fork state.
    fn grant_right(&self, right_neighbor: ForkState) -> bool;
}

/// Production policy for a round table.
///
/// Caps simultaneous fork possession at `seats - 1` for left grabs, so the
/// ring of "everyone holds one fork" can never close.
#[derive(Debug, Clone, Copy, Default)]
pub struct RingArbiter;

impl ForkArbiter for RingArbiter {
    fn livelock_guard(&self, busy_forks: usize, seats: usize) -> bool {
        busy_forks >= seats.saturating_sub(1)
    }

    fn grant_left(&self, left_neighbor: ForkState) -> bool {
        // The shared fork is the neighbor's right fork
        !left_neighbor.holds_right()
    }

    fn grant_right(&self, right_neighbor: ForkState) -> bool {
        // The shared fork is the neighbor's left fork
        !right_neighbor.holds_left()
    }
}
