//! ConductorActor bookkeeping
//!
//! `ForkLedger` holds the two counters the protocol revolves around
//! (`busy_forks` and `tick_count`) plus the drain count that decides when a
//! tick is quiescent. `TableStats` accumulates per-seat counters for the run
//! report.

use shared_types::{ForkSide, SeatStats};

use super::protocol::ConductorError;

/// Fork, tick and drain counters
#[derive(Debug, Clone)]
pub struct ForkLedger {
    busy_forks: usize,
    tick_count: u64,
    tick_limit: u64,
    /// Philosopher messages the conductor is still owed for the current tick
    pending: usize,
}

impl ForkLedger {
    pub fn new(tick_limit: u64) -> Self {
        Self {
            busy_forks: 0,
            tick_count: 0,
            tick_limit,
            pending: 0,
        }
    }

    pub fn busy_forks(&self) -> usize {
        self.busy_forks
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn tick_limit(&self) -> u64 {
        self.tick_limit
    }

    pub fn ticks_exhausted(&self) -> bool {
        self.tick_count >= self.tick_limit
    }

    /// One fork handed out.
    pub fn grant(&mut self) {
        self.busy_forks += 1;
    }

    /// Both forks of an eater returned.
    pub fn release_pair(&mut self) -> Result<(), ConductorError> {
        self.busy_forks = self
            .busy_forks
            .checked_sub(2)
            .ok_or(ConductorError::LedgerUnderflow {
                busy_forks: self.busy_forks,
            })?;
        Ok(())
    }

    /// A philosopher acknowledged a rendezvous having sent `emitted` messages.
    pub fn expect(&mut self, emitted: usize) {
        self.pending += emitted;
    }

    /// One owed message arrived.
    pub fn settle(&mut self, index: usize, message: &'static str) -> Result<(), ConductorError> {
        self.pending = self
            .pending
            .checked_sub(1)
            .ok_or(ConductorError::UnexpectedRequest { index, message })?;
        Ok(())
    }

    pub fn is_quiescent(&self) -> bool {
        self.pending == 0
    }

    /// Close the current tick.
    pub fn complete_tick(&mut self) {
        self.tick_count += 1;
    }
}

/// Per-seat counters for the run report
#[derive(Debug, Clone, Default)]
pub struct TableStats {
    seats: Vec<SeatStats>,
    max_busy_after_left_grant: usize,
}

impl TableStats {
    pub fn new(seats: usize) -> Self {
        Self {
            seats: vec![SeatStats::default(); seats],
            max_busy_after_left_grant: 0,
        }
    }

    pub fn record_tick(&mut self, index: usize) {
        if let Some(seat) = self.seats.get_mut(index) {
            seat.ticks += 1;
        }
    }

    pub fn record_decision(
        &mut self,
        index: usize,
        side: ForkSide,
        granted: bool,
        guarded: bool,
        busy_forks: usize,
    ) {
        let Some(seat) = self.seats.get_mut(index) else {
            return;
        };
        match (side, granted) {
            (ForkSide::Left, true) => {
                seat.left_grants += 1;
                self.max_busy_after_left_grant = self.max_busy_after_left_grant.max(busy_forks);
            }
            (ForkSide::Left, false) => {
                seat.left_denials += 1;
                if guarded {
                    seat.guard_denials += 1;
                }
            }
            (ForkSide::Right, true) => seat.right_grants += 1,
            (ForkSide::Right, false) => seat.right_denials += 1,
        }
    }

    pub fn record_meal(&mut self, index: usize) {
        if let Some(seat) = self.seats.get_mut(index) {
            seat.meals += 1;
        }
    }

    pub fn seats(&self) -> &[SeatStats] {
        &self.seats
    }

    pub fn max_busy_after_left_grant(&self) -> usize {
        self.max_busy_after_left_grant
    }
}
