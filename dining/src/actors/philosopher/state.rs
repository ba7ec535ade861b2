//! Philosopher seat state machine
//!
//! Pure transition logic, kept apart from the actor shell so the
//! Thinking -> Hungry -> HungryLeftFork -> Eating cycle can be exercised
//! without a runtime.

use shared_types::{ForkSide, ForkState, PhilosopherPhase};

use super::protocol::PhilosopherError;

/// Request a seat emits towards the conductor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatRequest {
    GrabLeftFork,
    GrabRightFork,
    DoneEating,
}

/// State of one seat at the table
#[derive(Debug, Clone)]
pub struct SeatState {
    index: usize,
    phase: PhilosopherPhase,
    /// Side of the fork request still waiting for a conductor reply
    awaiting: Option<ForkSide>,
    meals: u64,
}

impl SeatState {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            phase: PhilosopherPhase::Thinking,
            awaiting: None,
            meals: 0,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn phase(&self) -> PhilosopherPhase {
        self.phase
    }

    pub fn meals(&self) -> u64 {
        self.meals
    }

    pub fn awaiting(&self) -> Option<ForkSide> {
        self.awaiting
    }

    pub fn fork_state(&self) -> ForkState {
        self.phase.fork_state()
    }

    /// Advance one simulated time step.
    ///
    /// A tick that arrives while a request is still outstanding is absorbed:
    /// the seat keeps waiting for the reply.
    pub fn on_tick(&mut self) -> Option<SeatRequest> {
        if self.awaiting.is_some() {
            return None;
        }
        match self.phase {
            PhilosopherPhase::Thinking => {
                self.phase = PhilosopherPhase::Hungry;
                self.awaiting = Some(ForkSide::Left);
                Some(SeatRequest::GrabLeftFork)
            }
            PhilosopherPhase::Hungry => {
                self.awaiting = Some(ForkSide::Left);
                Some(SeatRequest::GrabLeftFork)
            }
            PhilosopherPhase::HungryLeftFork => {
                self.awaiting = Some(ForkSide::Right);
                Some(SeatRequest::GrabRightFork)
            }
            PhilosopherPhase::Eating => {
                self.phase = PhilosopherPhase::Thinking;
                self.meals += 1;
                Some(SeatRequest::DoneEating)
            }
        }
    }

    /// Apply the conductor's answer to the outstanding request.
    pub fn on_fork_reply(
        &mut self,
        side: ForkSide,
        granted: bool,
    ) -> Result<Option<SeatRequest>, PhilosopherError> {
        if self.awaiting != Some(side) {
            return Err(PhilosopherError::UnexpectedReply {
                index: self.index,
                side,
                phase: self.phase,
            });
        }
        self.awaiting = None;

        if !granted {
            return Ok(None);
        }
        match side {
            ForkSide::Left => {
                self.phase = PhilosopherPhase::HungryLeftFork;
                self.awaiting = Some(ForkSide::Right);
                Ok(Some(SeatRequest::GrabRightFork))
            }
            ForkSide::Right => {
                self.phase = PhilosopherPhase::Eating;
                Ok(None)
            }
        }
    }
}
