//! ConductorActor message protocol
//!
//! Defines the messages that can be sent to the ConductorActor and
//! the error types used throughout the conductor.

use ractor::{ActorRef, RpcReplyPort};
use shared_types::TableSnapshot;

use super::invariants::InvariantViolation;
use crate::actors::philosopher::PhilosopherMsg;

/// Messages handled by ConductorActor
#[derive(Debug)]
pub enum ConductorMsg {
    /// Install the table topology (seat index -> philosopher) and start ticking
    Go {
        seats: Vec<ActorRef<PhilosopherMsg>>,
        reply: RpcReplyPort<Result<(), ConductorError>>,
    },
    /// Run the next scheduler step. Sent by the conductor to itself.
    Advance,
    GrabLeftFork {
        index: usize,
    },
    GrabRightFork {
        index: usize,
    },
    /// Both forks of `index` are released
    DoneEating {
        index: usize,
    },
    GetSnapshot {
        reply: RpcReplyPort<TableSnapshot>,
    },
}

/// Errors that can occur in ConductorActor
#[derive(Debug, thiserror::Error, Clone)]
pub enum ConductorError {
    /// `Go` carried the wrong number of philosophers
    #[error("invalid topology: expected {expected} seats, got {actual}")]
    InvalidTopology { expected: usize, actual: usize },
    /// `Go` was sent twice
    #[error("table already started")]
    AlreadyStarted,
    /// A request arrived before `Go`
    #[error("table not started")]
    NotStarted,
    /// A request named a seat outside the table
    #[error("unknown seat: {0}")]
    UnknownSeat(usize),
    /// A philosopher did not answer a rendezvous or query
    #[error("philosopher {index} unavailable: {reason}")]
    SeatUnavailable { index: usize, reason: String },
    /// A linked philosopher failed or stopped during the run
    #[error("philosopher lost: {0}")]
    SeatLost(String),
    /// More forks released than were held
    #[error("fork ledger underflow: {busy_forks} busy forks, 2 released")]
    LedgerUnderflow { busy_forks: usize },
    /// A philosopher replied more than the conductor was owed
    #[error("drain ledger underflow: unexpected {message} from philosopher {index}")]
    UnexpectedRequest { index: usize, message: &'static str },
    /// Two adjacent philosophers hold the same fork
    #[error("invariant violated: {0}")]
    InvariantViolated(#[from] InvariantViolation),
}
