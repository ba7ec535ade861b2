//! Philosopher message protocol
//!
//! Defines the messages a philosopher accepts, the errors it can raise and
//! the narrow port through which it talks back to the conductor.

use ractor::{ActorRef, RpcReplyPort};
use shared_types::{ForkSide, ForkState, PhilosopherPhase, PhilosopherSnapshot};

use super::state::SeatRequest;
use crate::actors::conductor::ConductorMsg;

/// Messages handled by PhilosopherActor
#[derive(Debug)]
pub enum PhilosopherMsg {
    /// Advance one time step; replies with the number of requests sent to
    /// the conductor as a consequence
    Tick { reply: RpcReplyPort<usize> },
    /// Conductor's answer to a fork request; replies like `Tick`
    ForkReply {
        side: ForkSide,
        granted: bool,
        reply: RpcReplyPort<usize>,
    },
    /// Which forks this philosopher believes it holds
    GetForkState { reply: RpcReplyPort<ForkState> },
    GetSnapshot {
        reply: RpcReplyPort<PhilosopherSnapshot>,
    },
}

/// Errors raised by PhilosopherActor
#[derive(Debug, thiserror::Error, Clone)]
pub enum PhilosopherError {
    /// A fork reply arrived that does not match the outstanding request
    #[error("philosopher {index} got an unexpected {side} fork reply while {phase:?}")]
    UnexpectedReply {
        index: usize,
        side: ForkSide,
        phase: PhilosopherPhase,
    },
    /// The conductor's mailbox is gone
    #[error("conductor unreachable from philosopher {index}: {reason}")]
    ConductorUnavailable { index: usize, reason: String },
}

/// Send-only handle a philosopher holds on the conductor.
///
/// Exposes the fork protocol and nothing else; philosophers cannot stop the
/// conductor through it.
#[derive(Debug, Clone)]
pub struct ConductorPort {
    conductor: ActorRef<ConductorMsg>,
}

impl ConductorPort {
    pub fn new(conductor: ActorRef<ConductorMsg>) -> Self {
        Self { conductor }
    }

    pub fn send(&self, index: usize, request: SeatRequest) -> Result<(), PhilosopherError> {
        let message = match request {
            SeatRequest::GrabLeftFork => ConductorMsg::GrabLeftFork { index },
            SeatRequest::GrabRightFork => ConductorMsg::GrabRightFork { index },
            SeatRequest::DoneEating => ConductorMsg::DoneEating { index },
        };
        self.conductor
            .send_message(message)
            .map_err(|e| PhilosopherError::ConductorUnavailable {
                index,
                reason: e.to_string(),
            })
    }
}
