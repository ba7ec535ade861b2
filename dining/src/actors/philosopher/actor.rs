//! PhilosopherActor - one seat at the table
//!
//! The actor is a thin shell around `SeatState`: ticks and fork replies
//! drive the state machine, and every request the machine emits is sent to
//! the conductor before the rendezvous is acknowledged. Fork-state queries
//! are ordinary messages, so they are answered in every phase without
//! waiting on a transition.

use async_trait::async_trait;
use ractor::{Actor, ActorProcessingErr, ActorRef};
use shared_types::PhilosopherSnapshot;

use super::protocol::{ConductorPort, PhilosopherError, PhilosopherMsg};
use super::state::{SeatRequest, SeatState};

#[derive(Debug, Default)]
pub struct PhilosopherActor;

/// Arguments for spawning PhilosopherActor
#[derive(Debug, Clone)]
pub struct PhilosopherArguments {
    pub index: usize,
    pub conductor: ConductorPort,
}

pub struct PhilosopherState {
    seat: SeatState,
    conductor: ConductorPort,
}

#[async_trait]
impl Actor for PhilosopherActor {
    type Msg = PhilosopherMsg;
    type State = PhilosopherState;
    type Arguments = PhilosopherArguments;

    async fn pre_start(
        &self,
        myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        tracing::debug!(actor_id = %myself.get_id(), index = args.index, "PhilosopherActor starting");
        Ok(PhilosopherState {
            seat: SeatState::new(args.index),
            conductor: args.conductor,
        })
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            PhilosopherMsg::Tick { reply } => {
                let before = state.seat.phase();
                let request = state.seat.on_tick();
                trace_transition(&state.seat, before, request);
                let emitted = emit(state, request)?;
                let _ = reply.send(emitted);
            }
            PhilosopherMsg::ForkReply {
                side,
                granted,
                reply,
            } => {
                let before = state.seat.phase();
                let request = state.seat.on_fork_reply(side, granted)?;
                trace_transition(&state.seat, before, request);
                let emitted = emit(state, request)?;
                let _ = reply.send(emitted);
            }
            PhilosopherMsg::GetForkState { reply } => {
                let _ = reply.send(state.seat.fork_state());
            }
            PhilosopherMsg::GetSnapshot { reply } => {
                let _ = reply.send(PhilosopherSnapshot {
                    index: state.seat.index(),
                    phase: state.seat.phase(),
                    fork_state: state.seat.fork_state(),
                    meals: state.seat.meals(),
                });
            }
        }
        Ok(())
    }

    async fn post_stop(
        &self,
        myself: ActorRef<Self::Msg>,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        tracing::debug!(
            actor_id = %myself.get_id(),
            index = state.seat.index(),
            meals = state.seat.meals(),
            "PhilosopherActor stopped"
        );
        Ok(())
    }
}

fn emit(state: &PhilosopherState, request: Option<SeatRequest>) -> Result<usize, PhilosopherError> {
    match request {
        Some(request) => {
            state.conductor.send(state.seat.index(), request)?;
            Ok(1)
        }
        None => Ok(0),
    }
}

fn trace_transition(
    seat: &SeatState,
    before: shared_types::PhilosopherPhase,
    request: Option<SeatRequest>,
) {
    if before != seat.phase() || request.is_some() {
        tracing::debug!(
            index = seat.index(),
            from = ?before,
            to = ?seat.phase(),
            request = ?request,
            "Philosopher transition"
        );
    }
}
