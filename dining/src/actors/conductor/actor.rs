//! ConductorActor - tick scheduler and fork arbiter
//!
//! The ConductorActor is responsible for:
//! - Checking fork ownership invariants before every tick
//! - Ticking one philosopher, chosen uniformly at random, per round
//! - Granting or denying fork requests by querying neighbor fork state
//! - Draining every message a tick causes before starting the next one
//! - Tearing the whole table down on any exit path

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};
use ractor::{call, Actor, ActorProcessingErr, ActorRef, SupervisionEvent};
use shared_types::{
    left_of, right_of, ForkSide, ForkState, SimulationOutcome, SimulationReport, TableSnapshot,
};
use tokio::sync::oneshot;

use crate::actors::conductor::{
    arbiter::ForkArbiter,
    invariants,
    protocol::{ConductorError, ConductorMsg},
    state::{ForkLedger, TableStats},
};
use crate::actors::philosopher::PhilosopherMsg;
use crate::config::ConfigError;

const SEAT_STOP_TIMEOUT: Duration = Duration::from_secs(1);

/// ConductorActor - the single arbiter at the table
#[derive(Debug, Default)]
pub struct ConductorActor;

/// Arguments for spawning ConductorActor
pub struct ConductorArguments {
    pub run_id: String,
    /// Number of philosophers the `Go` topology must contain
    pub seats: usize,
    pub tick_limit: u64,
    /// Seed for the tick scheduler; `None` draws one from the OS
    pub seed: Option<u64>,
    pub arbiter: Arc<dyn ForkArbiter>,
    /// Receives the run report once, on whichever exit path comes first
    pub report_tx: Option<oneshot::Sender<SimulationReport>>,
}

/// Internal state for ConductorActor
pub struct ConductorState {
    run_id: String,
    seat_count: usize,
    /// Topology installed by `Go`; emptied on teardown
    seats: Vec<ActorRef<PhilosopherMsg>>,
    started: bool,
    /// Set once teardown begins, so philosopher exits are no longer fatal
    closing: bool,
    ledger: ForkLedger,
    stats: TableStats,
    last_fork_states: Option<Vec<ForkState>>,
    rng: StdRng,
    arbiter: Arc<dyn ForkArbiter>,
    report_tx: Option<oneshot::Sender<SimulationReport>>,
    started_at: DateTime<Utc>,
}

#[async_trait]
impl Actor for ConductorActor {
    type Msg = ConductorMsg;
    type State = ConductorState;
    type Arguments = ConductorArguments;

    async fn pre_start(
        &self,
        myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        tracing::info!(
            actor_id = %myself.get_id(),
            run_id = %args.run_id,
            seats = args.seats,
            tick_limit = args.tick_limit,
            seed = ?args.seed,
            "ConductorActor starting"
        );

        if args.seats < 2 {
            return Err(ConfigError::TooFewSeats(args.seats).into());
        }

        let rng = match args.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Ok(ConductorState {
            run_id: args.run_id,
            seat_count: args.seats,
            seats: Vec::new(),
            started: false,
            closing: false,
            ledger: ForkLedger::new(args.tick_limit),
            stats: TableStats::new(args.seats),
            last_fork_states: None,
            rng,
            arbiter: args.arbiter,
            report_tx: args.report_tx,
            started_at: Utc::now(),
        })
    }

    async fn handle(
        &self,
        myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        let result = match message {
            ConductorMsg::Go { seats, reply } => {
                let result = self.handle_go(&myself, state, seats);
                let _ = reply.send(result);
                Ok(())
            }
            ConductorMsg::Advance => self.handle_advance(&myself, state).await,
            ConductorMsg::GrabLeftFork { index } => {
                self.handle_fork_request(&myself, state, index, ForkSide::Left)
                    .await
            }
            ConductorMsg::GrabRightFork { index } => {
                self.handle_fork_request(&myself, state, index, ForkSide::Right)
                    .await
            }
            ConductorMsg::DoneEating { index } => self.handle_done_eating(&myself, state, index),
            ConductorMsg::GetSnapshot { reply } => {
                let _ = reply.send(snapshot(state));
                Ok(())
            }
        };

        if let Err(err) = result {
            self.abort(state, &err).await;
            return Err(err.into());
        }
        Ok(())
    }

    async fn handle_supervisor_evt(
        &self,
        myself: ActorRef<Self::Msg>,
        event: SupervisionEvent,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        let lost = match &event {
            SupervisionEvent::ActorFailed(actor_cell, failure) => {
                Some(format!("actor_id={} error={failure}", actor_cell.get_id()))
            }
            SupervisionEvent::ActorTerminated(actor_cell, _, reason) => Some(format!(
                "actor_id={} reason={}",
                actor_cell.get_id(),
                reason.as_deref().unwrap_or("none")
            )),
            _ => None,
        };

        match lost {
            Some(detail) if !state.closing => {
                let err = ConductorError::SeatLost(detail);
                self.abort(state, &err).await;
                Err(err.into())
            }
            _ => {
                tracing::debug!(
                    conductor = %myself.get_id(),
                    event = ?event,
                    "ConductorActor supervision event"
                );
                Ok(())
            }
        }
    }

    async fn post_stop(
        &self,
        myself: ActorRef<Self::Msg>,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        self.teardown(state, "conductor stopped").await;
        // Philosophers linked before `Go` installed the topology
        for child in myself.get_children() {
            child.stop(Some("conductor stopped".to_string()));
        }
        // Only an external `die` reaches here with the report still unsent
        self.publish_report(state, SimulationOutcome::Shutdown);
        tracing::info!(
            actor_id = %myself.get_id(),
            run_id = %state.run_id,
            ticks = state.ledger.tick_count(),
            "ConductorActor stopped"
        );
        Ok(())
    }
}

impl ConductorActor {
    fn handle_go(
        &self,
        myself: &ActorRef<ConductorMsg>,
        state: &mut ConductorState,
        seats: Vec<ActorRef<PhilosopherMsg>>,
    ) -> Result<(), ConductorError> {
        if state.started {
            tracing::warn!(run_id = %state.run_id, "Ignoring duplicate go");
            return Err(ConductorError::AlreadyStarted);
        }
        if seats.len() != state.seat_count {
            return Err(ConductorError::InvalidTopology {
                expected: state.seat_count,
                actual: seats.len(),
            });
        }

        state.seats = seats;
        state.started = true;
        state.started_at = Utc::now();
        tracing::info!(run_id = %state.run_id, seats = state.seat_count, "Table started");

        let _ = myself.send_message(ConductorMsg::Advance);
        Ok(())
    }

    /// One scheduler round: check, tick, then wait for the drain to settle.
    async fn handle_advance(
        &self,
        myself: &ActorRef<ConductorMsg>,
        state: &mut ConductorState,
    ) -> Result<(), ConductorError> {
        if !state.started || state.closing || !state.ledger.is_quiescent() {
            tracing::warn!(run_id = %state.run_id, "Ignoring advance outside a quiescent run");
            return Ok(());
        }

        if state.ledger.ticks_exhausted() {
            return self.finish(myself, state).await;
        }

        let fork_states = self.collect_fork_states(state).await?;
        invariants::check_ring(&fork_states)?;

        let index = state.rng.random_range(0..state.seats.len());
        state.stats.record_tick(index);
        tracing::trace!(tick = state.ledger.tick_count(), index, "Tick");

        let seat = self.seat(state, index)?;
        let emitted = call!(seat, |reply| PhilosopherMsg::Tick { reply })
            .map_err(|e| seat_unavailable(index, e))?;
        state.ledger.expect(emitted);

        self.close_tick_if_quiescent(myself, state);
        Ok(())
    }

    async fn handle_fork_request(
        &self,
        myself: &ActorRef<ConductorMsg>,
        state: &mut ConductorState,
        index: usize,
        side: ForkSide,
    ) -> Result<(), ConductorError> {
        let seat = self.seat(state, index)?;
        let message = match side {
            ForkSide::Left => "grab_left_fork",
            ForkSide::Right => "grab_right_fork",
        };
        state.ledger.settle(index, message)?;

        let seats = state.seats.len();
        let (granted, guarded) = match side {
            ForkSide::Left => {
                if state
                    .arbiter
                    .livelock_guard(state.ledger.busy_forks(), seats)
                {
                    (false, true)
                } else {
                    let neighbor = self.query_fork_state(state, left_of(index, seats)).await?;
                    (state.arbiter.grant_left(neighbor), false)
                }
            }
            ForkSide::Right => {
                let neighbor = self.query_fork_state(state, right_of(index, seats)).await?;
                (state.arbiter.grant_right(neighbor), false)
            }
        };

        if granted {
            state.ledger.grant();
        }
        state.stats.record_decision(
            index,
            side,
            granted,
            guarded,
            state.ledger.busy_forks(),
        );
        tracing::debug!(
            index,
            %side,
            granted,
            guarded,
            busy_forks = state.ledger.busy_forks(),
            "Fork decision"
        );

        let emitted = call!(seat, |reply| PhilosopherMsg::ForkReply {
            side,
            granted,
            reply,
        })
        .map_err(|e| seat_unavailable(index, e))?;
        state.ledger.expect(emitted);

        self.close_tick_if_quiescent(myself, state);
        Ok(())
    }

    fn handle_done_eating(
        &self,
        myself: &ActorRef<ConductorMsg>,
        state: &mut ConductorState,
        index: usize,
    ) -> Result<(), ConductorError> {
        self.seat(state, index)?;
        state.ledger.settle(index, "done_eating")?;
        state.ledger.release_pair()?;
        state.stats.record_meal(index);
        tracing::debug!(
            index,
            busy_forks = state.ledger.busy_forks(),
            "Philosopher done eating"
        );

        self.close_tick_if_quiescent(myself, state);
        Ok(())
    }

    /// Tick limit reached: capture the final table, release everyone, stop.
    async fn finish(
        &self,
        myself: &ActorRef<ConductorMsg>,
        state: &mut ConductorState,
    ) -> Result<(), ConductorError> {
        self.collect_fork_states(state).await?;
        tracing::info!(
            run_id = %state.run_id,
            ticks = state.ledger.tick_count(),
            busy_forks = state.ledger.busy_forks(),
            "Tick limit reached"
        );
        self.teardown(state, "tick limit reached").await;
        self.publish_report(state, SimulationOutcome::Completed);
        myself.stop(Some("tick limit reached".to_string()));
        Ok(())
    }

    /// Fatal exit: stop every philosopher and publish the failure.
    async fn abort(&self, state: &mut ConductorState, err: &ConductorError) {
        tracing::error!(
            run_id = %state.run_id,
            tick = state.ledger.tick_count(),
            error = %err,
            "Conductor aborting"
        );
        let outcome = match err {
            ConductorError::InvariantViolated(violation) => SimulationOutcome::InvariantViolated {
                detail: violation.to_string(),
            },
            other => SimulationOutcome::Failed {
                reason: other.to_string(),
            },
        };
        self.teardown(state, "conductor aborted").await;
        self.publish_report(state, outcome);
    }

    async fn teardown(&self, state: &mut ConductorState, reason: &str) {
        state.closing = true;
        for seat in std::mem::take(&mut state.seats) {
            if let Err(e) = seat
                .stop_and_wait(Some(reason.to_string()), Some(SEAT_STOP_TIMEOUT))
                .await
            {
                tracing::warn!(actor_id = %seat.get_id(), error = %e, "Philosopher did not stop cleanly");
            }
        }
    }

    fn publish_report(&self, state: &mut ConductorState, outcome: SimulationOutcome) {
        let Some(report_tx) = state.report_tx.take() else {
            return;
        };
        let report = SimulationReport {
            run_id: state.run_id.clone(),
            seats: state.seat_count,
            tick_limit: state.ledger.tick_limit(),
            ticks_completed: state.ledger.tick_count(),
            busy_forks: state.ledger.busy_forks(),
            outcome,
            seat_stats: state.stats.seats().to_vec(),
            max_busy_after_left_grant: state.stats.max_busy_after_left_grant(),
            final_fork_states: state.last_fork_states.clone(),
            started_at: state.started_at,
            finished_at: Utc::now(),
        };
        if report_tx.send(report).is_err() {
            tracing::debug!(run_id = %state.run_id, "Run report receiver dropped");
        }
    }

    fn close_tick_if_quiescent(&self, myself: &ActorRef<ConductorMsg>, state: &mut ConductorState) {
        if state.ledger.is_quiescent() {
            state.ledger.complete_tick();
            let _ = myself.send_message(ConductorMsg::Advance);
        }
    }

    /// Query every philosopher in index order.
    async fn collect_fork_states(
        &self,
        state: &mut ConductorState,
    ) -> Result<Vec<ForkState>, ConductorError> {
        let mut fork_states = Vec::with_capacity(state.seats.len());
        for index in 0..state.seats.len() {
            fork_states.push(self.query_fork_state(state, index).await?);
        }
        state.last_fork_states = Some(fork_states.clone());
        Ok(fork_states)
    }

    async fn query_fork_state(
        &self,
        state: &ConductorState,
        index: usize,
    ) -> Result<ForkState, ConductorError> {
        let seat = self.seat(state, index)?;
        call!(seat, |reply| PhilosopherMsg::GetForkState { reply })
            .map_err(|e| seat_unavailable(index, e))
    }

    fn seat(
        &self,
        state: &ConductorState,
        index: usize,
    ) -> Result<ActorRef<PhilosopherMsg>, ConductorError> {
        if !state.started {
            return Err(ConductorError::NotStarted);
        }
        state
            .seats
            .get(index)
            .cloned()
            .ok_or(ConductorError::UnknownSeat(index))
    }
}

fn snapshot(state: &ConductorState) -> TableSnapshot {
    TableSnapshot {
        run_id: state.run_id.clone(),
        started: state.started,
        seats: state.seat_count,
        tick_count: state.ledger.tick_count(),
        tick_limit: state.ledger.tick_limit(),
        busy_forks: state.ledger.busy_forks(),
    }
}

fn seat_unavailable(index: usize, err: impl std::fmt::Display) -> ConductorError {
    ConductorError::SeatUnavailable {
        index,
        reason: err.to_string(),
    }
}
