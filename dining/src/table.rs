//! Table bootstrap
//!
//! Creates the conductor, seats N philosophers linked to it, and hands the
//! conductor the seat topology with `Go`. The conductor is the supervisor of
//! every philosopher: when it exits for any reason the philosophers exit
//! with it.

use std::sync::Arc;

use ractor::concurrency::JoinHandle;
use ractor::{call, Actor, ActorRef};
use shared_types::SimulationReport;
use tokio::sync::oneshot;
use tracing::{error, info};

use crate::actors::conductor::{
    ConductorActor, ConductorArguments, ConductorError, ConductorMsg, ForkArbiter, RingArbiter,
};
use crate::actors::philosopher::{
    ConductorPort, PhilosopherActor, PhilosopherArguments, PhilosopherMsg,
};
use crate::config::{ConfigError, SimulationConfig};

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to spawn {name}: {reason}")]
    Spawn { name: String, reason: String },
    #[error("conductor rejected go: {0}")]
    Go(#[from] ConductorError),
    #[error("conductor unreachable: {0}")]
    ConductorUnavailable(String),
    #[error("conductor exited without a run report")]
    ReportLost,
}

/// Registered name of the conductor for a run.
pub fn conductor_name(run_id: &str) -> String {
    format!("conductor:{run_id}")
}

/// Registered name of philosopher `index` for a run.
pub fn philosopher_name(index: usize, run_id: &str) -> String {
    format!("philo{index}:{run_id}")
}

/// A seated table, ready to start
pub struct TableHandle {
    run_id: String,
    pub conductor: ActorRef<ConductorMsg>,
    pub seats: Vec<ActorRef<PhilosopherMsg>>,
    report_rx: oneshot::Receiver<SimulationReport>,
    conductor_handle: JoinHandle<()>,
}

impl TableHandle {
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Issue `go`: install the topology and begin ticking.
    pub async fn start(&self) -> Result<(), TableError> {
        let seats = self.seats.clone();
        call!(self.conductor, |reply| ConductorMsg::Go { seats, reply })
            .map_err(|e| TableError::ConductorUnavailable(e.to_string()))??;
        Ok(())
    }

    /// Send `die` to the conductor.
    pub fn shutdown(&self) {
        shutdown(&self.conductor);
    }

    /// Wait for the conductor to exit and return its report.
    pub async fn wait(self) -> Result<SimulationReport, TableError> {
        let report = self.report_rx.await.map_err(|_| TableError::ReportLost)?;
        if let Err(e) = self.conductor_handle.await {
            error!(run_id = %self.run_id, error = %e, "Conductor task did not join cleanly");
        }
        Ok(report)
    }
}

/// Request shutdown of a running table.
///
/// Uses the actor stop signal, which the runtime services ahead of queued
/// messages, so it supersedes the tick loop.
pub fn shutdown(conductor: &ActorRef<ConductorMsg>) {
    info!(conductor = %conductor.get_id(), "Shutdown requested");
    conductor.stop(Some("die".to_string()));
}

/// Seat a table with the production arbiter.
pub async fn spawn_table(config: &SimulationConfig) -> Result<TableHandle, TableError> {
    spawn_table_with_arbiter(config, Arc::new(RingArbiter)).await
}

/// Seat a table with a custom arbitration policy.
pub async fn spawn_table_with_arbiter(
    config: &SimulationConfig,
    arbiter: Arc<dyn ForkArbiter>,
) -> Result<TableHandle, TableError> {
    config.validate()?;

    let run_id = SimulationReport::new_run_id();
    let (report_tx, report_rx) = oneshot::channel();
    let args = ConductorArguments {
        run_id: run_id.clone(),
        seats: config.seats,
        tick_limit: config.tick_limit,
        seed: config.seed,
        arbiter,
        report_tx: Some(report_tx),
    };

    let name = conductor_name(&run_id);
    let (conductor, conductor_handle) = Actor::spawn(Some(name.clone()), ConductorActor, args)
        .await
        .map_err(|e| TableError::Spawn {
            name,
            reason: e.to_string(),
        })?;

    let mut seats = Vec::with_capacity(config.seats);
    for index in 0..config.seats {
        let name = philosopher_name(index, &run_id);
        let args = PhilosopherArguments {
            index,
            conductor: ConductorPort::new(conductor.clone()),
        };
        match Actor::spawn_linked(
            Some(name.clone()),
            PhilosopherActor,
            args,
            conductor.get_cell(),
        )
        .await
        {
            Ok((seat, _)) => seats.push(seat),
            Err(e) => {
                error!(run_id = %run_id, index, error = %e, "Failed to seat philosopher");
                for seat in &seats {
                    seat.stop(Some("bootstrap failed".to_string()));
                }
                conductor.stop(Some("bootstrap failed".to_string()));
                return Err(TableError::Spawn {
                    name,
                    reason: e.to_string(),
                });
            }
        }
    }

    info!(run_id = %run_id, seats = seats.len(), "Table seated");
    Ok(TableHandle {
        run_id,
        conductor,
        seats,
        report_rx,
        conductor_handle,
    })
}

/// Seat a table, start it, and wait for it to finish.
pub async fn run_simulation(config: &SimulationConfig) -> Result<SimulationReport, TableError> {
    let table = spawn_table(config).await?;
    table.start().await?;
    table.wait().await
}
