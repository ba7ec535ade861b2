use std::sync::Arc;
use std::time::Duration;

use ractor::{ActorRef, ActorStatus};
use shared_types::ForkState;

use crate::actors::conductor::ForkArbiter;
use crate::config::SimulationConfig;
use crate::table::{spawn_table, spawn_table_with_arbiter, TableHandle};

/// Grants every request: lets the test drive the table into a double
/// allocation the invariant checker must catch.
pub(crate) struct GreedyArbiter;

impl ForkArbiter for GreedyArbiter {
    fn livelock_guard(&self, _busy_forks: usize, _seats: usize) -> bool {
        false
    }

    fn grant_left(&self, _left_neighbor: ForkState) -> bool {
        true
    }

    fn grant_right(&self, _right_neighbor: ForkState) -> bool {
        true
    }
}

pub(crate) fn test_config(seats: usize, tick_limit: u64, seed: u64) -> SimulationConfig {
    SimulationConfig {
        seats,
        tick_limit,
        seed: Some(seed),
    }
}

pub(crate) async fn setup_test_table(seats: usize, tick_limit: u64, seed: u64) -> TableHandle {
    spawn_table(&test_config(seats, tick_limit, seed))
        .await
        .unwrap()
}

pub(crate) async fn setup_greedy_table(seats: usize, tick_limit: u64, seed: u64) -> TableHandle {
    spawn_table_with_arbiter(&test_config(seats, tick_limit, seed), Arc::new(GreedyArbiter))
        .await
        .unwrap()
}

/// Poll until the actor has fully stopped.
pub(crate) async fn wait_until_stopped<M: ractor::Message>(actor: &ActorRef<M>) -> bool {
    for _ in 0..200 {
        if actor.get_status() == ActorStatus::Stopped {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
