use ractor::call;
use shared_types::{SimulationOutcome, TableSnapshot};

use crate::actors::conductor::{ConductorError, ConductorMsg};

use super::support::{setup_test_table, wait_until_stopped};

#[tokio::test]
async fn test_conductor_snapshot_before_go() {
    let table = setup_test_table(5, 100, 1).await;
    assert!(!table.conductor.get_id().to_string().is_empty());

    let snapshot: TableSnapshot =
        call!(table.conductor, |reply| ConductorMsg::GetSnapshot { reply }).unwrap();
    assert!(!snapshot.started);
    assert_eq!(snapshot.run_id, table.run_id());
    assert_eq!(snapshot.seats, 5);
    assert_eq!(snapshot.tick_count, 0);
    assert_eq!(snapshot.tick_limit, 100);
    assert_eq!(snapshot.busy_forks, 0);

    table.shutdown();
    let report = table.wait().await.unwrap();
    assert_eq!(report.outcome, SimulationOutcome::Shutdown);
    assert_eq!(report.ticks_completed, 0);
}

#[tokio::test]
async fn test_die_before_go_stops_linked_philosophers() {
    let table = setup_test_table(3, 100, 2).await;
    let seats = table.seats.clone();

    table.shutdown();
    table.wait().await.unwrap();

    for seat in &seats {
        assert!(wait_until_stopped(seat).await, "philosopher outlived the conductor");
    }
}

#[tokio::test]
async fn test_go_rejects_wrong_topology() {
    let table = setup_test_table(5, 1_000_000, 3).await;

    let partial = table.seats[..2].to_vec();
    let result = call!(table.conductor, |reply| ConductorMsg::Go {
        seats: partial,
        reply,
    })
    .unwrap();
    assert!(matches!(
        result,
        Err(ConductorError::InvalidTopology {
            expected: 5,
            actual: 2
        })
    ));

    table.start().await.unwrap();

    let seats = table.seats.clone();
    let again = call!(table.conductor, |reply| ConductorMsg::Go { seats, reply }).unwrap();
    assert!(matches!(again, Err(ConductorError::AlreadyStarted)));

    table.shutdown();
    let report = table.wait().await.unwrap();
    assert_eq!(report.outcome, SimulationOutcome::Shutdown);
}

#[tokio::test]
async fn test_fork_request_before_go_is_fatal() {
    let table = setup_test_table(5, 100, 4).await;

    table
        .conductor
        .send_message(ConductorMsg::GrabLeftFork { index: 0 })
        .unwrap();

    let report = table.wait().await.unwrap();
    match report.outcome {
        SimulationOutcome::Failed { reason } => {
            assert!(reason.contains("not started"), "unexpected reason: {reason}");
        }
        other => panic!("Expected Failed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_request_for_unknown_seat_is_fatal() {
    let table = setup_test_table(5, 1_000_000, 5).await;
    table.start().await.unwrap();

    table
        .conductor
        .send_message(ConductorMsg::DoneEating { index: 9 })
        .unwrap();

    let report = table.wait().await.unwrap();
    match report.outcome {
        SimulationOutcome::Failed { reason } => {
            assert!(reason.contains("unknown seat: 9"), "unexpected reason: {reason}");
        }
        other => panic!("Expected Failed, got {:?}", other),
    }
}
