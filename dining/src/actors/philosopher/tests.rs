use async_trait::async_trait;
use ractor::{call, Actor, ActorProcessingErr, ActorRef};
use shared_types::{ForkSide, ForkState, PhilosopherPhase};
use tokio::sync::mpsc;

use crate::actors::conductor::ConductorMsg;
use crate::actors::philosopher::{
    ConductorPort, PhilosopherActor, PhilosopherArguments, PhilosopherMsg,
};

/// Stands in for the conductor and records every request it receives.
struct ProbeConductor;

#[async_trait]
impl Actor for ProbeConductor {
    type Msg = ConductorMsg;
    type State = mpsc::UnboundedSender<ConductorMsg>;
    type Arguments = mpsc::UnboundedSender<ConductorMsg>;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        Ok(args)
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        let _ = state.send(message);
        Ok(())
    }
}

async fn setup_seat(
    index: usize,
) -> (
    ActorRef<PhilosopherMsg>,
    ActorRef<ConductorMsg>,
    mpsc::UnboundedReceiver<ConductorMsg>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let (probe, _probe_handle) = Actor::spawn(None, ProbeConductor, tx).await.unwrap();
    let args = PhilosopherArguments {
        index,
        conductor: ConductorPort::new(probe.clone()),
    };
    let (seat, _seat_handle) = Actor::spawn(None, PhilosopherActor, args).await.unwrap();
    (seat, probe, rx)
}

async fn fork_state(seat: &ActorRef<PhilosopherMsg>) -> ForkState {
    call!(seat, |reply| PhilosopherMsg::GetForkState { reply }).unwrap()
}

async fn reply(seat: &ActorRef<PhilosopherMsg>, side: ForkSide, granted: bool) -> usize {
    call!(seat, |reply| PhilosopherMsg::ForkReply {
        side,
        granted,
        reply,
    })
    .unwrap()
}

#[tokio::test]
async fn test_full_meal_cycle_over_the_wire() {
    let (seat, probe, mut requests) = setup_seat(2).await;
    assert_eq!(fork_state(&seat).await, ForkState::NoFork);

    let emitted = call!(seat, |reply| PhilosopherMsg::Tick { reply }).unwrap();
    assert_eq!(emitted, 1);
    assert!(matches!(
        requests.recv().await,
        Some(ConductorMsg::GrabLeftFork { index: 2 })
    ));

    assert_eq!(reply(&seat, ForkSide::Left, true).await, 1);
    assert!(matches!(
        requests.recv().await,
        Some(ConductorMsg::GrabRightFork { index: 2 })
    ));
    assert_eq!(fork_state(&seat).await, ForkState::LeftFork);

    assert_eq!(reply(&seat, ForkSide::Right, true).await, 0);
    assert_eq!(fork_state(&seat).await, ForkState::BothForks);

    let emitted = call!(seat, |reply| PhilosopherMsg::Tick { reply }).unwrap();
    assert_eq!(emitted, 1);
    assert!(matches!(
        requests.recv().await,
        Some(ConductorMsg::DoneEating { index: 2 })
    ));
    assert_eq!(fork_state(&seat).await, ForkState::NoFork);

    let snapshot = call!(seat, |reply| PhilosopherMsg::GetSnapshot { reply }).unwrap();
    assert_eq!(snapshot.phase, PhilosopherPhase::Thinking);
    assert_eq!(snapshot.meals, 1);
    assert!(requests.try_recv().is_err());

    seat.stop(None);
    probe.stop(None);
}

#[tokio::test]
async fn test_denied_right_fork_is_retried_with_left_fork_kept() {
    let (seat, probe, mut requests) = setup_seat(0).await;

    call!(seat, |reply| PhilosopherMsg::Tick { reply }).unwrap();
    reply(&seat, ForkSide::Left, true).await;
    assert_eq!(reply(&seat, ForkSide::Right, false).await, 0);
    assert_eq!(fork_state(&seat).await, ForkState::LeftFork);

    // Drain the first two requests
    requests.recv().await.unwrap();
    requests.recv().await.unwrap();

    let emitted = call!(seat, |reply| PhilosopherMsg::Tick { reply }).unwrap();
    assert_eq!(emitted, 1);
    assert!(matches!(
        requests.recv().await,
        Some(ConductorMsg::GrabRightFork { index: 0 })
    ));
    assert_eq!(fork_state(&seat).await, ForkState::LeftFork);

    seat.stop(None);
    probe.stop(None);
}

#[tokio::test]
async fn test_unexpected_reply_fails_the_philosopher() {
    let (seat, probe, _requests) = setup_seat(1).await;

    let result = call!(seat, |reply| PhilosopherMsg::ForkReply {
        side: ForkSide::Right,
        granted: true,
        reply,
    });
    assert!(result.is_err(), "reply port should be dropped on failure");

    probe.stop(None);
}
