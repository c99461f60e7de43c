//! Integration tests for Store action broadcasting and lifecycle
//!
//! Covers the observation features the HTTP layer relies on: waiting for a
//! result action, reading state that already reflects a broadcast action, and
//! unmounting a store with work still in flight.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use codefusion_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
use codefusion_runtime::{wait_for_action, Store, StoreError};
use std::time::Duration;

// ============================================================================
// Test Fixtures
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum TestAction {
    /// Start a submission that answers after `latency_ms`
    Submit { latency_ms: u64 },
    /// The collaborator answered
    Accepted,
    /// The collaborator refused
    Refused { reason: String },
    /// Revealed after a delay following acceptance
    Revealed,
    /// Run three steps, each scheduled by the previous one
    RunSteps,
    /// One step done
    Step(u32),
}

#[derive(Debug, Clone, Default)]
struct TestState {
    submitting: bool,
    accepted: bool,
    revealed: bool,
    steps: Vec<u32>,
}

#[derive(Clone)]
struct TestEnvironment {
    refuse: bool,
    reveal_delay: Duration,
}

impl Default for TestEnvironment {
    fn default() -> Self {
        Self {
            refuse: false,
            reveal_delay: Duration::from_millis(10),
        }
    }
}

#[derive(Clone)]
struct TestReducer;

impl Reducer for TestReducer {
    type State = TestState;
    type Action = TestAction;
    type Environment = TestEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            TestAction::Submit { latency_ms } => {
                state.submitting = true;
                let refuse = env.refuse;
                smallvec![Effect::future(async move {
                    tokio::time::sleep(Duration::from_millis(latency_ms)).await;
                    if refuse {
                        Some(TestAction::Refused {
                            reason: "offline".into(),
                        })
                    } else {
                        Some(TestAction::Accepted)
                    }
                })]
            },
            TestAction::Accepted => {
                state.submitting = false;
                state.accepted = true;
                smallvec![Effect::delay(env.reveal_delay, TestAction::Revealed)]
            },
            TestAction::Refused { .. } => {
                state.submitting = false;
                smallvec![Effect::None]
            },
            TestAction::Revealed => {
                state.revealed = true;
                smallvec![Effect::None]
            },
            TestAction::RunSteps => {
                state.steps.clear();
                smallvec![Effect::future(async { Some(TestAction::Step(1)) })]
            },
            TestAction::Step(n) => {
                state.steps.push(n);
                if n < 3 {
                    smallvec![Effect::future(async move {
                        tokio::time::sleep(Duration::from_millis(5)).await;
                        Some(TestAction::Step(n + 1))
                    })]
                } else {
                    smallvec![Effect::None]
                }
            },
        }
    }
}

fn store(env: TestEnvironment) -> Store<TestState, TestAction, TestEnvironment, TestReducer> {
    Store::new(TestState::default(), TestReducer, env)
}

// ============================================================================
// Tests
// ============================================================================

/// A result action can be awaited directly after sending.
#[tokio::test]
async fn send_and_wait_for_returns_the_result() {
    let store = store(TestEnvironment::default());

    let result = store
        .send_and_wait_for(
            TestAction::Submit { latency_ms: 5 },
            |a| matches!(a, TestAction::Accepted | TestAction::Refused { .. }),
            Duration::from_secs(1),
        )
        .await
        .unwrap();

    assert_eq!(result, TestAction::Accepted);
}

/// State read after a broadcast already reflects the broadcast action.
#[tokio::test]
async fn broadcast_follows_reduction() {
    let store = store(TestEnvironment::default());

    store
        .send_and_wait_for(
            TestAction::Submit { latency_ms: 0 },
            |a| matches!(a, TestAction::Revealed),
            Duration::from_secs(1),
        )
        .await
        .unwrap();

    let state = store.state(Clone::clone).await;
    assert!(state.accepted);
    assert!(state.revealed);
    assert!(!state.submitting);
}

/// Refusals are observable the same way as successes.
#[tokio::test]
async fn refusal_is_broadcast() {
    let store = store(TestEnvironment {
        refuse: true,
        ..TestEnvironment::default()
    });

    let result = store
        .send_and_wait_for(
            TestAction::Submit { latency_ms: 0 },
            |a| matches!(a, TestAction::Accepted | TestAction::Refused { .. }),
            Duration::from_secs(1),
        )
        .await
        .unwrap();

    assert_eq!(
        result,
        TestAction::Refused {
            reason: "offline".into()
        }
    );
    assert!(!store.state(|s| s.accepted).await);
}

/// A subscriber taken before sending can inspect state before waiting.
#[tokio::test]
async fn pre_subscribed_receiver_sees_late_results() {
    let store = store(TestEnvironment::default());
    let mut rx = store.subscribe_actions();

    store.send(TestAction::Submit { latency_ms: 20 }).await.unwrap();
    assert!(store.state(|s| s.submitting).await);

    let action = wait_for_action(&mut rx, |a| matches!(a, TestAction::Accepted), Duration::from_secs(1))
        .await
        .unwrap();
    assert_eq!(action, TestAction::Accepted);
}

/// Waiting gives up with a timeout when nothing matches.
#[tokio::test]
async fn wait_times_out() {
    let store = store(TestEnvironment::default());

    let result = store
        .send_and_wait_for(
            TestAction::Submit { latency_ms: 500 },
            |a| matches!(a, TestAction::Accepted),
            Duration::from_millis(20),
        )
        .await;

    assert!(matches!(result, Err(StoreError::Timeout)));
}

/// Unmounting drops in-flight results and rejects new actions.
#[tokio::test]
async fn unmount_discards_late_results() {
    let store = store(TestEnvironment::default());
    let mut rx = store.subscribe_actions();

    store.send(TestAction::Submit { latency_ms: 30 }).await.unwrap();
    store.unmount();
    assert!(!store.is_mounted());

    tokio::time::sleep(Duration::from_millis(80)).await;

    assert!(rx.try_recv().is_err());
    let state = store.state(Clone::clone).await;
    assert!(state.submitting);
    assert!(!state.accepted);
    assert_eq!(store.pending_effects(), 0);

    let err = store.send(TestAction::Submit { latency_ms: 0 }).await.unwrap_err();
    assert!(matches!(err, StoreError::ShutdownInProgress));
}

/// Each result can schedule the next step; the chain runs to completion.
#[tokio::test]
async fn chained_results_run_in_order() {
    let store = store(TestEnvironment::default());

    store
        .send_and_wait_for(
            TestAction::RunSteps,
            |a| matches!(a, TestAction::Step(3)),
            Duration::from_secs(1),
        )
        .await
        .unwrap();

    assert_eq!(store.state(|s| s.steps.clone()).await, vec![1, 2, 3]);
}

/// Shutdown waits for running effects.
#[tokio::test]
async fn shutdown_waits_for_effects() {
    let store = store(TestEnvironment::default());
    store.send(TestAction::Submit { latency_ms: 30 }).await.unwrap();

    store.shutdown(Duration::from_secs(1)).await.unwrap();
    assert_eq!(store.pending_effects(), 0);
}

/// Shutdown reports effects that outlive the grace period.
#[tokio::test]
async fn shutdown_times_out() {
    let store = store(TestEnvironment::default());
    store.send(TestAction::Submit { latency_ms: 1_000 }).await.unwrap();

    let result = store.shutdown(Duration::from_millis(30)).await;
    assert!(matches!(result, Err(StoreError::ShutdownTimeout(1))));
}
