//! # CodeFusion Runtime
//!
//! Runtime implementation for the reducer architecture.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling for a single component (registration form, ticket
//! view, countdown timer).
//!
//! ## Core Concepts
//!
//! - **Store**: Manages state, executes reducers, and handles effects
//! - **Effect Execution**: Runs the side effects described by reducers
//! - **Feedback Loop**: Actions produced by effects are sent back to the store
//! - **Unmount**: Stops pending timers and drops late-arriving results
//!
//! ## Example
//!
//! ```ignore
//! use codefusion_runtime::Store;
//!
//! let store = Store::new(FormState::default(), RegistrationReducer, env);
//! store.send(FormAction::Submit).await?;
//! let phase = store.state(|s| s.phase).await;
//! ```

use codefusion_core::{effect::Effect, reducer::Reducer};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tokio::task::AbortHandle;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur while interacting with a Store
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// The store has been unmounted or is shutting down and rejects new actions
        #[error("Store is no longer mounted")]
        ShutdownInProgress,

        /// Graceful shutdown timed out with effects still running
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Waiting for a result action timed out
        #[error("Timed out waiting for a result action")]
        Timeout,

        /// The action broadcast channel closed while waiting
        #[error("Action broadcast channel closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;

/// Store configuration
#[derive(Debug, Clone, Copy)]
pub struct StoreConfig {
    /// Capacity of the action broadcast channel used by observers
    pub broadcast_capacity: usize,
}

impl StoreConfig {
    /// Override the broadcast capacity
    #[must_use]
    pub const fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: 64,
        }
    }
}

/// Handle for waiting on the effects started by one `send()`
///
/// Only effects produced directly by the sent action are tracked; actions fed
/// back from those effects start their own effects which are not awaited.
///
/// # Example
///
/// ```ignore
/// let mut handle = store.send(Action::Start).await?;
/// handle.wait_with_timeout(Duration::from_secs(5)).await?;
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };
        let tracking = EffectTracking {
            counter,
            notifier: Arc::new(tx),
        };

        (handle, tracking)
    }

    /// Create a handle that's already complete
    #[must_use]
    pub fn completed() -> Self {
        let (handle, _tracking) = Self::new();
        handle
    }

    /// Number of tracked effects still running
    #[must_use]
    pub fn pending(&self) -> usize {
        self.effects.load(Ordering::SeqCst)
    }

    /// Wait for all tracked effects to complete
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            if self.completion.changed().await.is_err() {
                break;
            }
        }
    }

    /// Wait for all tracked effects to complete with a timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the timeout expires first.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.effects.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Internal: effect tracking context passed through effect execution
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: Arc<watch::Sender<()>>,
}

impl EffectTracking {
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            // Counter reached zero, notify waiters
            let _ = self.notifier.send(());
        }
    }
}

/// Internal: RAII guard that decrements effect counters on drop
///
/// Aborted tasks drop their guards too, so waiters never hang on an
/// unmounted store.
struct DecrementGuard {
    tracking: EffectTracking,
    pending: Arc<AtomicUsize>,
}

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.tracking.decrement();
        self.pending.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Store module - The runtime for reducers
pub mod store {
    use super::{
        AbortHandle, Arc, AtomicBool, AtomicUsize, DecrementGuard, Duration, Effect,
        EffectHandle, EffectTracking, Mutex, Ordering, Reducer, RwLock, StoreConfig, StoreError,
    };
    use tokio::sync::broadcast;

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock` for concurrent access)
    /// 2. Reducer (component logic)
    /// 3. Environment (injected collaborators)
    /// 4. Effect execution (with feedback loop)
    ///
    /// Cloning a store is cheap; clones share the same state and tasks.
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: Arc<R>,
        environment: Arc<E>,
        mounted: Arc<AtomicBool>,
        pending_effects: Arc<AtomicUsize>,
        tasks: Arc<Mutex<Vec<AbortHandle>>>,
        /// Actions produced by effects are broadcast to observers (HTTP
        /// handlers waiting for a result, SSE streams).
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: Arc::clone(&self.reducer),
                environment: Arc::clone(&self.environment),
                mounted: Arc::clone(&self.mounted),
                pending_effects: Arc::clone(&self.pending_effects),
                tasks: Arc::clone(&self.tasks),
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + Clone + std::fmt::Debug + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new store with a custom configuration
        #[must_use]
        pub fn with_config(
            initial_state: S,
            reducer: R,
            environment: E,
            config: StoreConfig,
        ) -> Self {
            let (action_broadcast, _) = broadcast::channel(config.broadcast_capacity.max(1));
            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer: Arc::new(reducer),
                environment: Arc::new(environment),
                mounted: Arc::new(AtomicBool::new(true)),
                pending_effects: Arc::new(AtomicUsize::new(0)),
                tasks: Arc::new(Mutex::new(Vec::new())),
                action_broadcast,
            }
        }

        /// Whether the store still accepts actions
        #[must_use]
        pub fn is_mounted(&self) -> bool {
            self.mounted.load(Ordering::Acquire)
        }

        /// Number of effects currently running across all sends
        #[must_use]
        pub fn pending_effects(&self) -> usize {
            self.pending_effects.load(Ordering::Acquire)
        }

        /// Send an action to the store
        ///
        /// 1. Acquires write lock on state
        /// 2. Calls reducer with (state, action, environment)
        /// 3. Starts the returned effects asynchronously
        ///
        /// `send()` returns after starting effect execution, not completion.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store was unmounted.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
            if !self.is_mounted() {
                tracing::debug!(?action, "Rejected action: store is unmounted");
                metrics::counter!("store.unmounted.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            metrics::counter!("store.commands.total").increment(1);
            let (handle, tracking) = EffectHandle::new();

            let effects = {
                let mut state = self.state.write().await;
                let span = tracing::debug_span!("reducer_execution");
                let _enter = span.enter();

                let effects = self.reducer.reduce(&mut state, action, &self.environment);
                tracing::trace!("Reducer completed, returned {} effects", effects.len());
                effects
            };

            for effect in effects {
                self.execute_effect(effect, &tracking);
            }

            Ok(handle)
        }

        /// Send an action and wait for a matching result action
        ///
        /// Subscribes to the action broadcast BEFORE sending so a fast effect
        /// cannot slip its result past the observer.
        ///
        /// # Errors
        ///
        /// - [`StoreError::Timeout`]: no matching action within `timeout`
        /// - [`StoreError::ChannelClosed`]: broadcast channel closed
        /// - [`StoreError::ShutdownInProgress`]: store is unmounted
        pub async fn send_and_wait_for<F>(
            &self,
            action: A,
            predicate: F,
            timeout: Duration,
        ) -> Result<A, StoreError>
        where
            F: Fn(&A) -> bool,
        {
            let mut rx = self.action_broadcast.subscribe();
            self.send(action).await?;
            wait_for_action(&mut rx, predicate, timeout).await
        }

        /// Subscribe to all actions produced by effects
        ///
        /// Each action is broadcast after the reducer has processed it.
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let errors = store.state(|s| s.errors.clone()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&state)
        }

        /// Unmount the store
        ///
        /// Rejects further actions, aborts running effects (pending timers,
        /// in-flight collaborator calls) and guarantees that no late result is
        /// applied to the state.
        pub fn unmount(&self) {
            if !self.mounted.swap(false, Ordering::AcqRel) {
                return;
            }

            let handles = match self.tasks.lock() {
                Ok(mut tasks) => std::mem::take(&mut *tasks),
                Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
            };
            let aborted = handles.iter().filter(|h| !h.is_finished()).count();
            for handle in handles {
                handle.abort();
            }

            tracing::debug!(aborted, "Store unmounted");
            metrics::counter!("store.unmounted").increment(1);
        }

        /// Gracefully stop the store, waiting for running effects
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if effects are still running
        /// when the timeout expires.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");
            self.mounted.store(false, Ordering::Release);

            let start = std::time::Instant::now();
            let poll_interval = Duration::from_millis(20);

            loop {
                let pending = self.pending_effects.load(Ordering::Acquire);
                if pending == 0 {
                    return Ok(());
                }
                if start.elapsed() >= timeout {
                    tracing::error!(pending_effects = pending, "Shutdown timeout");
                    self.unmount_tasks();
                    return Err(StoreError::ShutdownTimeout(pending));
                }
                tokio::time::sleep(poll_interval).await;
            }
        }

        fn unmount_tasks(&self) {
            if let Ok(mut tasks) = self.tasks.lock() {
                for handle in tasks.drain(..) {
                    handle.abort();
                }
            }
        }

        fn spawn_tracked<F>(&self, tracking: &EffectTracking, fut: F)
        where
            F: std::future::Future<Output = ()> + Send + 'static,
        {
            tracking.increment();
            self.pending_effects.fetch_add(1, Ordering::SeqCst);
            let guard = DecrementGuard {
                tracking: tracking.clone(),
                pending: Arc::clone(&self.pending_effects),
            };

            let task = tokio::spawn(async move {
                let _guard = guard;
                fut.await;
            });

            if let Ok(mut tasks) = self.tasks.lock() {
                tasks.retain(|h| !h.is_finished());
                tasks.push(task.abort_handle());
            }

            // Lost a race with unmount(): the task was registered after the
            // handles were drained.
            if !self.is_mounted() {
                task.abort();
            }
        }

        async fn feed_back(&self, action: A) {
            if !self.is_mounted() {
                tracing::debug!(?action, "Dropping late effect result on unmounted store");
                return;
            }
            // Reduce first so observers woken by the broadcast read state
            // that already reflects the action.
            if self.send(action.clone()).await.is_ok() {
                let _ = self.action_broadcast.send(action);
            }
        }

        fn execute_effect(&self, effect: Effect<A>, tracking: &EffectTracking) {
            match effect {
                Effect::None => {
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Future(fut) => {
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                    let store = self.clone();
                    self.spawn_tracked(tracking, async move {
                        if let Some(action) = fut.await {
                            tracing::trace!("Effect::Future produced an action, sending to store");
                            store.feed_back(action).await;
                        }
                    });
                },
                Effect::Delay { duration, action } => {
                    metrics::counter!("store.effects.executed", "type" => "delay").increment(1);
                    let store = self.clone();
                    self.spawn_tracked(tracking, async move {
                        tokio::time::sleep(duration).await;
                        store.feed_back(*action).await;
                    });
                },
            }
        }
    }

    /// Wait on an already-subscribed receiver for an action matching `predicate`
    ///
    /// Use this when the caller must inspect state between sending and
    /// waiting (a send may legitimately produce no result action).
    ///
    /// # Errors
    ///
    /// - [`StoreError::Timeout`]: no matching action within `timeout`
    /// - [`StoreError::ChannelClosed`]: broadcast channel closed
    pub async fn wait_for_action<A, F>(
        rx: &mut broadcast::Receiver<A>,
        predicate: F,
        timeout: Duration,
    ) -> Result<A, StoreError>
    where
        A: Clone,
        F: Fn(&A) -> bool,
    {
        tokio::time::timeout(timeout, async {
            loop {
                match rx.recv().await {
                    Ok(action) if predicate(&action) => return Ok(action),
                    Ok(_) => {},
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Action observer lagged");
                    },
                    Err(broadcast::error::RecvError::Closed) => {
                        return Err(StoreError::ChannelClosed);
                    },
                }
            }
        })
        .await
        .map_err(|_| StoreError::Timeout)?
    }
}

pub use store::{wait_for_action, Store};

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use codefusion_core::{smallvec, SmallVec};

    #[derive(Debug, Clone, Default)]
    struct TickState {
        ticks: u32,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum TickAction {
        Start,
        Tick,
        Ping,
        Pong,
    }

    struct TickReducer;

    impl Reducer for TickReducer {
        type State = TickState;
        type Action = TickAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut TickState,
            action: TickAction,
            _env: &(),
        ) -> SmallVec<[Effect<TickAction>; 4]> {
            match action {
                TickAction::Start => {
                    smallvec![Effect::delay(Duration::from_millis(50), TickAction::Tick)]
                },
                TickAction::Tick => {
                    state.ticks += 1;
                    smallvec![Effect::None]
                },
                TickAction::Ping => {
                    smallvec![Effect::future(async { Some(TickAction::Pong) })]
                },
                TickAction::Pong => smallvec![Effect::None],
            }
        }
    }

    #[tokio::test]
    async fn delay_feeds_action_back() {
        let store = Store::new(TickState::default(), TickReducer, ());
        let mut handle = store.send(TickAction::Start).await.unwrap();
        handle
            .wait_with_timeout(Duration::from_secs(1))
            .await
            .unwrap();
        // The fed-back Tick is processed before the delay task finishes.
        assert_eq!(store.state(|s| s.ticks).await, 1);
    }

    #[tokio::test]
    async fn send_and_wait_for_returns_result_action() {
        let store = Store::new(TickState::default(), TickReducer, ());
        let result = store
            .send_and_wait_for(
                TickAction::Ping,
                |a| matches!(a, TickAction::Pong),
                Duration::from_secs(1),
            )
            .await
            .unwrap();
        assert_eq!(result, TickAction::Pong);
    }

    #[tokio::test]
    async fn unmount_cancels_pending_delay() {
        let store = Store::new(TickState::default(), TickReducer, ());
        let mut handle = store.send(TickAction::Start).await.unwrap();
        store.unmount();

        handle
            .wait_with_timeout(Duration::from_secs(1))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(store.state(|s| s.ticks).await, 0);
        assert_eq!(store.pending_effects(), 0);
        assert_eq!(
            store.send(TickAction::Tick).await.unwrap_err(),
            StoreError::ShutdownInProgress
        );
    }

    #[tokio::test]
    async fn completed_handle_does_not_wait() {
        let mut handle = EffectHandle::completed();
        assert_eq!(handle.pending(), 0);
        handle
            .wait_with_timeout(Duration::from_millis(10))
            .await
            .unwrap();
    }
}
