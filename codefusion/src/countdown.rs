//! Landing page countdown.
//!
//! A single timer recomputes the remaining time every second from the clock
//! (never by decrementing) and stops once the conference has started.

use chrono::{DateTime, Utc};
use codefusion_core::effect::Effect;
use codefusion_core::environment::Clock;
use codefusion_core::reducer::Reducer;
use codefusion_core::{smallvec, SmallVec};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Time left until the target, split into display fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CountdownState {
    /// Whole days
    pub days: i64,
    /// Hours (0-23)
    pub hours: i64,
    /// Minutes (0-59)
    pub minutes: i64,
    /// Seconds (0-59)
    pub seconds: i64,
}

impl CountdownState {
    /// Remaining time at `now`, or `None` once `target` has passed.
    ///
    /// ```
    /// use chrono::{Duration, Utc};
    /// use codefusion::countdown::CountdownState;
    ///
    /// let now = Utc::now();
    /// let left = CountdownState::compute(now + Duration::seconds(90_061), now).unwrap();
    /// assert_eq!((left.days, left.hours, left.minutes, left.seconds), (1, 1, 1, 1));
    /// assert!(CountdownState::compute(now, now).is_none());
    /// ```
    #[must_use]
    pub fn compute(target: DateTime<Utc>, now: DateTime<Utc>) -> Option<Self> {
        let millis = (target - now).num_milliseconds();
        if millis <= 0 {
            return None;
        }
        let total = millis / 1000;
        Some(Self {
            days: total / 86_400,
            hours: (total / 3_600) % 24,
            minutes: (total / 60) % 60,
            seconds: total % 60,
        })
    }
}

/// Timer state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownTimerState {
    /// Instant counted down to
    pub target: DateTime<Utc>,
    /// Last computed value (zeros before the first tick)
    pub remaining: CountdownState,
    /// A tick is scheduled
    pub running: bool,
    /// The target has passed
    pub finished: bool,
    /// Bumped on stop; ticks of an older run are ignored
    pub generation: u64,
}

impl CountdownTimerState {
    /// Idle timer for `target`.
    #[must_use]
    pub fn new(target: DateTime<Utc>) -> Self {
        Self {
            target,
            remaining: CountdownState::default(),
            running: false,
            finished: false,
            generation: 0,
        }
    }
}

/// Timer actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountdownAction {
    /// Start ticking
    Start,
    /// One interval elapsed
    Tick {
        /// Run the tick belongs to
        generation: u64,
    },
    /// Stop ticking (page left)
    Stop,
    /// A new value was computed
    Updated(CountdownState),
    /// The target passed; no further ticks
    Finished,
}

/// Timer collaborators.
#[derive(Clone)]
pub struct CountdownEnvironment {
    /// Source of the current time
    pub clock: Arc<dyn Clock>,
    /// Interval between ticks
    pub tick_interval: Duration,
}

impl CountdownEnvironment {
    /// One tick per second.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            tick_interval: Duration::from_secs(1),
        }
    }
}

/// Countdown reducer.
#[derive(Debug, Clone, Copy, Default)]
pub struct CountdownReducer;

impl Reducer for CountdownReducer {
    type State = CountdownTimerState;
    type Action = CountdownAction;
    type Environment = CountdownEnvironment;

    fn reduce(
        &self,
        state: &mut CountdownTimerState,
        action: CountdownAction,
        env: &CountdownEnvironment,
    ) -> SmallVec<[Effect<CountdownAction>; 4]> {
        match action {
            CountdownAction::Start => {
                if state.running || state.finished {
                    return smallvec![Effect::None];
                }
                state.running = true;
                smallvec![Effect::delay(
                    env.tick_interval,
                    CountdownAction::Tick {
                        generation: state.generation
                    }
                )]
            },

            CountdownAction::Tick { generation } => {
                if !state.running || generation != state.generation {
                    return smallvec![Effect::None];
                }
                if let Some(remaining) = CountdownState::compute(state.target, env.clock.now()) {
                    state.remaining = remaining;
                    smallvec![
                        Effect::future(async move { Some(CountdownAction::Updated(remaining)) }),
                        Effect::delay(env.tick_interval, CountdownAction::Tick { generation }),
                    ]
                } else {
                    tracing::info!(target_at = %state.target, "Countdown finished");
                    state.remaining = CountdownState::default();
                    state.running = false;
                    state.finished = true;
                    smallvec![Effect::future(async { Some(CountdownAction::Finished) })]
                }
            },

            CountdownAction::Stop => {
                state.running = false;
                state.generation += 1;
                smallvec![Effect::None]
            },

            CountdownAction::Updated(_) | CountdownAction::Finished => smallvec![Effect::None],
        }
    }
}
