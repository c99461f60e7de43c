//! Server-sent events over a store's action broadcast.
//!
//! A handler subscribes to a store, then hands the receiver to
//! [`action_stream`] with a projection deciding, per action, whether to push
//! an event and whether the stream is finished.
//!
//! ```ignore
//! let rx = store.subscribe_actions();
//! store.send(CountdownAction::Start).await?;
//! Ok(action_stream(rx, guard, "tick", |action| match action {
//!     CountdownAction::Updated(remaining) => SseStep::Emit(*remaining),
//!     CountdownAction::Finished => SseStep::EmitAndClose(CountdownState::default()),
//!     _ => SseStep::Skip,
//! }))
//! ```

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{self, Stream};
use serde::Serialize;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};

/// What to do with one observed action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseStep<T> {
    /// Ignore the action
    Skip,
    /// Push an event and keep streaming
    Emit(T),
    /// Push a final event, then end the stream
    EmitAndClose(T),
    /// End the stream without an event
    Close,
}

fn to_event<T: Serialize>(name: &'static str, payload: &T) -> Event {
    Event::default()
        .event(name)
        .json_data(payload)
        .unwrap_or_else(|e| Event::default().event("error").data(e.to_string()))
}

/// Turn a store action receiver into an SSE response.
///
/// `keep_alive` is held for the lifetime of the stream and dropped when the
/// client disconnects; pass a guard that unmounts the store to stop its
/// timers at that point.
pub fn action_stream<A, T, G, F>(
    rx: broadcast::Receiver<A>,
    keep_alive: G,
    event_name: &'static str,
    project: F,
) -> Sse<impl Stream<Item = Result<Event, Infallible>> + Send + 'static>
where
    A: Clone + Send + 'static,
    T: Serialize + Send + 'static,
    G: Send + 'static,
    F: Fn(&A) -> SseStep<T> + Send + Sync + 'static,
{
    let project = Arc::new(project);

    let events = stream::unfold(
        (rx, keep_alive, false),
        move |(mut rx, keep_alive, done)| {
            let project = Arc::clone(&project);
            async move {
                if done {
                    return None;
                }
                loop {
                    match rx.recv().await {
                        Ok(action) => match project(&action) {
                            SseStep::Skip => {},
                            SseStep::Emit(payload) => {
                                let event = to_event(event_name, &payload);
                                return Some((Ok(event), (rx, keep_alive, false)));
                            },
                            SseStep::EmitAndClose(payload) => {
                                let event = to_event(event_name, &payload);
                                return Some((Ok(event), (rx, keep_alive, true)));
                            },
                            SseStep::Close => return None,
                        },
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "SSE subscriber lagged behind");
                        },
                        Err(RecvError::Closed) => return None,
                    }
                }
            }
        },
    );

    Sse::new(events).keep_alive(KeepAlive::default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct DropFlag(Arc<AtomicBool>);

    impl Drop for DropFlag {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn stream_ends_after_final_event() {
        let (tx, rx) = broadcast::channel::<u32>(8);
        let dropped = Arc::new(AtomicBool::new(false));

        let sse = action_stream(rx, DropFlag(Arc::clone(&dropped)), "tick", |n: &u32| match *n {
            0 => SseStep::Skip,
            3 => SseStep::EmitAndClose(*n),
            _ => SseStep::Emit(*n),
        });

        for n in [0, 1, 2, 3, 4] {
            tx.send(n).unwrap();
        }

        let body = axum::body::to_bytes(sse.into_response().into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();

        assert_eq!(text.matches("event: tick").count(), 3);
        assert!(text.contains("data: 3"));
        assert!(!text.contains("data: 4"));
        assert!(dropped.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn stream_ends_when_channel_closes() {
        let (tx, rx) = broadcast::channel::<u32>(8);
        let sse = action_stream(rx, (), "tick", |n: &u32| SseStep::Emit(*n));

        tx.send(7).unwrap();
        drop(tx);

        let body = axum::body::to_bytes(sse.into_response().into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("data: 7"));
    }
}
