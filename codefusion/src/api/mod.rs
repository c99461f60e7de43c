//! HTTP API handlers.
//!
//! - Registrations: replay a submitted form through the form reducer
//! - Tickets: view, export and share an issued ticket
//! - Countdown: current value and a live SSE stream
//! - Schedule: static programme content
//! - Pages: server-rendered HTML

pub mod countdown;
pub mod pages;
pub mod registrations;
pub mod schedule;
pub mod tickets;

/// Runs a closure when dropped.
///
/// Handlers hold one per store so the store is unmounted on every exit path,
/// including early returns and client disconnects.
pub struct UnmountGuard(Option<Box<dyn FnOnce() + Send>>);

impl UnmountGuard {
    /// Guard running `unmount` on drop.
    pub fn new(unmount: impl FnOnce() + Send + 'static) -> Self {
        Self(Some(Box::new(unmount)))
    }
}

impl Drop for UnmountGuard {
    fn drop(&mut self) {
        if let Some(unmount) = self.0.take() {
            unmount();
        }
    }
}
