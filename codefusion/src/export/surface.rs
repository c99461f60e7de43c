//! Off-screen render surface.
//!
//! Ticket markup is staged here before it is snapshotted. A staged node is a
//! guard: dropping it removes the node, so no exit path can leave one behind.

use crate::ticket::Ticket;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared registry of staged nodes.
#[derive(Debug, Clone, Default)]
pub struct RenderSurface {
    staged: Arc<Mutex<HashSet<u64>>>,
    next_id: Arc<AtomicU64>,
}

impl RenderSurface {
    /// Create an empty surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage ticket markup for a snapshot.
    #[must_use]
    pub fn stage(&self, markup: String, ticket: Ticket) -> StagedNode {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.staged).insert(id);
        tracing::trace!(node = id, ticket = %ticket.id, "Staged ticket markup");
        StagedNode {
            id,
            markup,
            ticket,
            surface: self.clone(),
        }
    }

    /// Number of nodes currently staged.
    #[must_use]
    pub fn staged_count(&self) -> usize {
        lock(&self.staged).len()
    }
}

fn lock(staged: &Mutex<HashSet<u64>>) -> MutexGuard<'_, HashSet<u64>> {
    match staged.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Ticket markup staged on a [`RenderSurface`]. Removed on drop.
#[derive(Debug)]
pub struct StagedNode {
    id: u64,
    markup: String,
    ticket: Ticket,
    surface: RenderSurface,
}

impl StagedNode {
    /// Staged markup.
    #[must_use]
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Ticket the markup was rendered from.
    #[must_use]
    pub const fn ticket(&self) -> &Ticket {
        &self.ticket
    }
}

impl Drop for StagedNode {
    fn drop(&mut self) {
        lock(&self.surface.staged).remove(&self.id);
        tracing::trace!(node = self.id, "Removed staged ticket markup");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ticket() -> Ticket {
        Ticket {
            id: "DEV-0001".into(),
            name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            profession: "Engineer".into(),
            days: vec!["day1".into()],
            avatar: None,
            issued_date: NaiveDate::default(),
        }
    }

    #[test]
    fn dropping_the_node_unstages_it() {
        let surface = RenderSurface::new();
        let a = surface.stage("<a/>".into(), ticket());
        let b = surface.stage("<b/>".into(), ticket());
        assert_eq!(surface.staged_count(), 2);

        drop(a);
        assert_eq!(surface.staged_count(), 1);
        assert_eq!(b.markup(), "<b/>");
        drop(b);
        assert_eq!(surface.staged_count(), 0);
    }
}
