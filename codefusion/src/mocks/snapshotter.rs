//! Mock snapshotter with scripted behaviour.

use crate::error::SnapshotError;
use crate::export::{StagedNode, TicketSnapshotter};
use image::{Rgb, RgbImage};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// What the mock does when asked for a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotBehavior {
    /// Return a plain image of the given size
    Succeed {
        /// Image width
        width: u32,
        /// Image height
        height: u32,
    },
    /// Fail with the given error
    Fail(SnapshotError),
    /// Never answer (exercises the snapshot timeout)
    Hang,
}

/// Mock snapshotter.
#[derive(Debug, Clone)]
pub struct MockSnapshotter {
    behavior: SnapshotBehavior,
    calls: Arc<AtomicUsize>,
}

impl MockSnapshotter {
    /// Create a snapshotter with `behavior`.
    #[must_use]
    pub fn new(behavior: SnapshotBehavior) -> Self {
        Self {
            behavior,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Snapshotter returning a 200x100 image.
    #[must_use]
    pub fn succeeding() -> Self {
        Self::new(SnapshotBehavior::Succeed {
            width: 200,
            height: 100,
        })
    }

    /// Snapshotter failing like an unreachable renderer.
    #[must_use]
    pub fn failing() -> Self {
        Self::new(SnapshotBehavior::Fail(SnapshotError::Renderer(
            "renderer unavailable".to_string(),
        )))
    }

    /// Snapshotter that never answers.
    #[must_use]
    pub fn hanging() -> Self {
        Self::new(SnapshotBehavior::Hang)
    }

    /// Number of snapshots requested so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TicketSnapshotter for MockSnapshotter {
    async fn snapshot(&self, _node: &StagedNode) -> Result<RgbImage, SnapshotError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            SnapshotBehavior::Succeed { width, height } => {
                Ok(RgbImage::from_pixel(*width, *height, Rgb([255, 255, 255])))
            },
            SnapshotBehavior::Fail(error) => Err(error.clone()),
            SnapshotBehavior::Hang => std::future::pending().await,
        }
    }
}
