//! Mock collaborators for tests.
//!
//! In-memory stand-ins for the notification and snapshot collaborators.

pub mod notifier;
pub mod snapshotter;

pub use notifier::MockNotifier;
pub use snapshotter::{MockSnapshotter, SnapshotBehavior};
