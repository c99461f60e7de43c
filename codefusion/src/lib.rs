//! # CodeFusion 2025 Registration Service
//!
//! Conference site for CodeFusion 2025: landing page with countdown and
//! schedule, registration form, and a downloadable, shareable ticket.
//!
//! ## Architecture
//!
//! Each UI component is a reducer run by a [`codefusion_runtime::Store`]:
//!
//! - **Registration form** ([`form`]): field changes, validation, submission
//!   through the [`notification::Notifier`], ticket issue and reveal
//! - **Ticket view** ([`export`]): PDF export through the
//!   [`export::TicketSnapshotter`] with a text fallback, sharing
//! - **Countdown** ([`countdown`]): one-second timer against the conference start
//! - **Schedule popup** ([`schedule`]): which day's programme is open
//!
//! The HTTP shell ([`server`], [`api`]) builds a store per request, replays
//! the browser's input as actions and maps the result to a response.
//!
//! ## Example
//!
//! ```ignore
//! use codefusion::{AppState, Config};
//!
//! let config = Config::from_env()?;
//! let state = AppState::new(notifier, snapshotter, clock, ids, config);
//! let app = codefusion::server::build_router(state);
//! ```

pub mod api;
pub mod config;
pub mod countdown;
pub mod error;
pub mod export;
pub mod form;
pub mod ids;
pub mod markup;
pub mod notification;
pub mod pages;
pub mod schedule;
pub mod server;
pub mod ticket;
pub mod validation;
pub mod widgets;

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

pub use config::Config;
pub use error::{ConfigError, ExportError, NotificationError, SnapshotError};
pub use server::{build_router, AppState};
