//! # FlowLog Core
//!
//! Board view model and reconciliation client for FlowLog kanban boards.
//!
//! The [`domain`] module holds the client's snapshot of a board (lists of
//! cards with labels, members and checklists) and the pure reorder
//! transforms. [`session::BoardSession`] applies drag-and-drop moves to that
//! snapshot immediately and persists them through a [`api::BoardApi`] in the
//! background, without rolling back on failure.

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod reconcile;
pub mod session;

// Re-export commonly used types
pub use api::{BoardApi, HttpBoardApi, MemoryBoardApi};
pub use auth::SessionToken;
pub use config::ClientConfig;
pub use domain::{
    board::{Background, Board},
    card::Card,
    ids::{BoardId, CardId, ListId},
    list::List,
};
pub use error::{FlowlogError, Result};
pub use reconcile::Reconciler;
pub use session::{BoardSession, DragKind, DragPhase, PersistHandle, PersistOutcome};
