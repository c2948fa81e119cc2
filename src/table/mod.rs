//! Controller boundary around the pure engine.
//!
//! This module implements:
//! - `TableService`: open/join/lookup, seat-token association, per-table
//!   mutation serialization, snapshot broadcast
//! - `SnapshotStore`: the persistence seam (in-memory implementation only;
//!   a relational backend is a deployment concern)
//! - `TableConfig`: table settings and validation
//!
//! ## Architecture
//!
//! The engine is synchronous and side-effect-free, so all temporal concerns
//! live here: each table's mutations run under a per-table mutex around the
//! load-apply-save cycle, preventing lost updates from concurrent
//! read-modify-write on the same table. Accepted snapshots are persisted
//! as-is and then published on a per-table watch channel.

pub mod config;
pub mod errors;
pub mod service;
pub mod store;

pub use config::TableConfig;
pub use errors::{ServiceError, ServiceResult, StoreError, StoreResult};
pub use service::{SeatToken, TableService};
pub use store::{InMemoryStore, SnapshotStore};
