//! # cclog-core
//!
//! Core library for cclog - incremental change log tracking across load rules.
//!
//! This crate provides the change entry model, the per load rule watermark
//! state, the reconciliation pass that separates new changes from ones an
//! earlier build already saw, and XML persistence of change logs.

pub mod changelog;
pub mod error;
pub mod models;
pub mod ordering;
pub mod reconcile;
pub mod state;

pub use changelog::ChangeLogCodec;
pub use error::{Error, Result};
pub use models::{ChangeEntry, ChangeLog, LoadRuleWatermarks};
pub use ordering::{DateOrder, SortOrder};
pub use reconcile::{latest_watermarks, reconcile, remove_stale_entries, ReconcileOutcome};
pub use state::WatermarkStore;
