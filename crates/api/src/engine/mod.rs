//! Catalog sync orchestration.
//!
//! The engine ties the provider clients to the encrypted settings store:
//! fetch fresh catalogs, reconcile them with the hotel's curated structure,
//! and persist the merge. Pure merge logic lives in `hotelhub_core::reconcile`;
//! this module owns the I/O around it.

mod sync;

pub use sync::{SyncEngine, SyncError};
