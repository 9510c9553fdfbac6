//! Domain types and pure logic for the HotelHub integrations backend.
//!
//! This crate is the dependency root of the workspace: it defines the
//! catalog data model, the settings vault, and the catalog reconciliation
//! algorithm, with no knowledge of the database or HTTP layers.

pub mod catalog;
pub mod error;
pub mod reconcile;
pub mod types;
pub mod vault;
