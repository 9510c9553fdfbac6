//! HTTP clients for the external provider APIs.
//!
//! [`client::CatalogClient`] is the seam the reconciliation engine works
//! against; [`pms::PmsClient`] implements it over the PMS REST API, and
//! [`reservations::ReservationsClient`] covers connection testing for the
//! reservations provider.

pub mod client;
pub mod error;
pub mod pms;
pub mod reservations;

pub use client::CatalogClient;
pub use error::ClientError;
