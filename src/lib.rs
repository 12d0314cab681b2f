//! Vendor debt write-off posting.
//!
//! [`poster::WriteOffPoster`] posts a single write-off against a vendor's
//! outstanding balance; [`batch::BatchPoster`] runs an ordered list of them with
//! per-item failure isolation. Persistence is abstracted behind the traits in
//! [`domain::traits`]; [`memory_store::InMemoryStore`] implements them.

pub mod batch;
pub mod config;
pub mod domain;
pub mod ingestion;
pub mod memory_store;
pub mod output;
pub mod poster;
pub mod reconcile;
pub mod telemetry;
