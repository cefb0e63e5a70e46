//! Domain vocabulary for the Guardian content-protection service.
//!
//! Nothing in this crate performs I/O. The database and API crates build on
//! these types and validation helpers.

pub mod dmca;
pub mod error;
pub mod plan;
pub mod platform;
pub mod scan_request;
pub mod takedown;
pub mod types;
