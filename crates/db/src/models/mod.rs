//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - Narrow update DTOs for the fields that actually change

pub mod dashboard;
pub mod quota;
pub mod scan_request;
pub mod scan_result;
pub mod takedown;
pub mod user;
