//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod dashboard_repo;
pub mod scan_request_repo;
pub mod scan_result_repo;
pub mod takedown_repo;
pub mod user_repo;

pub use dashboard_repo::DashboardRepo;
pub use scan_request_repo::ScanRequestRepo;
pub use scan_result_repo::ScanResultRepo;
pub use takedown_repo::TakedownRepo;
pub use user_repo::UserRepo;
