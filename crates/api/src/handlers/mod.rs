pub mod dashboard;
pub mod dmca_templates;
pub mod scan_requests;
pub mod takedowns;
pub mod users;
