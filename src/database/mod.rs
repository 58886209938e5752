pub mod report_repo;
pub mod report_store;
pub mod schema;
pub mod vote_repo;

pub use report_store::SqliteReportStore;
