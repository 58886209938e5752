pub mod address;
pub mod coordinate;
pub mod report;

pub use address::AddressComponents;
pub use coordinate::Coordinate;
pub use report::{Category, NewReport, NewReportRequest, Report, ReportRow, ReportStatus};
