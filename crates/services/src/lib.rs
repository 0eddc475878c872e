pub mod orchestrator;
pub mod report;
pub mod retry;
pub mod store;

pub use orchestrator::JobOrchestrator;
pub use report::CombinedQualityReport;
pub use retry::RetryPolicy;
pub use store::{ResultStore, SheetsStore};
