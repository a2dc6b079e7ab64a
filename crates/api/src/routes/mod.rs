pub mod dashboard;
pub mod snapshot;
