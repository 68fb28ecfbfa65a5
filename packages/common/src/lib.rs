pub mod csv;
pub mod error;
pub mod expiry;
pub mod report;

pub use error::DomainError;
pub use expiry::{ExpiryStatus, classify};
pub use report::{AnnotatedProduct, ExpirySummary, Product, ReportWindow};
