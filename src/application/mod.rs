//! Application layer: record loading and services
//!
//! This layer orchestrates domain logic and owns all file I/O.

pub mod error;
pub mod error_ext;
pub mod records;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use records::{load_records, parse_records, StringRecord};
