//! Dataset input.
//!
//! This module reads the CSV export from a file or URL and turns it into the
//! shared [`Dataset`] the dashboard works on.

pub mod csv_loader;
pub mod dataset;

// Re-export commonly used types and functions
pub use csv_loader::{load_raw_records, parse_csv, DataSource, LoadError, REQUIRED_COLUMNS};
pub use dataset::Dataset;
