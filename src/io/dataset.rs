//! Session-wide enriched dataset.
//!
//! Loaded once, derived once and then shared read-only by every filter and
//! dashboard rebuild.

use super::csv_loader::{load_raw_records, DataSource, LoadError};
use crate::features::derive_all;
use crate::filtering::FilterOptions;
use crate::models::{EnrichedRecord, RawRecord};
use std::sync::Arc;
use tracing::info;

/// Immutable handle to the enriched records of one session.
///
/// Cloning is cheap and shares the same records.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    source: Option<String>,
    records: Arc<[EnrichedRecord]>,
}

impl Dataset {
    /// Derive features for already parsed rows.
    pub fn from_raw(raws: Vec<RawRecord>) -> Self {
        Self {
            source: None,
            records: derive_all(raws).into(),
        }
    }

    /// Load rows from `source` and derive features for all of them.
    pub async fn load(source: &DataSource) -> Result<Self, LoadError> {
        let raws = load_raw_records(source).await?;
        let dataset = Self::from_raw(raws).with_source(source.to_string());

        let unparsed = dataset.records.iter().filter(|r| !r.has_timestamp()).count();
        info!(
            posts = dataset.len(),
            unparsed_timestamps = unparsed,
            "✅ Dataset ready"
        );
        Ok(dataset)
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Location the records were loaded from, if any.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn records(&self) -> &[EnrichedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct years and sources available for selection.
    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions::from_records(&self.records)
    }
}
