//! # Consumption Recon
//!
//! A library for reconciling manually recorded production consumption counts
//! against counts exported from a database, producing a calendar-aligned
//! comparison dataset for one target month.
//!
//! ## Core Concepts
//!
//! - **Record**: one dated, shift-tagged consumption count from either source
//! - **Group**: the (head_type, head_surface) pairing identifying one production line
//! - **Calendar Axis**: the gap-free day sequence of the target month that every
//!   series aligns to, whether or not a day has data
//! - **Comparison Dataset**: per group, four zero-filled series (manual/database
//!   × day/night shift) plus derived day totals, for mismatch highlighting
//! - **Skip Diagnostics**: records with unparseable dates or negative quantities
//!   are excluded and reported, never silently dropped and never fatal
//!
//! ## Example
//!
//! ```rust,ignore
//! use consumption_recon::*;
//!
//! let request = ReconciliationRequest {
//!     month: 3,
//!     year: 2024,
//!     manual_date_format: "%Y-%m-%d".to_string(),
//!     database_date_format: "%d/%m/%Y".to_string(),
//!     key_normalization: KeyNormalization::Exact,
//!     manual_records: vec![ConsumptionRecord {
//!         date: "2024-03-05".to_string(),
//!         shift: Shift::Day,
//!         head_type: "FEMTO".to_string(),
//!         head_surface: "Top".to_string(),
//!         quantity: 10,
//!     }],
//!     database_records: vec![ConsumptionRecord {
//!         date: "05/03/2024".to_string(),
//!         shift: Shift::Day,
//!         head_type: "FEMTO".to_string(),
//!         head_surface: "Top".to_string(),
//!         quantity: 8,
//!     }],
//! };
//!
//! let outcome = build_comparison(&request).unwrap();
//! let group = outcome.dataset.group("FEMTO", "Top").unwrap();
//! assert_eq!(group.manual_day_qty[4], 10);
//! assert_eq!(group.database_day_qty[4], 8);
//! ```

pub mod aggregate;
pub mod assemble;
pub mod calendar;
pub mod error;
pub mod ingestion;
pub mod normalize;
pub mod schema;
pub mod summary;
pub mod verify;

pub use aggregate::{aggregate, ShiftSeries};
pub use assemble::{assemble, ComparisonDataset, DayStatus, GroupSeries};
pub use calendar::{build_axis, days_in_month, last_day_of_month, CalendarAxis};
pub use error::{ReconError, Result};
pub use ingestion::*;
pub use normalize::{
    normalize_batch, normalize_date, NormalizedRecord, SkipReason, SkippedRecord,
};
pub use schema::*;
pub use summary::{ComparisonSummary, GroupSummary};
pub use verify::verify_conservation;

use log::{debug, info};
use serde::Serialize;

/// The comparison dataset together with its skip diagnostics. Callers are
/// expected to disclose the skip count to the operator on partial success
/// rather than presenting the dataset as complete.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonOutcome {
    pub dataset: ComparisonDataset,
    pub skipped: Vec<SkippedRecord>,
    pub manual_record_count: usize,
    pub database_record_count: usize,
}

impl ComparisonOutcome {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn skipped_for(&self, source: Source) -> Vec<&SkippedRecord> {
        self.skipped.iter().filter(|s| s.source == source).collect()
    }

    /// True when a non-empty batch lost every record to date parsing, i.e.
    /// the supplied pattern disagrees with the whole export rather than a
    /// few stray rows. Callers surface this as "wrong format" instead of
    /// "N rows skipped".
    pub fn wholesale_format_mismatch(&self, source: Source) -> bool {
        let total = match source {
            Source::Manual => self.manual_record_count,
            Source::Database => self.database_record_count,
        };
        if total == 0 {
            return false;
        }

        let unparseable = self
            .skipped
            .iter()
            .filter(|s| {
                s.source == source && matches!(s.reason, SkipReason::UnparseableDate { .. })
            })
            .count();

        unparseable == total
    }
}

pub struct ReconciliationProcessor;

impl ReconciliationProcessor {
    pub fn process(request: &ReconciliationRequest) -> Result<ComparisonOutcome> {
        Ok(Self::run(request)?.0)
    }

    pub fn process_with_verification(
        request: &ReconciliationRequest,
    ) -> Result<ComparisonOutcome> {
        let (outcome, manual, database) = Self::run(request)?;
        verify_conservation(&outcome.dataset, &manual, &database)?;
        Ok(outcome)
    }

    fn run(
        request: &ReconciliationRequest,
    ) -> Result<(ComparisonOutcome, Vec<NormalizedRecord>, Vec<NormalizedRecord>)> {
        let axis = build_axis(request.year, request.month)?;

        info!(
            "Reconciling consumption for {:04}-{:02}",
            request.year, request.month
        );
        debug!(
            "Input contains {} manual and {} database records",
            request.manual_records.len(),
            request.database_records.len()
        );

        let (manual, mut skipped) = normalize_batch(
            &request.manual_records,
            &request.manual_date_format,
            Source::Manual,
            &axis,
            request.key_normalization,
        );
        let (database, skipped_database) = normalize_batch(
            &request.database_records,
            &request.database_date_format,
            Source::Database,
            &axis,
            request.key_normalization,
        );
        skipped.extend(skipped_database);

        if !skipped.is_empty() {
            debug!("Skipped {} records during normalization", skipped.len());
        }

        let manual_groups = aggregate(&manual, &axis);
        let database_groups = aggregate(&database, &axis);
        let dataset = assemble(axis, manual_groups, database_groups);

        debug!("Produced {} comparison groups", dataset.groups.len());

        let outcome = ComparisonOutcome {
            dataset,
            skipped,
            manual_record_count: request.manual_records.len(),
            database_record_count: request.database_records.len(),
        };

        Ok((outcome, manual, database))
    }
}

pub fn build_comparison(request: &ReconciliationRequest) -> Result<ComparisonOutcome> {
    ReconciliationProcessor::process(request)
}

pub fn build_comparison_with_verification(
    request: &ReconciliationRequest,
) -> Result<ComparisonOutcome> {
    ReconciliationProcessor::process_with_verification(request)
}
