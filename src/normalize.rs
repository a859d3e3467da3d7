use crate::calendar::CalendarAxis;
use crate::schema::{ConsumptionRecord, GroupKey, KeyNormalization, Shift, Source};
use chrono::NaiveDate;
use log::{debug, warn};
use serde::Serialize;
use thiserror::Error;

/// A record whose date has been resolved against the batch pattern and whose
/// quantity has passed validation. Only these reach the aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRecord {
    pub date: NaiveDate,
    pub shift: Shift,
    pub key: GroupKey,
    pub quantity: u64,
}

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    #[error("date '{raw}' does not match pattern '{pattern}': {detail}")]
    UnparseableDate {
        raw: String,
        pattern: String,
        detail: String,
    },

    #[error("negative quantity {quantity}")]
    NegativeQuantity { quantity: i64 },
}

/// Identity of one excluded record, surfaced to the operator alongside the
/// comparison dataset. `index` is the record's position within its batch.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedRecord {
    pub index: usize,
    pub source: Source,
    pub reason: SkipReason,
}

/// Parses raw date text with a strftime-style pattern. Patterns carrying
/// time-of-day fields parse too; the time is discarded.
pub fn normalize_date(
    raw: &str,
    pattern: &str,
) -> std::result::Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(raw.trim(), pattern)
}

/// Applies one date pattern to a whole batch. Unparseable dates and negative
/// quantities are skipped with diagnostics; records dated outside the axis
/// month belong to a different reporting period and are excluded without one.
pub fn normalize_batch(
    records: &[ConsumptionRecord],
    pattern: &str,
    source: Source,
    axis: &CalendarAxis,
    normalization: KeyNormalization,
) -> (Vec<NormalizedRecord>, Vec<SkippedRecord>) {
    let mut accepted = Vec::with_capacity(records.len());
    let mut skipped = Vec::new();

    for (index, record) in records.iter().enumerate() {
        let date = match normalize_date(&record.date, pattern) {
            Ok(date) => date,
            Err(err) => {
                warn!(
                    "Skipping {:?} record #{}: date '{}' does not match '{}': {}",
                    source, index, record.date, pattern, err
                );
                skipped.push(SkippedRecord {
                    index,
                    source,
                    reason: SkipReason::UnparseableDate {
                        raw: record.date.clone(),
                        pattern: pattern.to_string(),
                        detail: err.to_string(),
                    },
                });
                continue;
            }
        };

        if record.quantity < 0 {
            warn!(
                "Skipping {:?} record #{}: negative quantity {}",
                source, index, record.quantity
            );
            skipped.push(SkippedRecord {
                index,
                source,
                reason: SkipReason::NegativeQuantity {
                    quantity: record.quantity,
                },
            });
            continue;
        }

        if axis.day_index(date).is_none() {
            debug!(
                "Excluding {:?} record #{}: {} is outside {:04}-{:02}",
                source, index, date, axis.year, axis.month
            );
            continue;
        }

        accepted.push(NormalizedRecord {
            date,
            shift: record.shift,
            key: GroupKey::of(record, normalization),
            quantity: record.quantity as u64,
        });
    }

    (accepted, skipped)
}
