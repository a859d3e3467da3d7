use crate::calendar::CalendarAxis;
use crate::normalize::NormalizedRecord;
use crate::schema::{GroupKey, Shift};
use indexmap::IndexMap;

/// One source's accumulated quantities for one group: a day-shift and a
/// night-shift array, each aligned 1:1 with the calendar axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftSeries {
    pub day: Vec<u64>,
    pub night: Vec<u64>,
}

impl ShiftSeries {
    pub fn zeroed(len: usize) -> Self {
        Self {
            day: vec![0; len],
            night: vec![0; len],
        }
    }

    pub fn total(&self) -> u64 {
        self.day.iter().sum::<u64>() + self.night.iter().sum::<u64>()
    }
}

/// Buckets one source's normalized records into per-group day/night series.
/// Groups appear in first-seen record order. Multiple records landing on the
/// same (group, day, shift) slot are summed, never overwritten.
pub fn aggregate(
    records: &[NormalizedRecord],
    axis: &CalendarAxis,
) -> IndexMap<GroupKey, ShiftSeries> {
    let mut groups: IndexMap<GroupKey, ShiftSeries> = IndexMap::new();

    for record in records {
        // Out-of-period dates were already excluded during normalization.
        let Some(day) = axis.day_index(record.date) else {
            continue;
        };

        let series = groups
            .entry(record.key.clone())
            .or_insert_with(|| ShiftSeries::zeroed(axis.len()));

        match record.shift {
            Shift::Day => series.day[day] += record.quantity,
            Shift::Night => series.night[day] += record.quantity,
        }
    }

    groups
}
