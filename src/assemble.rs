use crate::aggregate::ShiftSeries;
use crate::calendar::CalendarAxis;
use crate::error::Result;
use crate::schema::{GroupKey, Shift};
use indexmap::IndexMap;
use serde::Serialize;

/// Classification of one (group, day) or (group, day, shift) slot, computed
/// on read for mismatch highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub enum DayStatus {
    /// Manual and database agree on a non-zero quantity.
    Match,
    /// Neither source recorded anything.
    Zero,
    /// The sources disagree.
    Mismatch,
}

/// All four quantity series for one group, each aligned 1:1 with the
/// calendar axis and zero-filled where a source recorded nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSeries {
    pub head_type: String,
    pub head_surface: String,
    pub manual_day_qty: Vec<u64>,
    pub manual_night_qty: Vec<u64>,
    pub database_day_qty: Vec<u64>,
    pub database_night_qty: Vec<u64>,
}

impl GroupSeries {
    fn zeroed(key: &GroupKey, len: usize) -> Self {
        Self {
            head_type: key.head_type.clone(),
            head_surface: key.head_surface.clone(),
            manual_day_qty: vec![0; len],
            manual_night_qty: vec![0; len],
            database_day_qty: vec![0; len],
            database_night_qty: vec![0; len],
        }
    }

    /// Day+night manual quantity for one calendar day.
    pub fn manual_qty(&self, day: usize) -> u64 {
        self.manual_day_qty[day] + self.manual_night_qty[day]
    }

    /// Day+night database quantity for one calendar day.
    pub fn database_qty(&self, day: usize) -> u64 {
        self.database_day_qty[day] + self.database_night_qty[day]
    }

    pub fn manual_qty_series(&self) -> Vec<u64> {
        (0..self.manual_day_qty.len())
            .map(|day| self.manual_qty(day))
            .collect()
    }

    pub fn database_qty_series(&self) -> Vec<u64> {
        (0..self.database_day_qty.len())
            .map(|day| self.database_qty(day))
            .collect()
    }

    pub fn manual_total(&self) -> u64 {
        self.manual_day_qty.iter().sum::<u64>() + self.manual_night_qty.iter().sum::<u64>()
    }

    pub fn database_total(&self) -> u64 {
        self.database_day_qty.iter().sum::<u64>() + self.database_night_qty.iter().sum::<u64>()
    }

    pub fn day_status(&self, day: usize) -> DayStatus {
        classify(self.manual_qty(day), self.database_qty(day))
    }

    pub fn shift_status(&self, day: usize, shift: Shift) -> DayStatus {
        match shift {
            Shift::Day => classify(self.manual_day_qty[day], self.database_day_qty[day]),
            Shift::Night => classify(self.manual_night_qty[day], self.database_night_qty[day]),
        }
    }
}

fn classify(manual: u64, database: u64) -> DayStatus {
    if manual != database {
        DayStatus::Mismatch
    } else if manual == 0 {
        DayStatus::Zero
    } else {
        DayStatus::Match
    }
}

/// The comparison output: one calendar axis plus an ordered map of group
/// series. Group order is first-seen across the combined input, manual
/// records before database records.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonDataset {
    pub axis: CalendarAxis,
    pub groups: IndexMap<GroupKey, GroupSeries>,
}

impl ComparisonDataset {
    pub fn group(&self, head_type: &str, head_surface: &str) -> Option<&GroupSeries> {
        self.groups.get(&GroupKey::new(head_type, head_surface))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Merges the two source aggregates over one axis. A group present in only
/// one source still gets a full `GroupSeries` with the other source's arrays
/// zero-filled; all four arrays exist and are axis-length for every group.
pub fn assemble(
    axis: CalendarAxis,
    manual: IndexMap<GroupKey, ShiftSeries>,
    database: IndexMap<GroupKey, ShiftSeries>,
) -> ComparisonDataset {
    let len = axis.len();
    let mut groups: IndexMap<GroupKey, GroupSeries> = IndexMap::new();

    for (key, series) in manual {
        let group = groups
            .entry(key.clone())
            .or_insert_with(|| GroupSeries::zeroed(&key, len));
        group.manual_day_qty = series.day;
        group.manual_night_qty = series.night;
    }

    for (key, series) in database {
        let group = groups
            .entry(key.clone())
            .or_insert_with(|| GroupSeries::zeroed(&key, len));
        group.database_day_qty = series.day;
        group.database_night_qty = series.night;
    }

    ComparisonDataset { axis, groups }
}
