use crate::error::{ReconError, Result};
use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

/// The full, gap-free sequence of days in one target month. Every series in
/// a comparison dataset is aligned 1:1 with this axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarAxis {
    pub year: i32,
    pub month: u32,
    pub days: Vec<NaiveDate>,
}

impl CalendarAxis {
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Zero-based position of a date on this axis, or None when the date
    /// belongs to a different month/year.
    pub fn day_index(&self, date: NaiveDate) -> Option<usize> {
        if date.year() == self.year && date.month() == self.month {
            Some(date.day() as usize - 1)
        } else {
            None
        }
    }

    /// Day labels in the dd-mm-YYYY form the chart layer renders.
    pub fn labels(&self) -> Vec<String> {
        self.days
            .iter()
            .map(|d| d.format("%d-%m-%Y").to_string())
            .collect()
    }
}

pub fn build_axis(year: i32, month: u32) -> Result<CalendarAxis> {
    if !(1..=12).contains(&month) {
        return Err(ReconError::InvalidMonth(month));
    }
    if !(1000..=9999).contains(&year) {
        return Err(ReconError::InvalidYear(year));
    }

    let days = (1..=days_in_month(year, month))
        .map(|day| NaiveDate::from_ymd_opt(year, month, day).unwrap())
        .collect();

    Ok(CalendarAxis { year, month, days })
}

pub fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap()
        .checked_sub_days(Days::new(1))
        .unwrap()
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    last_day_of_month(year, month).day()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_length_accounts_for_leap_years() {
        assert_eq!(build_axis(2024, 2).unwrap().len(), 29);
        assert_eq!(build_axis(2023, 2).unwrap().len(), 28);
        assert_eq!(build_axis(2024, 4).unwrap().len(), 30);
        assert_eq!(build_axis(2024, 3).unwrap().len(), 31);
    }

    #[test]
    fn test_axis_starts_at_day_one_and_is_increasing() {
        let axis = build_axis(2024, 3).unwrap();
        assert_eq!(axis.days[0], NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert!(axis.days.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_invalid_period_is_rejected() {
        assert!(matches!(
            build_axis(2024, 0),
            Err(ReconError::InvalidMonth(0))
        ));
        assert!(matches!(
            build_axis(2024, 13),
            Err(ReconError::InvalidMonth(13))
        ));
        assert!(matches!(build_axis(24, 3), Err(ReconError::InvalidYear(24))));
    }

    #[test]
    fn test_day_index() {
        let axis = build_axis(2024, 3).unwrap();
        assert_eq!(
            axis.day_index(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()),
            Some(4)
        );
        assert_eq!(
            axis.day_index(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()),
            Some(30)
        );
        assert_eq!(
            axis.day_index(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()),
            None
        );
        assert_eq!(
            axis.day_index(NaiveDate::from_ymd_opt(2023, 3, 5).unwrap()),
            None
        );
    }

    #[test]
    fn test_labels_use_day_first_form() {
        let axis = build_axis(2024, 3).unwrap();
        let labels = axis.labels();
        assert_eq!(labels.len(), 31);
        assert_eq!(labels[0], "01-03-2024");
        assert_eq!(labels[30], "31-03-2024");
    }

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(
            last_day_of_month(2023, 2),
            NaiveDate::from_ymd_opt(2023, 2, 28).unwrap()
        );
        assert_eq!(
            last_day_of_month(2024, 2),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_eq!(
            last_day_of_month(2023, 12),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()
        );
    }
}
