use crate::assemble::ComparisonDataset;
use crate::error::{ReconError, Result};
use crate::normalize::NormalizedRecord;
use crate::schema::Source;

/// Checks that no accepted quantity was lost or double-counted on the way
/// into the dataset: for each source, the fold over every group series must
/// equal the sum of that source's accepted normalized records.
pub fn verify_conservation(
    dataset: &ComparisonDataset,
    manual: &[NormalizedRecord],
    database: &[NormalizedRecord],
) -> Result<()> {
    check_source(dataset, Source::Manual, manual)?;
    check_source(dataset, Source::Database, database)?;
    Ok(())
}

fn check_source(
    dataset: &ComparisonDataset,
    source: Source,
    records: &[NormalizedRecord],
) -> Result<()> {
    let expected: u64 = records.iter().map(|r| r.quantity).sum();
    let actual: u64 = dataset
        .groups
        .values()
        .map(|group| match source {
            Source::Manual => group.manual_total(),
            Source::Database => group.database_total(),
        })
        .sum();

    if expected != actual {
        return Err(ReconError::ConservationViolation {
            origin: source,
            expected,
            actual,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::assemble::assemble;
    use crate::calendar::build_axis;
    use crate::schema::{GroupKey, Shift};
    use chrono::NaiveDate;

    fn record(day: u32, quantity: u64) -> NormalizedRecord {
        NormalizedRecord {
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            shift: Shift::Day,
            key: GroupKey::new("FEMTO", "Top"),
            quantity,
        }
    }

    #[test]
    fn test_conservation_holds_for_aggregated_data() {
        let axis = build_axis(2024, 3).unwrap();
        let manual = vec![record(1, 3), record(1, 2), record(20, 7)];
        let database = vec![record(5, 4)];

        let manual_groups = aggregate(&manual, &axis);
        let database_groups = aggregate(&database, &axis);
        let dataset = assemble(axis, manual_groups, database_groups);

        assert!(verify_conservation(&dataset, &manual, &database).is_ok());
    }

    #[test]
    fn test_conservation_violation_is_reported() {
        let axis = build_axis(2024, 3).unwrap();
        let manual = vec![record(1, 3)];

        let manual_groups = aggregate(&manual, &axis);
        let dataset = assemble(axis, manual_groups, indexmap::IndexMap::new());

        // Claim more input than the dataset holds.
        let overstated = vec![record(1, 3), record(2, 5)];
        let err = verify_conservation(&dataset, &overstated, &[]).unwrap_err();

        match err {
            ReconError::ConservationViolation {
                origin,
                expected,
                actual,
            } => {
                assert_eq!(origin, Source::Manual);
                assert_eq!(expected, 8);
                assert_eq!(actual, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
