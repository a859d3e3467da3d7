use crate::assemble::ComparisonDataset;
use serde::Serialize;

/// Whole-month totals for one group, the figure shown on the overview cards.
/// Folded from the same zero-filled, axis-aligned arrays the day-level view
/// reads.
#[derive(Debug, Clone, Serialize)]
pub struct GroupSummary {
    pub head_type: String,
    pub head_surface: String,
    pub manual_total: u64,
    pub database_total: u64,
    pub delta: i64,
}

impl GroupSummary {
    pub fn is_matched(&self) -> bool {
        self.manual_total == self.database_total
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonSummary {
    pub year: i32,
    pub month: u32,
    pub groups: Vec<GroupSummary>,
}

impl ComparisonSummary {
    pub fn from_dataset(dataset: &ComparisonDataset) -> Self {
        let groups = dataset
            .groups
            .values()
            .map(|series| {
                let manual_total = series.manual_total();
                let database_total = series.database_total();
                GroupSummary {
                    head_type: series.head_type.clone(),
                    head_surface: series.head_surface.clone(),
                    manual_total,
                    database_total,
                    delta: manual_total as i64 - database_total as i64,
                }
            })
            .collect();

        Self {
            year: dataset.axis.year,
            month: dataset.axis.month,
            groups,
        }
    }

    pub fn total_groups(&self) -> usize {
        self.groups.len()
    }

    pub fn mismatched_groups(&self) -> Vec<&GroupSummary> {
        self.groups.iter().filter(|g| !g.is_matched()).collect()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_csv(&self) -> String {
        let mut output = String::new();
        output.push_str("Head Type,Head Surface,Manual Total,Database Total,Delta\n");

        for group in &self.groups {
            output.push_str(&format!(
                "{},{},{},{},{}\n",
                group.head_type,
                group.head_surface,
                group.manual_total,
                group.database_total,
                group.delta
            ));
        }

        output
    }

    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "# Consumption Comparison - {:02}/{:04}\n\n",
            self.month, self.year
        ));
        output.push_str(&format!("**Groups:** {}\n\n", self.total_groups()));

        for group in &self.groups {
            let mismatch_marker = if group.is_matched() {
                ""
            } else {
                " **[MISMATCH]**"
            };
            output.push_str(&format!(
                "- {} ({}): manual {} / database {}{}\n",
                group.head_type,
                group.head_surface,
                group.manual_total,
                group.database_total,
                mismatch_marker
            ));
        }
        output.push('\n');

        output
    }
}
