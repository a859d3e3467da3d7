use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical date pattern for records that are already in normalized form
/// (hand-entered data in the surrounding system is stored this way).
pub const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum Shift {
    #[schemars(description = "Day shift: the first half-day work period")]
    Day,

    #[schemars(description = "Night shift: the second half-day work period")]
    Night,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum Source {
    #[schemars(description = "Hand-entered production counts, curated by an operator")]
    Manual,

    #[schemars(description = "Counts exported from the production database")]
    Database,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ConsumptionRecord {
    #[schemars(
        description = "Raw date text, interpreted with the format pattern supplied for this record's batch. Day/month order is ambiguous without the pattern."
    )]
    pub date: String,

    #[schemars(description = "The half-day work period this quantity was recorded under")]
    pub shift: Shift,

    #[schemars(description = "Free-text head classification (e.g. 'PMR6 PIH', 'HFH TIGER 3')")]
    pub head_type: String,

    #[schemars(
        description = "Free-text surface classification, paired with head_type to identify one production line"
    )]
    pub head_surface: String,

    #[schemars(
        description = "Consumed count. Must be non-negative; negative records are rejected and reported."
    )]
    pub quantity: i64,
}

/// How head_type/head_surface strings are folded before two records are
/// considered the same group. The source data is not normalized at all, so
/// `Exact` reproduces its behavior; the other modes merge groups that differ
/// only in incidental formatting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum KeyNormalization {
    #[default]
    #[schemars(description = "Exact, case-sensitive string equality. No trimming or casing.")]
    Exact,

    #[schemars(description = "Leading/trailing whitespace is stripped before comparison")]
    Trimmed,

    #[schemars(
        description = "Whitespace is stripped and letters are lowercased before comparison"
    )]
    CaseInsensitive,
}

impl KeyNormalization {
    pub fn apply(&self, value: &str) -> String {
        match self {
            KeyNormalization::Exact => value.to_string(),
            KeyNormalization::Trimmed => value.trim().to_string(),
            KeyNormalization::CaseInsensitive => value.trim().to_lowercase(),
        }
    }
}

/// The (head_type, head_surface) pairing identifying one production line.
///
/// Serializes as its display form `"head_type (head_surface)"`, which is the
/// label the chart layer keys its series map by.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub head_type: String,
    pub head_surface: String,
}

impl GroupKey {
    pub fn new(head_type: impl Into<String>, head_surface: impl Into<String>) -> Self {
        Self {
            head_type: head_type.into(),
            head_surface: head_surface.into(),
        }
    }

    pub fn of(record: &ConsumptionRecord, normalization: KeyNormalization) -> Self {
        Self {
            head_type: normalization.apply(&record.head_type),
            head_surface: normalization.apply(&record.head_surface),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.head_type, self.head_surface)
    }
}

impl Serialize for GroupKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReconciliationRequest {
    #[schemars(description = "Target month, 1-12")]
    pub month: u32,

    #[schemars(description = "Target 4-digit year")]
    pub year: i32,

    #[serde(default = "default_manual_date_format")]
    #[schemars(
        description = "strftime-style pattern for manual record dates. Defaults to %Y-%m-%d, the canonical form hand-entered data arrives in."
    )]
    pub manual_date_format: String,

    #[schemars(
        description = "strftime-style pattern for database record dates (e.g. %d/%m/%Y). Required: exported dates are ambiguous text without it."
    )]
    pub database_date_format: String,

    #[serde(default)]
    #[schemars(description = "Group identity folding applied to head_type/head_surface")]
    pub key_normalization: KeyNormalization,

    #[schemars(description = "Hand-entered records, in original entry order")]
    pub manual_records: Vec<ConsumptionRecord>,

    #[schemars(description = "Database-exported records, in export order")]
    pub database_records: Vec<ConsumptionRecord>,
}

fn default_manual_date_format() -> String {
    CANONICAL_DATE_FORMAT.to_string()
}

impl ReconciliationRequest {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(ReconciliationRequest)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}
