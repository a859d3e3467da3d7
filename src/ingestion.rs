use crate::schema::{ConsumptionRecord, Shift};
use log::warn;
use serde::{Deserialize, Serialize};

/// One pre-extracted spreadsheet export row, cells still in raw text form.
/// Reading the workbook itself is the surrounding shell's job; this module
/// only turns its cell values into engine records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawExportRow {
    pub date: String,
    pub shift_code: String,
    pub product: String,
    pub surface: String,
    pub quantity: String,
}

/// Maps free-text product descriptions onto a canonical (head_type,
/// head_surface) pair by case-insensitive substring match. When
/// `head_surface` is None the surface cell decides it instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationRule {
    pub keyword: String,
    pub head_type: String,
    pub head_surface: Option<String>,
}

/// A row that could not be converted, reported back to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct RejectedRow {
    pub index: usize,
    pub detail: String,
}

/// The product classifications the production exports have historically
/// carried. Callers with newer line names pass their own table.
pub fn default_classification_rules() -> Vec<ClassificationRule> {
    vec![
        ClassificationRule {
            keyword: "pmr".to_string(),
            head_type: "PMR6 PIH".to_string(),
            head_surface: None,
        },
        ClassificationRule {
            keyword: "06pt4e".to_string(),
            head_type: "DFH".to_string(),
            head_surface: None,
        },
        ClassificationRule {
            keyword: "tiger".to_string(),
            head_type: "HFH TIGER 3".to_string(),
            head_surface: None,
        },
        ClassificationRule {
            keyword: "3122".to_string(),
            head_type: "AHEAD - TEK".to_string(),
            head_surface: Some("3122".to_string()),
        },
        ClassificationRule {
            keyword: "(burnish)".to_string(),
            head_type: "AHEAD - TEK".to_string(),
            head_surface: Some("3125".to_string()),
        },
    ]
}

/// Normalizes a raw date cell. The exports mix `-` and `/` separators within
/// one sheet; both are read as `/` so a single slash pattern covers them.
pub fn clean_date_cell(raw: &str) -> String {
    raw.trim().replace('-', "/")
}

/// Converts export rows into consumption records. Rows whose shift or
/// quantity cells cannot be read are rejected with a reason; date text is
/// passed through (cleaned) for the normalizer to interpret against the
/// caller's pattern.
pub fn convert_export_rows(
    rows: &[RawExportRow],
    rules: &[ClassificationRule],
) -> (Vec<ConsumptionRecord>, Vec<RejectedRow>) {
    let mut records = Vec::with_capacity(rows.len());
    let mut rejected = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        let shift = match row.shift_code.trim().to_lowercase().as_str() {
            "d" => Shift::Day,
            "n" => Shift::Night,
            other => {
                warn!("Rejecting export row #{}: unknown shift code '{}'", index, other);
                rejected.push(RejectedRow {
                    index,
                    detail: format!("unknown shift code '{}'", row.shift_code.trim()),
                });
                continue;
            }
        };

        let quantity: i64 = match row.quantity.trim().parse() {
            Ok(quantity) => quantity,
            Err(_) => {
                warn!(
                    "Rejecting export row #{}: unreadable quantity '{}'",
                    index, row.quantity
                );
                rejected.push(RejectedRow {
                    index,
                    detail: format!("unreadable quantity '{}'", row.quantity.trim()),
                });
                continue;
            }
        };

        let (head_type, head_surface) = classify(&row.product, &row.surface, rules);

        records.push(ConsumptionRecord {
            date: clean_date_cell(&row.date),
            shift,
            head_type,
            head_surface,
            quantity,
        });
    }

    (records, rejected)
}

fn classify(product: &str, surface: &str, rules: &[ClassificationRule]) -> (String, String) {
    let product_lower = product.to_lowercase();

    for rule in rules {
        if product_lower.contains(&rule.keyword.to_lowercase()) {
            let head_surface = rule
                .head_surface
                .clone()
                .unwrap_or_else(|| resolve_surface(surface));
            return (rule.head_type.clone(), head_surface);
        }
    }

    (product.trim().to_string(), resolve_surface(surface))
}

fn resolve_surface(cell: &str) -> String {
    let lower = cell.to_lowercase();
    if lower.contains("bot") {
        "Bot".to_string()
    } else if lower.contains("top") {
        "Top".to_string()
    } else {
        cell.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: &str, shift_code: &str, product: &str, surface: &str, quantity: &str) -> RawExportRow {
        RawExportRow {
            date: date.to_string(),
            shift_code: shift_code.to_string(),
            product: product.to_string(),
            surface: surface.to_string(),
            quantity: quantity.to_string(),
        }
    }

    #[test]
    fn test_convert_maps_shift_codes_case_insensitively() {
        let rows = vec![
            row("05/03/2024", "D", "PMR head", "bottom", "4"),
            row("05/03/2024", "n", "PMR head", "bottom", "2"),
        ];

        let (records, rejected) = convert_export_rows(&rows, &default_classification_rules());

        assert!(rejected.is_empty());
        assert_eq!(records[0].shift, Shift::Day);
        assert_eq!(records[1].shift, Shift::Night);
    }

    #[test]
    fn test_convert_rejects_unreadable_rows_with_reasons() {
        let rows = vec![
            row("05/03/2024", "x", "PMR head", "bottom", "4"),
            row("05/03/2024", "d", "PMR head", "bottom", "four"),
            row("05/03/2024", "d", "PMR head", "bottom", "4"),
        ];

        let (records, rejected) = convert_export_rows(&rows, &default_classification_rules());

        assert_eq!(records.len(), 1);
        assert_eq!(rejected.len(), 2);
        assert_eq!(rejected[0].index, 0);
        assert!(rejected[0].detail.contains("shift code"));
        assert_eq!(rejected[1].index, 1);
        assert!(rejected[1].detail.contains("quantity"));
    }

    #[test]
    fn test_classification_rules_resolve_type_and_surface() {
        let rules = default_classification_rules();

        let rows = vec![
            row("05/03/2024", "d", "Writer 3122 rev B", "ignored", "1"),
            row("05/03/2024", "d", "TIGER line", "Top side", "1"),
            row("05/03/2024", "d", "unmapped product", "bottom", "1"),
        ];

        let (records, _) = convert_export_rows(&rows, &rules);

        assert_eq!(records[0].head_type, "AHEAD - TEK");
        assert_eq!(records[0].head_surface, "3122");
        assert_eq!(records[1].head_type, "HFH TIGER 3");
        assert_eq!(records[1].head_surface, "Top");
        assert_eq!(records[2].head_type, "unmapped product");
        assert_eq!(records[2].head_surface, "Bot");
    }

    #[test]
    fn test_date_cells_read_dashes_as_slashes() {
        assert_eq!(clean_date_cell(" 05-03-2024 "), "05/03/2024");
        assert_eq!(clean_date_cell("05/03/2024"), "05/03/2024");

        let rows = vec![row("05-03-2024", "d", "PMR", "top", "1")];
        let (records, _) = convert_export_rows(&rows, &default_classification_rules());
        assert_eq!(records[0].date, "05/03/2024");
    }
}
