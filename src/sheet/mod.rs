//! Spreadsheet snapshot supplied by the add-in client
//!
//! The snapshot describes the workbook state at request time: selection,
//! headers, a sample of data rows, and sheet dimensions. The normalizer
//! validates model output against it, and the prompt builders render it
//! into model context. The core never mutates a snapshot.

use serde::{Deserialize, Serialize};

/// A single sampled cell value.
///
/// Sample rows arrive as plain JSON arrays, so values are untagged:
/// numbers, strings, or null for empty cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Bool(bool),
    Empty,
}

impl CellValue {
    /// Whether this value counts as numeric for column classification.
    ///
    /// Numbers always do; text does when, after dropping a leading `-`
    /// and any `.` characters, a non-empty all-digit string remains.
    pub fn is_numeric_like(&self) -> bool {
        match self {
            CellValue::Number(_) => true,
            CellValue::Text(s) => {
                let s = s.trim();
                let s = s.strip_prefix('-').unwrap_or(s);
                let digits: String = s.chars().filter(|c| *c != '.').collect();
                !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
            }
            CellValue::Bool(_) | CellValue::Empty => false,
        }
    }
}

/// Snapshot of spreadsheet state, as sent by the add-in.
///
/// Field names follow the client wire format (camelCase). Sample rows may
/// be shorter than the header row; missing trailing cells are simply
/// absent, not padded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SheetSnapshot {
    /// Currently selected range address, if any. The client sends the
    /// literal string "None" when nothing is selected.
    pub selected_range: Option<String>,
    pub sheet_name: Option<String>,
    /// Column headers, positionally aligned with sample-row cells.
    pub headers: Vec<String>,
    /// Sampled data rows. Row 0 is usually the header row repeated.
    pub data_sample: Vec<Vec<CellValue>>,
    pub row_count: u32,
    pub column_count: u32,
}

impl SheetSnapshot {
    /// Headers usable for field matching: trimmed, empty ones removed,
    /// order preserved. Built once per normalization pass and threaded
    /// through rather than recomputed.
    pub fn available_headers(&self) -> Vec<String> {
        self.headers
            .iter()
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .collect()
    }

    /// Headers whose sampled values are mostly numeric.
    ///
    /// A column qualifies when, among its sample values beyond the first
    /// row, strictly more than half are numeric-like. Needs at least two
    /// sample rows; the first row is assumed to repeat the headers.
    pub fn numeric_majority_columns(&self) -> Vec<String> {
        if self.data_sample.len() < 2 {
            return Vec::new();
        }

        let mut numeric = Vec::new();
        for (col_idx, header) in self.headers.iter().enumerate() {
            let values: Vec<&CellValue> = self
                .data_sample[1..]
                .iter()
                .filter_map(|row| row.get(col_idx))
                .collect();
            if values.is_empty() {
                continue;
            }
            let numeric_count = values.iter().filter(|v| v.is_numeric_like()).count();
            if numeric_count * 2 > values.len() {
                numeric.push(header.trim().to_string());
            }
        }
        numeric
    }

    /// Best-guess data range for chart creation.
    ///
    /// The selection wins when present and not the "None" sentinel;
    /// otherwise the range is synthesized from the sheet dimensions,
    /// anchored at A1.
    pub fn suggested_range(&self) -> String {
        if let Some(range) = &self.selected_range {
            let range = range.trim();
            if !range.is_empty() && range != "None" {
                return range.to_string();
            }
        }

        let last_col = column_letter(self.column_count.saturating_sub(1) as usize);
        let last_row = self.row_count.max(1);
        format!("A1:{}{}", last_col, last_row)
    }

    /// Render the snapshot as model-prompt context, in the same shape the
    /// original add-in backend serialized it.
    pub fn summary(&self) -> String {
        let mut s = String::new();

        s.push_str(&format!(
            "- Selected Range: {}\n",
            self.selected_range.as_deref().unwrap_or("None")
        ));
        s.push_str(&format!(
            "- Sheet Name: {}\n",
            self.sheet_name.as_deref().unwrap_or("Unknown")
        ));
        s.push_str(&format!(
            "- Column Headers: {}\n",
            serde_json::to_string(&self.headers).unwrap_or_default()
        ));

        let sample: Vec<&Vec<CellValue>> = self.data_sample.iter().take(5).collect();
        s.push_str(&format!(
            "- Data Sample: {}\n",
            serde_json::to_string(&sample).unwrap_or_default()
        ));
        s.push_str(&format!("- Number of Rows: {}\n", self.row_count));
        s.push_str(&format!("- Number of Columns: {}\n", self.column_count));

        s
    }
}

/// Spreadsheet column letter for a 0-based column index.
///
/// Bijective base-26: 0 -> A, 25 -> Z, 26 -> AA, 701 -> ZZ, 702 -> AAA.
pub fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push(b'A' + (n % 26) as u8);
        n /= 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_else(|_| "A".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_snapshot() -> SheetSnapshot {
        SheetSnapshot {
            selected_range: None,
            sheet_name: Some("Sheet1".into()),
            headers: vec!["Region".into(), "Sales".into()],
            data_sample: vec![
                vec![CellValue::Text("Region".into()), CellValue::Text("Sales".into())],
                vec![CellValue::Text("North".into()), CellValue::Number(100.0)],
                vec![CellValue::Text("South".into()), CellValue::Number(200.0)],
            ],
            row_count: 3,
            column_count: 2,
        }
    }

    #[test]
    fn test_column_letter_single() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(2), "C");
        assert_eq!(column_letter(25), "Z");
    }

    #[test]
    fn test_column_letter_multi() {
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(27), "AB");
        assert_eq!(column_letter(51), "AZ");
        assert_eq!(column_letter(52), "BA");
        assert_eq!(column_letter(701), "ZZ");
        assert_eq!(column_letter(702), "AAA");
    }

    #[test]
    fn test_numeric_like_values() {
        assert!(CellValue::Number(3.5).is_numeric_like());
        assert!(CellValue::Text("42".into()).is_numeric_like());
        assert!(CellValue::Text("-3.14".into()).is_numeric_like());
        assert!(!CellValue::Text("North".into()).is_numeric_like());
        assert!(!CellValue::Text("".into()).is_numeric_like());
        assert!(!CellValue::Bool(true).is_numeric_like());
        assert!(!CellValue::Empty.is_numeric_like());
    }

    #[test]
    fn test_numeric_majority_columns() {
        let snapshot = sample_snapshot();
        assert_eq!(snapshot.numeric_majority_columns(), vec!["Sales".to_string()]);
    }

    #[test]
    fn test_numeric_majority_needs_data_rows() {
        let mut snapshot = sample_snapshot();
        snapshot.data_sample.truncate(1);
        assert!(snapshot.numeric_majority_columns().is_empty());
    }

    #[test]
    fn test_available_headers_trims_and_drops_empty() {
        let snapshot = SheetSnapshot {
            headers: vec![" Region ".into(), "".into(), "Sales".into()],
            ..Default::default()
        };
        assert_eq!(
            snapshot.available_headers(),
            vec!["Region".to_string(), "Sales".to_string()]
        );
    }

    #[test]
    fn test_suggested_range_uses_selection() {
        let mut snapshot = sample_snapshot();
        snapshot.selected_range = Some("B2:D8".into());
        assert_eq!(snapshot.suggested_range(), "B2:D8");
    }

    #[test]
    fn test_suggested_range_ignores_none_sentinel() {
        let mut snapshot = sample_snapshot();
        snapshot.selected_range = Some("None".into());
        snapshot.column_count = 3;
        snapshot.row_count = 12;
        assert_eq!(snapshot.suggested_range(), "A1:C12");
    }

    #[test]
    fn test_suggested_range_wide_sheet() {
        let snapshot = SheetSnapshot {
            column_count: 28,
            row_count: 100,
            ..Default::default()
        };
        assert_eq!(snapshot.suggested_range(), "A1:AB100");
    }

    #[test]
    fn test_snapshot_deserializes_wire_format() {
        let json = r#"{
            "selectedRange": "A1:B3",
            "sheetName": "Sales",
            "headers": ["Region", "Sales"],
            "dataSample": [["Region", "Sales"], ["North", 100], ["South", null]],
            "rowCount": 3,
            "columnCount": 2
        }"#;
        let snapshot: SheetSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.selected_range.as_deref(), Some("A1:B3"));
        assert_eq!(snapshot.data_sample[2][1], CellValue::Empty);
        assert_eq!(snapshot.data_sample[1][1], CellValue::Number(100.0));
    }

    #[test]
    fn test_snapshot_accepts_boolean_cells() {
        let json = r#"{
            "headers": ["Name", "Active"],
            "dataSample": [["Name", "Active"], ["Ada", true], ["Grace", false]],
            "rowCount": 3,
            "columnCount": 2
        }"#;
        let snapshot: SheetSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.data_sample[1][1], CellValue::Bool(true));
        // Boolean columns are not numeric-majority.
        assert!(snapshot.numeric_majority_columns().is_empty());
    }

    #[test]
    fn test_summary_contains_context_fields() {
        let snapshot = sample_snapshot();
        let summary = snapshot.summary();
        assert!(summary.contains("Sheet1"));
        assert!(summary.contains("Region"));
        assert!(summary.contains("Number of Rows: 3"));
    }
}
