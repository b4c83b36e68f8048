//! Spreadsheet workbook blobs stored in a post's `excelData`.
//!
//! The workbook document belongs to the third-party widget. This module only
//! reads and writes the cell-value table of a sheet
//! (`sheets.<name>.data.dataTable.<row>.<col>.value`), which is what CSV import
//! and export need. Everything else in the document is carried along untouched.

use serde_json::{json, Map, Number, Value};
use thiserror::Error;

/// Bounds for turning a sparse cell table into a dense grid.
pub const MAX_GRID_ROWS: usize = 10_000;
pub const MAX_GRID_COLS: usize = 256;

#[derive(Debug, Error)]
pub enum SpreadsheetError {
    #[error("workbook data must be a JSON object")]
    NotAnObject,
    #[error("workbook data is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV file contains no cells")]
    EmptyCsv,
    #[error("failed to write CSV: {0}")]
    Write(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Workbook {
    doc: Map<String, Value>,
}

impl Workbook {
    /// Wrap a widget document.
    ///
    /// # Errors
    ///
    /// Returns [`SpreadsheetError::NotAnObject`] for anything but a JSON object.
    pub fn from_value(value: Value) -> Result<Self, SpreadsheetError> {
        match value {
            Value::Object(doc) => Ok(Self { doc }),
            _ => Err(SpreadsheetError::NotAnObject),
        }
    }

    /// Parse a widget document from JSON text, as posted by the editor.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not JSON or not an object.
    pub fn parse(text: &str) -> Result<Self, SpreadsheetError> {
        Self::from_value(serde_json::from_str(text)?)
    }

    /// Build a single-sheet workbook from CSV bytes.
    ///
    /// Numeric cells become numbers, empty cells are left out.
    ///
    /// # Errors
    ///
    /// Returns an error if the CSV cannot be read or has no non-empty cell.
    pub fn from_csv(bytes: &[u8], sheet_name: &str) -> Result<Self, SpreadsheetError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes);

        let mut table = Map::new();
        let mut row_count = 0usize;
        let mut column_count = 0usize;

        for (row_idx, record) in reader.records().enumerate() {
            let record = record?;
            let mut row = Map::new();
            for (col_idx, field) in record.iter().enumerate() {
                if field.is_empty() {
                    continue;
                }
                row.insert(col_idx.to_string(), json!({ "value": csv_cell_value(field) }));
                column_count = column_count.max(col_idx + 1);
            }
            if !row.is_empty() {
                table.insert(row_idx.to_string(), Value::Object(row));
                row_count = row_idx + 1;
            }
        }

        if table.is_empty() {
            return Err(SpreadsheetError::EmptyCsv);
        }

        let sheet = json!({
            "name": sheet_name,
            "index": 0,
            "rowCount": row_count,
            "columnCount": column_count,
            "data": { "dataTable": table }
        });
        let mut sheets = Map::new();
        sheets.insert(sheet_name.to_string(), sheet);

        Self::from_value(json!({
            "sheetCount": 1,
            "activeSheetIndex": 0,
            "sheets": sheets
        }))
    }

    /// Name and body of the sheet the widget shows first.
    fn active_sheet(&self) -> Option<(&str, &Map<String, Value>)> {
        let sheets = self.doc.get("sheets")?.as_object()?;
        let active = self
            .doc
            .get("activeSheetIndex")
            .and_then(Value::as_i64)
            .unwrap_or(0);

        let by_index = sheets.iter().find_map(|(name, sheet)| {
            let sheet = sheet.as_object()?;
            (sheet.get("index").and_then(Value::as_i64) == Some(active))
                .then_some((name.as_str(), sheet))
        });

        by_index.or_else(|| {
            sheets
                .iter()
                .find_map(|(name, sheet)| Some((name.as_str(), sheet.as_object()?)))
        })
    }

    /// Name of the active sheet, if the document has any sheet.
    #[must_use]
    pub fn active_sheet_name(&self) -> Option<&str> {
        self.active_sheet().map(|(name, _)| name)
    }

    /// Number of sheets in the document.
    #[must_use]
    pub fn sheet_count(&self) -> usize {
        self.doc
            .get("sheets")
            .and_then(Value::as_object)
            .map_or(0, Map::len)
    }

    /// Cell values of the active sheet as a dense grid of display strings.
    ///
    /// Trailing empty rows and columns are dropped; the grid never exceeds
    /// [`MAX_GRID_ROWS`] by [`MAX_GRID_COLS`].
    #[must_use]
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.grid(MAX_GRID_ROWS)
    }

    /// The first `limit` rows of [`Workbook::rows`].
    ///
    /// Cells below the limit are skipped before the grid is built.
    #[must_use]
    pub fn preview_rows(&self, limit: usize) -> Vec<Vec<String>> {
        self.grid(limit.min(MAX_GRID_ROWS))
    }

    fn grid(&self, row_limit: usize) -> Vec<Vec<String>> {
        let Some(table) = self
            .active_sheet()
            .and_then(|(_, sheet)| sheet.get("data"))
            .and_then(|data| data.get("dataTable"))
            .and_then(Value::as_object)
        else {
            return Vec::new();
        };

        let mut cells: Vec<(usize, usize, String)> = Vec::new();
        for (row_key, row) in table {
            let Ok(row_idx) = row_key.parse::<usize>() else {
                continue;
            };
            let Some(row) = row.as_object() else {
                continue;
            };
            if row_idx >= row_limit {
                continue;
            }
            for (col_key, cell) in row {
                let Ok(col_idx) = col_key.parse::<usize>() else {
                    continue;
                };
                if col_idx >= MAX_GRID_COLS {
                    continue;
                }
                let text = cell_text(cell);
                if !text.is_empty() {
                    cells.push((row_idx, col_idx, text));
                }
            }
        }

        let height = cells.iter().map(|(r, _, _)| r + 1).max().unwrap_or(0);
        let width = cells.iter().map(|(_, c, _)| c + 1).max().unwrap_or(0);
        let mut grid = vec![vec![String::new(); width]; height];
        for (r, c, text) in cells {
            grid[r][c] = text;
        }
        grid
    }

    /// Export the active sheet's values as CSV.
    ///
    /// # Errors
    ///
    /// Returns an error if the CSV writer fails.
    pub fn to_csv(&self) -> Result<Vec<u8>, SpreadsheetError> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(Vec::new());
        for row in self.rows() {
            writer.write_record(&row)?;
        }
        writer
            .into_inner()
            .map_err(|e| SpreadsheetError::Write(e.to_string()))
    }

    /// Pretty-printed document, as offered for download.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_pretty_json(&self) -> Result<String, SpreadsheetError> {
        Ok(serde_json::to_string_pretty(&self.doc)?)
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.doc)
    }
}

/// Display text of one `dataTable` cell.
fn cell_text(cell: &Value) -> String {
    match cell.get("value") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(true)) => "TRUE".to_string(),
        Some(Value::Bool(false)) => "FALSE".to_string(),
        _ => String::new(),
    }
}

fn csv_cell_value(field: &str) -> Value {
    let trimmed = field.trim();
    if let Ok(int) = trimmed.parse::<i64>() {
        return Value::Number(int.into());
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map_or_else(|| Value::String(field.to_string()), Value::Number)
}
