//! Spreadsheets (.xlsx, .xlsm, .xls, .ods)

use calamine::{open_workbook_auto_from_rs, Data, Reader};

use super::TextExtractor;
use crate::error::{Error, Result};
use crate::types::FormatKind;

/// Every worksheet in workbook order; cells tab-separated, rows newline-separated
#[derive(Debug, Clone, Copy, Default)]
pub struct SpreadsheetExtractor;

impl SpreadsheetExtractor {
    fn row_text(row: &[Data]) -> String {
        row.iter()
            .map(|cell| match cell {
                Data::Empty => String::new(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("\t")
    }
}

impl TextExtractor for SpreadsheetExtractor {
    fn format(&self) -> FormatKind {
        FormatKind::Spreadsheet
    }

    fn extract(&self, data: &[u8]) -> Result<String> {
        let cursor = std::io::Cursor::new(data);
        let mut workbook = open_workbook_auto_from_rs(cursor)
            .map_err(|e| Error::corrupt("spreadsheet", e.to_string()))?;

        let mut rows = Vec::new();
        for sheet_name in workbook.sheet_names() {
            let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
                Error::extractor(
                    FormatKind::Spreadsheet,
                    format!("sheet '{}': {}", sheet_name, e),
                )
            })?;
            tracing::debug!(sheet = %sheet_name, rows = range.height(), "Reading worksheet");
            rows.extend(range.rows().map(Self::row_text));
        }

        Ok(rows.join("\n"))
    }
}
