use std::collections::HashMap;

use crate::normalize::clean_str;

/// One parsed spreadsheet row, keyed by header. Rows are only built by
/// `Sheet::from_csv_text`, so everything downstream of this module sees
/// header-keyed cells instead of raw CSV records.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    cells: HashMap<String, String>,
}

impl RawRow {
    pub fn get(&self, header: &str) -> Option<&str> {
        self.cells.get(header).map(|s| s.as_str())
    }

    /// Cleaned cell value, empty string when the column is absent.
    pub fn cleaned(&self, header: &str) -> String {
        clean_str(self.get(header).unwrap_or(""))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Sheet {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl Sheet {
    /// Parse header-driven CSV text into a `Sheet`. Lines whose cells are
    /// all empty are skipped, matching the source exports which pad the
    /// sheet with blank rows. Short records are tolerated; missing cells
    /// read as absent.
    pub fn from_csv_text(text: &str) -> anyhow::Result<Sheet> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut rows: Vec<RawRow> = Vec::new();
        for record in reader.records() {
            let record = record?;
            if record.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }
            let mut cells = HashMap::with_capacity(headers.len());
            for (i, header) in headers.iter().enumerate() {
                if let Some(cell) = record.get(i) {
                    cells.insert(header.clone(), cell.to_string());
                }
            }
            rows.push(RawRow { cells });
        }

        Ok(Sheet { headers, rows })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
