//! Costing Sheet Writer
//!
//! Writes priced order lines to an `.xlsx` or `.csv` costing sheet.

use anyhow::{bail, Context, Result};
use indexmap::{IndexMap, IndexSet};
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

use quotation_models::{FieldValue, NormalizedRow};

/// Destination for the costing sheet. Implementations block.
pub trait SpreadsheetSink: Send + Sync {
    fn write(&self, rows: &[NormalizedRow], path: &Path) -> Result<()>;

    fn name(&self) -> &str {
        "spreadsheet"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Xlsx,
    Csv,
}

impl SheetFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match extension.as_deref() {
            Some("xlsx") => Ok(Self::Xlsx),
            Some("csv") => Ok(Self::Csv),
            _ => bail!("Unsupported costing sheet type: {}", path.display()),
        }
    }
}

/// Writes one sheet with a bold header row.
///
/// Columns are the union of every record's keys in first-seen order; a
/// record without a column leaves that cell blank.
#[derive(Debug, Clone)]
pub struct SheetWriter {
    sheet_name: String,
}

impl SheetWriter {
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
        }
    }

    fn write_xlsx(&self, columns: &[String], records: &[IndexMap<String, FieldValue>], path: &Path) -> Result<()> {
        let mut workbook = Workbook::new();
        let bold = Format::new().set_bold();

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&self.sheet_name)?;

        for (col, name) in columns.iter().enumerate() {
            let col = u16::try_from(col).context("Too many columns for a worksheet")?;
            worksheet.write_string_with_format(0, col, name.as_str(), &bold)?;
        }

        for (idx, record) in records.iter().enumerate() {
            let row = u32::try_from(idx + 1).context("Too many rows for a worksheet")?;
            for (col, name) in columns.iter().enumerate() {
                let col = u16::try_from(col).context("Too many columns for a worksheet")?;
                match record.get(name) {
                    Some(FieldValue::Number(n)) => {
                        worksheet.write_number(row, col, *n)?;
                    }
                    Some(FieldValue::Text(s)) => {
                        worksheet.write_string(row, col, s.as_str())?;
                    }
                    Some(FieldValue::Null) | None => {}
                }
            }
        }
        worksheet.autofit();

        workbook
            .save(path)
            .with_context(|| format!("Failed to save workbook {}", path.display()))
    }

    fn write_csv(&self, columns: &[String], records: &[IndexMap<String, FieldValue>], path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;

        writer.write_record(columns)?;
        for record in records {
            writer.write_record(columns.iter().map(|name| cell_text(record.get(name))))?;
        }
        writer.flush()?;

        Ok(())
    }
}

impl Default for SheetWriter {
    fn default() -> Self {
        Self::new("Costing")
    }
}

impl SpreadsheetSink for SheetWriter {
    fn write(&self, rows: &[NormalizedRow], path: &Path) -> Result<()> {
        let format = SheetFormat::from_path(path)?;
        let records: Vec<IndexMap<String, FieldValue>> = rows.iter().map(NormalizedRow::to_record).collect();
        let columns = column_union(&records);

        match format {
            SheetFormat::Xlsx => self.write_xlsx(&columns, &records, path),
            SheetFormat::Csv => self.write_csv(&columns, &records, path),
        }?;

        tracing::debug!(path = %path.display(), rows = records.len(), columns = columns.len(), "Costing sheet written");
        Ok(())
    }
}

/// Every key of every record, in the order first seen.
pub fn column_union(records: &[IndexMap<String, FieldValue>]) -> Vec<String> {
    let columns: IndexSet<&String> = records.iter().flat_map(|record| record.keys()).collect();
    columns.into_iter().cloned().collect()
}

fn cell_text(value: Option<&FieldValue>) -> String {
    match value {
        Some(FieldValue::Number(n)) => n.to_string(),
        Some(FieldValue::Text(s)) => s.clone(),
        Some(FieldValue::Null) | None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotation_models::RawRow;
    use quotation_utils::DocumentParser;

    fn line(fields: &[(&str, Option<&str>)], quantity: f64, per_rate: f64) -> NormalizedRow {
        NormalizedRow {
            quantity,
            per_rate,
            total: quantity * per_rate,
            extra: fields.iter().map(|(k, v)| (*k, v.map(|s| s.to_string()))).collect::<RawRow>(),
        }
    }

    fn lines() -> Vec<NormalizedRow> {
        vec![
            line(&[("Placement", Some("Shelf1")), ("Qty", Some("3")), ("Per Rate", Some("10"))], 3.0, 10.0),
            line(&[("Placement", Some("Shelf2")), ("Qty", Some("4")), ("Colour", None), ("Size", Some("M"))], 4.0, 0.0),
        ]
    }

    #[test]
    fn test_sheet_format_from_path() {
        assert_eq!(SheetFormat::from_path(Path::new("costing_sheet.xlsx")).unwrap(), SheetFormat::Xlsx);
        assert_eq!(SheetFormat::from_path(Path::new("costing_sheet.CSV")).unwrap(), SheetFormat::Csv);
        assert!(SheetFormat::from_path(Path::new("costing_sheet.xls")).is_err());
        assert!(SheetFormat::from_path(Path::new("costing_sheet")).is_err());
    }

    #[test]
    fn test_column_union_first_seen_order() {
        let records: Vec<_> = lines().iter().map(NormalizedRow::to_record).collect();
        assert_eq!(
            column_union(&records),
            vec!["Quantity", "Per Rate", "Total", "Placement", "Qty", "Colour", "Size"]
        );
        assert!(column_union(&[]).is_empty());
    }

    #[test]
    fn test_write_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("costing_sheet.csv");

        SheetWriter::default().write(&lines(), &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let mut lines = written.lines();
        assert_eq!(lines.next(), Some("Quantity,Per Rate,Total,Placement,Qty,Colour,Size"));
        assert_eq!(lines.next(), Some("3,10,30,Shelf1,3,,"));
        assert_eq!(lines.next(), Some("4,0,0,Shelf2,4,,M"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_write_xlsx_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("costing_sheet.xlsx");

        SheetWriter::default().write(&lines(), &path).unwrap();

        let document = DocumentParser::new().parse_file(&path).unwrap();
        assert_eq!(document.table_count(), 1);

        let table = &document.pages[0].tables[0];
        assert_eq!(
            table.header(),
            vec!["Quantity", "Per Rate", "Total", "Placement", "Qty", "Colour", "Size"]
        );
        assert_eq!(table.body().len(), 2);
        assert_eq!(table.body()[0][2].as_deref(), Some("30"));
        assert_eq!(table.body()[0][3].as_deref(), Some("Shelf1"));
    }

    #[test]
    fn test_unsupported_extension_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(SheetWriter::default().write(&lines(), &dir.path().join("sheet.txt")).is_err());
    }
}
