//! Order Document Parser
//!
//! Reads PDF, CSV and Excel order documents into pages of detected tables.
//! Every table keeps its cells exactly as found; header handling happens in
//! the extractor.

use anyhow::{bail, Context, Result};
use regex::Regex;
use std::io::Cursor;
use std::path::Path;
use std::sync::OnceLock;

/// A single table cell; `None` when the cell is empty or unreadable.
pub type Cell = Option<String>;

/// Supported order document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Csv,
    Xlsx,
    Xls,
}

impl DocumentFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "pdf" => Some(Self::Pdf),
            "csv" => Some(Self::Csv),
            "xlsx" => Some(Self::Xlsx),
            "xls" => Some(Self::Xls),
            _ => None,
        }
    }
}

/// A table as detected on a page. Row 0 is expected to be the header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectedTable {
    pub rows: Vec<Vec<Cell>>,
}

impl DetectedTable {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Column names from row 0. Missing header cells become `""`.
    pub fn header(&self) -> Vec<String> {
        self.rows
            .first()
            .map(|row| row.iter().map(|cell| cell.clone().unwrap_or_default()).collect())
            .unwrap_or_default()
    }

    /// Rows after the header.
    pub fn body(&self) -> &[Vec<Cell>] {
        self.rows.get(1..).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentPage {
    pub page_number: usize,
    pub tables: Vec<DetectedTable>,
}

/// Complete parsed document with metadata
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    pub filename: String,
    pub format: Option<DocumentFormat>,
    pub pages: Vec<DocumentPage>,
}

impl ParsedDocument {
    /// A document with no pages, used when reading fails.
    pub fn empty(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            format: None,
            pages: Vec::new(),
        }
    }

    pub fn table_count(&self) -> usize {
        self.pages.iter().map(|p| p.tables.len()).sum()
    }
}

/// Main order document parser
pub struct DocumentParser {
    /// Fewest cells a PDF text line needs to count as a table row
    min_columns: usize,
    /// Fewest consecutive rows (header included) that make a PDF table
    min_table_rows: usize,
}

impl Default for DocumentParser {
    fn default() -> Self {
        Self {
            min_columns: 2,
            min_table_rows: 2,
        }
    }
}

impl DocumentParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_columns(mut self, min_columns: usize) -> Self {
        self.min_columns = min_columns.max(1);
        self
    }

    /// Read and parse a document from disk
    pub fn parse_file(&self, path: &Path) -> Result<ParsedDocument> {
        let data = std::fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        self.parse_bytes(&filename, &data)
    }

    /// Parse document bytes; the format comes from the filename's extension
    pub fn parse_bytes(&self, filename: &str, data: &[u8]) -> Result<ParsedDocument> {
        let format = DocumentFormat::from_extension(Path::new(filename))
            .context("Could not determine document format")?;

        let pages = match format {
            DocumentFormat::Pdf => self.parse_pdf(data)?,
            DocumentFormat::Csv => self.parse_csv(data)?,
            DocumentFormat::Xlsx | DocumentFormat::Xls => self.parse_excel(data, format)?,
        };

        Ok(ParsedDocument {
            filename: filename.to_string(),
            format: Some(format),
            pages,
        })
    }

    /// Parse PDF format, one page at a time
    fn parse_pdf(&self, data: &[u8]) -> Result<Vec<DocumentPage>> {
        // pdf-extract panics on some malformed files instead of erroring
        let page_texts = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(data))
            .map_err(|_| anyhow::anyhow!("PDF extraction aborted on a malformed document"))?
            .context("Failed to extract text from PDF")?;

        Ok(page_texts
            .iter()
            .enumerate()
            .map(|(idx, text)| DocumentPage {
                page_number: idx + 1,
                tables: self.detect_text_tables(text),
            })
            .collect())
    }

    /// Find tables in extracted page text.
    ///
    /// A table is a run of consecutive lines that each split into at least
    /// `min_columns` cells on tabs or runs of two or more spaces.
    pub fn detect_text_tables(&self, text: &str) -> Vec<DetectedTable> {
        let mut tables = Vec::new();
        let mut current: Vec<Vec<Cell>> = Vec::new();

        for line in text.lines() {
            let cells = split_columns(line);
            if cells.len() >= self.min_columns {
                current.push(cells.into_iter().map(Some).collect());
            } else {
                self.flush_table(&mut current, &mut tables);
            }
        }
        self.flush_table(&mut current, &mut tables);

        tables
    }

    fn flush_table(&self, current: &mut Vec<Vec<Cell>>, tables: &mut Vec<DetectedTable>) {
        let rows = std::mem::take(current);
        if rows.len() >= self.min_table_rows {
            tables.push(DetectedTable::new(rows));
        }
    }

    /// Parse CSV format as a single page holding a single table
    fn parse_csv(&self, data: &[u8]) -> Result<Vec<DocumentPage>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(data);

        let mut rows = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result.with_context(|| format!("Row {}: CSV parse error", idx + 1))?;
            rows.push(record.iter().map(|v| Some(v.to_string())).collect());
        }

        Ok(vec![DocumentPage {
            page_number: 1,
            tables: single_table(rows),
        }])
    }

    /// Parse Excel format; every worksheet is a page with one table
    fn parse_excel(&self, data: &[u8], format: DocumentFormat) -> Result<Vec<DocumentPage>> {
        use calamine::{open_workbook_from_rs, DataType, Reader, Sheets};

        let cursor = Cursor::new(data);
        let mut workbook: Sheets<_> = match format {
            DocumentFormat::Xlsx => Sheets::Xlsx(
                open_workbook_from_rs(cursor).context("Failed to open Excel workbook")?,
            ),
            DocumentFormat::Xls => Sheets::Xls(
                open_workbook_from_rs(cursor).context("Failed to open Excel workbook")?,
            ),
            other => bail!("{:?} is not a workbook format", other),
        };

        let sheet_names = workbook.sheet_names();
        let mut pages = Vec::with_capacity(sheet_names.len());
        for (idx, sheet_name) in sheet_names.iter().enumerate() {
            let range = workbook
                .worksheet_range(sheet_name)
                .with_context(|| format!("Worksheet {} not found", sheet_name))?
                .with_context(|| format!("Failed to read worksheet {}", sheet_name))?;

            let rows: Vec<Vec<Cell>> = range
                .rows()
                .map(|row| {
                    row.iter()
                        .map(|cell: &DataType| match cell {
                            DataType::Empty | DataType::Error(_) => None,
                            DataType::String(s) => Some(s.trim().to_string()),
                            other => Some(other.to_string()),
                        })
                        .collect()
                })
                .collect();

            pages.push(DocumentPage {
                page_number: idx + 1,
                tables: single_table(rows),
            });
        }

        Ok(pages)
    }
}

fn single_table(rows: Vec<Vec<Cell>>) -> Vec<DetectedTable> {
    if rows.is_empty() {
        Vec::new()
    } else {
        vec![DetectedTable::new(rows)]
    }
}

fn column_separator() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| Regex::new(r"\t+|\s{2,}").expect("separator pattern is valid"))
}

/// Split one line of page text into trimmed cells.
fn split_columns(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    column_separator()
        .split(trimmed)
        .map(|cell| cell.trim().to_string())
        .collect()
}
