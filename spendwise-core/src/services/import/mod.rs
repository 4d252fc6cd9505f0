//! Import service - statement files to transactions
//!
//! Delimited text is parsed heuristically. Anything else, and delimited text
//! that yields no usable rows, produces clearly labeled placeholder data (or
//! nothing, when placeholder data is turned off). Parsed and placeholder
//! records are never mixed within one file result.

mod amounts;
mod classify;
mod dates;
mod statement;

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use rand::Rng;
use serde::Serialize;

use crate::adapters::placeholder::generate_placeholder_transactions;
use crate::config::Config;
use crate::domain::result::{Error, Result};
use crate::domain::Transaction;

pub use amounts::{parse_amount, ParsedAmount};
pub use classify::{detect_category, has_credit_keyword, resolve_type, type_from_cell};
pub use dates::{estimate_date, parse_date};
pub use statement::{
    detect_columns, detect_delimiter, parse_statement, ColumnLayout, ParsedStatement,
    StatementOptions,
};

/// MIME types accepted for upload
pub const SUPPORTED_MIME_TYPES: [&str; 5] = [
    "text/csv",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "text/plain",
    "application/pdf",
];

/// File extensions accepted for upload
pub const SUPPORTED_EXTENSIONS: [&str; 4] = [".csv", ".txt", ".xlsx", ".pdf"];

/// Broad kind of an accepted file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Csv,
    Excel,
    Text,
    Pdf,
}

impl FileKind {
    /// Classify a file by name and optional MIME type
    ///
    /// Returns `None` for files that are not accepted at all. Only `Csv` is
    /// read as delimited text.
    pub fn detect(file_name: &str, mime: Option<&str>) -> Option<Self> {
        let name = file_name.to_lowercase();
        let mime = mime.map(str::trim).unwrap_or_default();

        if name.ends_with(".csv") || mime == "text/csv" {
            return Some(FileKind::Csv);
        }
        if !SUPPORTED_MIME_TYPES.contains(&mime)
            && !SUPPORTED_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
        {
            return None;
        }

        Some(if name.ends_with(".pdf") || mime == "application/pdf" {
            FileKind::Pdf
        } else if name.ends_with(".xlsx") || mime.contains("excel") || mime.contains("spreadsheet")
        {
            FileKind::Excel
        } else {
            FileKind::Text
        })
    }

    pub fn is_delimited_text(&self) -> bool {
        matches!(self, FileKind::Csv)
    }
}

/// Whether a file would be accepted for import
pub fn is_supported(file_name: &str, mime: Option<&str>) -> bool {
    FileKind::detect(file_name, mime).is_some()
}

/// Why a file result holds placeholder data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PlaceholderReason {
    /// The file is not delimited text (PDF, spreadsheet, plain text)
    NotDelimitedText,
    /// Delimited text without a single usable row
    NoUsableRows,
}

/// Where the records of a file result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "origin", rename_all = "camelCase")]
pub enum ImportOrigin {
    /// Read from the file
    Parsed,
    /// Fabricated; not the user's data
    Placeholder { reason: PlaceholderReason },
    /// Nothing usable and placeholder data is turned off
    Empty,
}

impl ImportOrigin {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, ImportOrigin::Placeholder { .. })
    }
}

/// Result of importing a single file
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileImport {
    pub file_name: String,
    pub byte_len: u64,
    pub kind: FileKind,
    #[serde(flatten)]
    pub origin: ImportOrigin,
    pub transactions: Vec<Transaction>,
    pub skipped_rows: usize,
    pub estimated_dates: usize,
}

/// Per-file outcome within a batch
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum FileStatus {
    Completed(FileImport),
    Failed { file_name: String, error: String },
}

impl FileStatus {
    pub fn file_name(&self) -> &str {
        match self {
            FileStatus::Completed(import) => &import.file_name,
            FileStatus::Failed { file_name, .. } => file_name,
        }
    }
}

/// Result of importing several files
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchImport {
    /// Files filtered out before processing
    pub unsupported: Vec<String>,
    /// Outcome per accepted file, in input order
    pub files: Vec<FileStatus>,
}

impl BatchImport {
    /// Successfully processed files
    pub fn completed(&self) -> impl Iterator<Item = &FileImport> {
        self.files.iter().filter_map(|status| match status {
            FileStatus::Completed(import) => Some(import),
            FileStatus::Failed { .. } => None,
        })
    }

    pub fn failed_count(&self) -> usize {
        self.files
            .iter()
            .filter(|s| matches!(s, FileStatus::Failed { .. }))
            .count()
    }

    /// Every record from every completed file
    pub fn transactions(&self) -> Vec<Transaction> {
        self.completed()
            .flat_map(|import| import.transactions.iter().cloned())
            .collect()
    }
}

/// Import service for statement files
pub struct ImportService {
    options: StatementOptions,
    placeholder_fallback: bool,
}

impl ImportService {
    pub fn new(config: &Config) -> Self {
        Self {
            options: StatementOptions::from_config(config),
            placeholder_fallback: config.import.placeholder_fallback,
        }
    }

    pub fn options(&self) -> &StatementOptions {
        &self.options
    }

    /// Import in-memory file content using today's date and thread-local randomness
    pub fn import_bytes(&self, file_name: &str, mime: Option<&str>, bytes: &[u8]) -> FileImport {
        let today = Local::now().date_naive();
        self.import_bytes_with(file_name, mime, bytes, today, &mut rand::thread_rng())
    }

    /// Import in-memory file content
    ///
    /// Never fails: content problems are skipped rows or placeholder data.
    pub fn import_bytes_with<R: Rng + ?Sized>(
        &self,
        file_name: &str,
        mime: Option<&str>,
        bytes: &[u8],
        today: NaiveDate,
        rng: &mut R,
    ) -> FileImport {
        let byte_len = bytes.len() as u64;
        let kind = FileKind::detect(file_name, mime).unwrap_or(FileKind::Text);

        let (origin, parsed) = if kind.is_delimited_text() {
            let content = String::from_utf8_lossy(bytes);
            let parsed = parse_statement(&content, &self.options, today, rng);
            if parsed.transactions.is_empty() {
                (
                    self.fallback_origin(PlaceholderReason::NoUsableRows),
                    parsed,
                )
            } else {
                (ImportOrigin::Parsed, parsed)
            }
        } else {
            (
                self.fallback_origin(PlaceholderReason::NotDelimitedText),
                ParsedStatement::default(),
            )
        };

        let transactions = match origin {
            ImportOrigin::Placeholder { .. } => {
                generate_placeholder_transactions(byte_len, today, rng)
            }
            ImportOrigin::Parsed | ImportOrigin::Empty => parsed.transactions,
        };

        tracing::info!(
            file = file_name,
            ?kind,
            ?origin,
            records = transactions.len(),
            skipped = parsed.skipped_rows,
            "Processed import file"
        );

        FileImport {
            file_name: file_name.to_string(),
            byte_len,
            kind,
            origin,
            transactions,
            skipped_rows: parsed.skipped_rows,
            estimated_dates: parsed.estimated_dates,
        }
    }

    fn fallback_origin(&self, reason: PlaceholderReason) -> ImportOrigin {
        if self.placeholder_fallback {
            ImportOrigin::Placeholder { reason }
        } else {
            ImportOrigin::Empty
        }
    }

    /// Read and import a file from disk
    pub fn import_file(&self, path: &Path) -> Result<FileImport> {
        let file_name = display_name(path);
        if !is_supported(&file_name, None) {
            return Err(Error::UnsupportedFile(file_name));
        }
        let bytes = std::fs::read(path)?;
        Ok(self.import_bytes(&file_name, None, &bytes))
    }

    /// Import several files, one after another
    ///
    /// Unsupported files are filtered out first. A read failure marks that
    /// file as failed and the batch carries on. `on_file` is called after
    /// each accepted file.
    pub fn import_batch<F>(&self, paths: &[PathBuf], mut on_file: F) -> BatchImport
    where
        F: FnMut(&FileStatus),
    {
        let (accepted, unsupported): (Vec<&PathBuf>, Vec<&PathBuf>) = paths
            .iter()
            .partition(|path| is_supported(&display_name(path), None));

        let mut batch = BatchImport {
            unsupported: unsupported.iter().map(|p| display_name(p)).collect(),
            files: Vec::with_capacity(accepted.len()),
        };
        if !batch.unsupported.is_empty() {
            tracing::warn!(
                count = batch.unsupported.len(),
                "Skipping unsupported files: {}",
                batch.unsupported.join(", ")
            );
        }

        for path in accepted {
            let status = match self.import_file(path) {
                Ok(import) => FileStatus::Completed(import),
                Err(e) => {
                    tracing::warn!(file = %path.display(), "Failed to read import file: {}", e);
                    FileStatus::Failed {
                        file_name: display_name(path),
                        error: e.to_string(),
                    }
                }
            };
            on_file(&status);
            batch.files.push(status);
        }

        batch
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransactionType;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn service() -> ImportService {
        ImportService::new(&Config::default())
    }

    #[test]
    fn test_file_kind_detection() {
        assert_eq!(FileKind::detect("stmt.CSV", None), Some(FileKind::Csv));
        assert_eq!(FileKind::detect("blob", Some("text/csv")), Some(FileKind::Csv));
        assert_eq!(FileKind::detect("stmt.pdf", None), Some(FileKind::Pdf));
        assert_eq!(FileKind::detect("stmt.xlsx", None), Some(FileKind::Excel));
        assert_eq!(
            FileKind::detect("export", Some("application/vnd.ms-excel")),
            Some(FileKind::Excel)
        );
        assert_eq!(FileKind::detect("notes.txt", None), Some(FileKind::Text));
        assert_eq!(FileKind::detect("photo.png", Some("image/png")), None);
        assert!(!is_supported("statement.docx", None));
    }

    #[test]
    fn test_import_file_rejects_unsupported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("statement.docx");
        std::fs::write(&path, "hello").unwrap();
        assert!(matches!(
            service().import_file(&path),
            Err(Error::UnsupportedFile(name)) if name == "statement.docx"
        ));
    }

    #[test]
    fn test_parsed_csv() {
        let mut rng = StdRng::seed_from_u64(5);
        let result = service().import_bytes_with(
            "march.csv",
            None,
            b"Date,Description,Amount\n01/02/2024,Starbucks Coffee,250\n",
            today(),
            &mut rng,
        );
        assert_eq!(result.origin, ImportOrigin::Parsed);
        assert_eq!(result.transactions.len(), 1);
        assert_eq!(result.transactions[0].kind, TransactionType::Debit);
    }

    #[test]
    fn test_pdf_gets_placeholder_count() {
        for size in [0usize, 499, 500, 4_999, 12_345, 15_000, 100_000] {
            let mut rng = StdRng::seed_from_u64(size as u64);
            let bytes = vec![b'%'; size];
            let result = service().import_bytes_with("statement.pdf", None, &bytes, today(), &mut rng);
            assert_eq!(
                result.origin,
                ImportOrigin::Placeholder {
                    reason: PlaceholderReason::NotDelimitedText
                }
            );
            assert_eq!(result.transactions.len(), (size / 500).min(30));
            assert!(result
                .transactions
                .iter()
                .all(|t| matches!(t.kind, TransactionType::Credit | TransactionType::Debit)));
        }
    }

    #[test]
    fn test_csv_without_rows_is_labeled_placeholder() {
        let mut rng = StdRng::seed_from_u64(5);
        let content = format!("Date,Description,Amount\n{}", "x,y,0\n".repeat(200));
        let result = service().import_bytes_with("empty.csv", None, content.as_bytes(), today(), &mut rng);
        assert_eq!(
            result.origin,
            ImportOrigin::Placeholder {
                reason: PlaceholderReason::NoUsableRows
            }
        );
        assert_eq!(result.skipped_rows, 200);
        assert_eq!(result.transactions.len(), content.len() / 500);
    }

    #[test]
    fn test_placeholder_disabled() {
        let mut config = Config::default();
        config.import.placeholder_fallback = false;
        let service = ImportService::new(&config);
        let mut rng = StdRng::seed_from_u64(5);
        let result = service.import_bytes_with("scan.pdf", None, &[0u8; 9000], today(), &mut rng);
        assert_eq!(result.origin, ImportOrigin::Empty);
        assert!(result.transactions.is_empty());
    }

    #[test]
    fn test_batch_continues_past_failures() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.csv");
        std::fs::write(&good, "Date,Description,Amount\n01/02/2024,Uber,120\n").unwrap();
        let missing = dir.path().join("missing.csv");
        let image = dir.path().join("receipt.png");
        std::fs::write(&image, [0u8; 10]).unwrap();

        let mut seen = Vec::new();
        let batch = service().import_batch(&[missing, image, good], |status| {
            seen.push(status.file_name().to_string())
        });

        assert_eq!(batch.unsupported, vec!["receipt.png".to_string()]);
        assert_eq!(batch.files.len(), 2);
        assert_eq!(batch.failed_count(), 1);
        assert_eq!(seen, vec!["missing.csv".to_string(), "good.csv".to_string()]);
        assert_eq!(batch.transactions().len(), 1);
    }

    #[test]
    fn test_origin_serialization() {
        let origin = ImportOrigin::Placeholder {
            reason: PlaceholderReason::NoUsableRows,
        };
        let json = serde_json::to_value(origin).unwrap();
        assert_eq!(json["origin"], "placeholder");
        assert_eq!(json["reason"], "noUsableRows");
    }
}
