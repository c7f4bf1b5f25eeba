//! Order Quotation Pipeline
//!
//! Runs one order document through extraction, validation, normalization,
//! persistence, aggregation and notification, in that order, and reports
//! how each I/O stage went.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;
use validator::Validate;

use quotation_database::RecordStore;
use quotation_email_communication::{Notifier, QuotationComposer};
use quotation_models::{NormalizedRow, Quotation};
use quotation_utils::{
    log_stage, log_stage_failure, validate_file_type, validate_model, Extraction, QuotationAggregator,
    QuotationError, QuotationResult, RowNormalizer, RowValidator, TableExtractor,
    SUPPORTED_DOCUMENT_TYPES, SUPPORTED_SHEET_TYPES,
};

use crate::spreadsheet::SpreadsheetSink;

/// One pipeline invocation
#[derive(Debug, Clone, Validate)]
pub struct RunRequest {
    pub document: PathBuf,
    #[validate(email)]
    pub recipient: String,
    pub output: PathBuf,
    /// Skip every outward-facing sink and only report the quotation.
    pub dry_run: bool,
}

impl RunRequest {
    pub fn new(document: impl Into<PathBuf>, recipient: impl Into<String>, output: impl Into<PathBuf>) -> Self {
        Self {
            document: document.into(),
            recipient: recipient.into(),
            output: output.into(),
            dry_run: false,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn check(&self) -> QuotationResult<()> {
        validate_model(self)?;
        validate_file_type(&self.document, SUPPORTED_DOCUMENT_TYPES)?;
        validate_file_type(&self.output, SUPPORTED_SHEET_TYPES)
    }
}

/// What the pipeline does after a stage fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContinuePolicy {
    /// Still email the quotation when storing or writing the sheet failed.
    pub notify_on_persistence_failure: bool,
}

impl Default for ContinuePolicy {
    fn default() -> Self {
        Self {
            notify_on_persistence_failure: true,
        }
    }
}

/// Outcome of one I/O stage
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageOutcome {
    Succeeded,
    Skipped { reason: String },
    Failed { code: String, message: String },
}

impl StageOutcome {
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped {
            reason: reason.into(),
        }
    }

    pub fn failed(error: &QuotationError) -> Self {
        Self::Failed {
            code: error.error_code().to_string(),
            message: error.to_string(),
        }
    }

    pub fn is_succeeded(&self) -> bool {
        matches!(self, Self::Succeeded)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Per-run summary, printed by the CLI
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub run_id: Uuid,
    pub document: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub extraction: StageOutcome,
    pub rows_extracted: usize,
    pub rows_valid: usize,
    pub rows_dropped: usize,
    pub records_stored: u64,
    pub store: StageOutcome,
    pub spreadsheet: StageOutcome,
    pub notification: StageOutcome,
    pub quotation: Quotation,
}

impl PipelineReport {
    pub fn persistence_failed(&self) -> bool {
        self.store.is_failed() || self.spreadsheet.is_failed()
    }
}

/// Record store that refuses every write, used when the document store
/// could not be reached at startup.
pub struct UnavailableStore {
    reason: String,
}

impl UnavailableStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl RecordStore for UnavailableStore {
    async fn insert_many(&self, _rows: &[NormalizedRow]) -> Result<u64> {
        anyhow::bail!("document store unavailable: {}", self.reason)
    }

    fn name(&self) -> &str {
        "mongodb"
    }
}

pub struct Pipeline {
    extractor: Arc<TableExtractor>,
    validator: RowValidator,
    normalizer: RowNormalizer,
    aggregator: QuotationAggregator,
    store: Arc<dyn RecordStore>,
    sheets: Arc<dyn SpreadsheetSink>,
    notifier: Arc<dyn Notifier>,
    composer: QuotationComposer,
    policy: ContinuePolicy,
}

impl Pipeline {
    pub fn new(store: Arc<dyn RecordStore>, sheets: Arc<dyn SpreadsheetSink>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            extractor: Arc::new(TableExtractor::default()),
            validator: RowValidator::new(),
            normalizer: RowNormalizer::new(),
            aggregator: QuotationAggregator::new(),
            store,
            sheets,
            notifier,
            composer: QuotationComposer::default(),
            policy: ContinuePolicy::default(),
        }
    }

    pub fn with_composer(mut self, composer: QuotationComposer) -> Self {
        self.composer = composer;
        self
    }

    pub fn with_policy(mut self, policy: ContinuePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run one document end to end.
    ///
    /// Only a malformed request is an error; stage failures are logged and
    /// recorded in the report.
    pub async fn run(&self, request: &RunRequest) -> QuotationResult<PipelineReport> {
        request.check()?;

        let run_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "pipeline_run",
            run_id = %run_id,
            document = %request.document.display(),
            dry_run = request.dry_run
        );

        self.execute(run_id, request).instrument(span).await
    }

    async fn execute(&self, run_id: Uuid, request: &RunRequest) -> QuotationResult<PipelineReport> {
        let started_at = Utc::now();

        let extraction = self.extract(&request.document).await;
        let extraction_outcome = match &extraction.failure {
            Some(error) => StageOutcome::failed(error),
            None => StageOutcome::Succeeded,
        };

        let validated = self.validator.validate(extraction.rows());
        log_stage!(
            "validate",
            total = validated.summary.total_rows,
            valid = validated.summary.valid_rows,
            invalid = validated.summary.invalid_rows,
            missing = ?validated.summary.missing_fields,
            "Rows validated"
        );

        let rows_extracted = validated.summary.total_rows;
        let rows_valid = validated.summary.valid_rows;

        let normalized = self.normalizer.normalize_batch(validated.rows);
        log_stage!(
            "normalize",
            priced = normalized.rows.len(),
            dropped = normalized.dropped.len(),
            "Rows normalized"
        );
        let rows = normalized.rows;

        let (store_outcome, records_stored) = if request.dry_run {
            (StageOutcome::skipped("dry run"), 0)
        } else {
            self.store_rows(&rows).await
        };

        let spreadsheet_outcome = if request.dry_run {
            StageOutcome::skipped("dry run")
        } else {
            self.write_sheet(&rows, &request.output).await
        };

        let quotation = self.aggregator.aggregate(&rows);
        log_stage!(
            "aggregate",
            total_qty = quotation.total_qty,
            total_cost = quotation.total_cost,
            "Quotation computed"
        );

        let persistence_failed = store_outcome.is_failed() || spreadsheet_outcome.is_failed();
        let notification = if request.dry_run {
            StageOutcome::skipped("dry run")
        } else if persistence_failed && !self.policy.notify_on_persistence_failure {
            tracing::warn!("Persistence failed; quotation email not sent");
            StageOutcome::skipped("persistence failed")
        } else {
            let attachment = if spreadsheet_outcome.is_succeeded() {
                Some(request.output.clone())
            } else {
                tracing::warn!("Costing sheet unavailable; sending quotation without attachment");
                None
            };
            self.notify(&request.recipient, &quotation, attachment).await
        };

        Ok(PipelineReport {
            run_id,
            document: request.document.display().to_string(),
            started_at,
            finished_at: Utc::now(),
            extraction: extraction_outcome,
            rows_extracted,
            rows_valid,
            rows_dropped: normalized.dropped.len(),
            records_stored,
            store: store_outcome,
            spreadsheet: spreadsheet_outcome,
            notification,
            quotation,
        })
    }

    async fn extract(&self, path: &Path) -> Extraction {
        let extractor = Arc::clone(&self.extractor);
        let owned = path.to_path_buf();

        match tokio::task::spawn_blocking(move || extractor.extract(&owned)).await {
            Ok(extraction) => extraction,
            Err(e) => {
                let error = QuotationError::document_read(path.display().to_string(), format!("extraction task failed: {}", e));
                log_stage_failure!("extract", error, "Error reading document; continuing with no rows");
                Extraction::failed(path.display().to_string(), error)
            }
        }
    }

    async fn store_rows(&self, rows: &[NormalizedRow]) -> (StageOutcome, u64) {
        match self.store.insert_many(rows).await {
            Ok(inserted) => {
                log_stage!("store", sink = self.store.name(), inserted, "Order lines stored");
                (StageOutcome::Succeeded, inserted)
            }
            Err(e) => {
                let error = QuotationError::persistence(self.store.name(), format!("{:#}", e));
                log_stage_failure!("store", error, "Error inserting order lines");
                (StageOutcome::failed(&error), 0)
            }
        }
    }

    async fn write_sheet(&self, rows: &[NormalizedRow], path: &Path) -> StageOutcome {
        let sheets = Arc::clone(&self.sheets);
        let sink = sheets.name().to_string();
        let rows = rows.to_vec();
        let owned = path.to_path_buf();

        let result = match tokio::task::spawn_blocking(move || sheets.write(&rows, &owned)).await {
            Ok(result) => result,
            Err(e) => Err(anyhow::anyhow!("spreadsheet task failed: {}", e)),
        };

        match result {
            Ok(()) => {
                log_stage!("spreadsheet", path = %path.display(), "Costing sheet written");
                StageOutcome::Succeeded
            }
            Err(e) => {
                let error = QuotationError::persistence(sink, format!("{:#}", e));
                log_stage_failure!("spreadsheet", error, "Error writing costing sheet");
                StageOutcome::failed(&error)
            }
        }
    }

    async fn notify(&self, recipient: &str, quotation: &Quotation, attachment: Option<PathBuf>) -> StageOutcome {
        let email = match self.composer.compose(recipient, quotation, attachment) {
            Ok(email) => email,
            Err(e) => {
                let error = QuotationError::notification(format!("{:#}", e));
                log_stage_failure!("notify", error, "Error composing quotation email");
                return StageOutcome::failed(&error);
            }
        };

        match self.notifier.send(&email).await {
            Ok(response) => {
                log_stage!("notify", recipient, response = %response, "Quotation email sent");
                StageOutcome::Succeeded
            }
            Err(e) => {
                let error = QuotationError::notification(format!("{:#}", e));
                log_stage_failure!("notify", error, "Error sending quotation email");
                StageOutcome::failed(&error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_check() {
        let ok = RunRequest::new("order.pdf", "buyer@example.com", "costing_sheet.xlsx");
        assert!(ok.check().is_ok());

        let bad_recipient = RunRequest::new("order.pdf", "buyer", "costing_sheet.xlsx");
        assert_eq!(bad_recipient.check().unwrap_err().error_code(), "VALIDATION_ERROR");

        let bad_document = RunRequest::new("order.docx", "buyer@example.com", "costing_sheet.xlsx");
        assert!(bad_document.check().is_err());

        let bad_output = RunRequest::new("order.csv", "buyer@example.com", "costing_sheet.pdf");
        assert!(bad_output.check().is_err());
    }

    #[test]
    fn test_stage_outcome_serialization() {
        let failed = StageOutcome::failed(&QuotationError::persistence("mongodb", "timeout"));
        assert!(failed.is_failed());

        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["code"], "PERSISTENCE_ERROR");

        let json = serde_json::to_value(StageOutcome::skipped("dry run")).unwrap();
        assert_eq!(json["status"], "skipped");
        assert_eq!(json["reason"], "dry run");

        assert_eq!(serde_json::to_value(StageOutcome::Succeeded).unwrap()["status"], "succeeded");
    }

    #[test]
    fn test_default_policy_notifies_after_persistence_failure() {
        assert!(ContinuePolicy::default().notify_on_persistence_failure);
    }

    #[tokio::test]
    async fn test_unavailable_store_refuses_writes() {
        let store = UnavailableStore::new("connection refused");
        let err = store.insert_many(&[]).await.unwrap_err();
        assert!(err.to_string().contains("connection refused"));
        assert_eq!(store.name(), "mongodb");
    }
}
