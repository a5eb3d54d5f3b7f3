// 🖨️ Report Generation - validate, aggregate, render, record
//
// The document engine itself is external. This module owns the caller
// contract around it:
//
//   1. Validate the request (member present and well-formed, approver named)
//   2. Aggregate the member's context
//   3. Empty context → NoData, nothing is written
//   4. Render to `<output_dir>/<stem>_<member>_<BS YYYYMMDD>.<ext>`
//   5. Record the generation in the report log

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::calendar::BsDate;
use crate::context::{prepare_report_context, ContextMap, StaffInfo};
use crate::db::{fetch_report_logs, insert_report_log, ReportLogEntry, ReportStore};
use crate::entities::MemberId;
use crate::error::ReportError;
use crate::templates::ReportType;

// ============================================================================
// REQUEST
// ============================================================================

/// One "generate this document for this member" call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRequest {
    /// Member number as typed by the user
    pub member: String,
    pub report_type: ReportType,
    pub template: PathBuf,
    pub staff: StaffInfo,
    /// Operator recorded in the report log
    pub generated_by: String,
}

impl ReportRequest {
    /// Check the caller contract before anything touches the store
    pub fn validate(&self) -> Result<MemberId, ReportError> {
        let member = MemberId::normalize(&self.member)?;
        if self.staff.approved_by_name.trim().is_empty() {
            return Err(ReportError::MissingApprover);
        }
        Ok(member)
    }
}

/// Outcome of a successful generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedReport {
    pub member: MemberId,
    pub report_type: ReportType,
    pub output: PathBuf,
    pub log_entry: ReportLogEntry,
}

// ============================================================================
// RENDERER
// ============================================================================

/// External document engine: fills `template` with `context` into `output`
pub trait DocumentRenderer {
    fn render(&self, template: &Path, context: &ContextMap, output: &Path) -> Result<()>;

    /// Extension of the file `render` writes; defaults to the template's own
    fn extension(&self, template: &Path) -> String {
        template
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("docx")
            .to_string()
    }
}

/// Writes the context as a pretty `.json` file instead of a document
///
/// Used to hand the context to an external templating tool, and for
/// inspecting what a template would receive.
#[derive(Debug, Clone, Default)]
pub struct JsonContextRenderer;

impl DocumentRenderer for JsonContextRenderer {
    fn render(&self, _template: &Path, context: &ContextMap, output: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(context).context("Failed to serialize context")?;
        fs::write(output, json).with_context(|| format!("Failed to write {}", output.display()))?;
        Ok(())
    }

    fn extension(&self, _template: &Path) -> String {
        "json".to_string()
    }
}

// ============================================================================
// REPORT LOG
// ============================================================================

/// Sink for generation events
pub trait ReportLog {
    fn record(&self, entry: &ReportLogEntry) -> Result<()>;
}

/// Report log backed by the `report_tracking` table of the member store
#[derive(Debug, Clone)]
pub struct SqliteReportLog {
    store: ReportStore,
}

impl SqliteReportLog {
    pub fn new(store: ReportStore) -> Self {
        SqliteReportLog { store }
    }

    /// Entries newest first, optionally only those of one BS date
    pub fn list(&self, date_filter: Option<&str>) -> Result<Vec<ReportLogEntry>> {
        self.store.read(|conn| fetch_report_logs(conn, date_filter))
    }
}

impl ReportLog for SqliteReportLog {
    fn record(&self, entry: &ReportLogEntry) -> Result<()> {
        let conn = self.store.write_connection()?;
        insert_report_log(&conn, entry)
    }
}

// ============================================================================
// GENERATOR
// ============================================================================

pub struct ReportGenerator<R, L> {
    store: ReportStore,
    output_dir: PathBuf,
    renderer: R,
    log: L,
}

impl<R: DocumentRenderer, L: ReportLog> ReportGenerator<R, L> {
    pub fn new(store: ReportStore, output_dir: impl Into<PathBuf>, renderer: R, log: L) -> Self {
        ReportGenerator {
            store,
            output_dir: output_dir.into(),
            renderer,
            log,
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn log(&self) -> &L {
        &self.log
    }

    /// Output file for a member's document generated on `date`
    ///
    /// The extension is whatever the renderer actually writes.
    pub fn output_path(&self, report_type: ReportType, member: &MemberId, template: &Path, date: BsDate) -> PathBuf {
        let extension = self.renderer.extension(template);
        self.output_dir.join(format!(
            "{}_{}_{}.{}",
            report_type.file_stem(),
            member,
            date.compact(),
            extension
        ))
    }

    pub fn generate(&self, request: &ReportRequest) -> Result<GeneratedReport, ReportError> {
        let member = request.validate()?;

        let context = prepare_report_context(&self.store, &member, &request.staff);
        if context.is_empty() {
            return Err(ReportError::NoData(member.to_string()));
        }

        let today = BsDate::today()
            .ok_or_else(|| ReportError::Render(anyhow::anyhow!("Today's date is outside the BS calendar")))?;
        let output = self.output_path(request.report_type, &member, &request.template, today);

        fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("Failed to create {}", self.output_dir.display()))
            .map_err(ReportError::Render)?;

        self.renderer
            .render(&request.template, &context, &output)
            .with_context(|| format!("Failed to render {}", request.template.display()))
            .map_err(ReportError::Render)?;

        let log_entry = ReportLogEntry::new(
            member.as_str(),
            request.report_type.as_str(),
            &output.to_string_lossy(),
            &request.generated_by,
        );
        // The document exists at this point; a log failure is reported but not fatal
        if let Err(e) = self.log.record(&log_entry) {
            warn!(member = %member, error = %format!("{:#}", e), "failed to record report generation");
        }

        info!(
            member = %member,
            report = request.report_type.as_str(),
            output = %output.display(),
            "report generated"
        );

        Ok(GeneratedReport {
            member,
            report_type: request.report_type,
            output,
            log_entry,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingLog {
        entries: RefCell<Vec<ReportLogEntry>>,
    }

    impl ReportLog for RecordingLog {
        fn record(&self, entry: &ReportLogEntry) -> Result<()> {
            self.entries.borrow_mut().push(entry.clone());
            Ok(())
        }
    }

    fn request(member: &str, approver: &str) -> ReportRequest {
        ReportRequest {
            member: member.to_string(),
            report_type: ReportType::Tamasuk,
            template: PathBuf::from("templates/tamasuk.docx"),
            staff: StaffInfo::approver(approver, "Manager"),
            generated_by: "operator".to_string(),
        }
    }

    #[test]
    fn test_validate_requires_member() {
        let err = request("  ", "Ram").validate().unwrap_err();
        assert!(matches!(err, ReportError::MissingMember));
    }

    #[test]
    fn test_validate_rejects_overlong_member() {
        let err = request("1234567890", "Ram").validate().unwrap_err();
        assert!(matches!(err, ReportError::InvalidMemberId(_)));
    }

    #[test]
    fn test_validate_requires_approver() {
        let err = request("123", " ").validate().unwrap_err();
        assert!(matches!(err, ReportError::MissingApprover));
    }

    #[test]
    fn test_validate_normalizes_member() {
        let member = request("123", "Ram").validate().unwrap();
        assert_eq!(member.as_str(), "000000123");
    }

    #[test]
    fn test_output_path_shape() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("loan.db");
        rusqlite::Connection::open(&db).unwrap().execute_batch("CREATE TABLE t (x)").unwrap();
        let store = ReportStore::open(&db).unwrap();

        let generator = ReportGenerator::new(store, "out", JsonContextRenderer, RecordingLog::default());
        let member = MemberId::normalize("123").unwrap();
        let date = BsDate::new(2082, 3, 5).unwrap();

        let path = generator.output_path(ReportType::Tamasuk, &member, Path::new("t/tamasuk.docx"), date);
        assert_eq!(path, PathBuf::from("out/तमसुक_000000123_20820305.json"));

        let path = generator.output_path(ReportType::LoanApplication, &member, Path::new("plain"), date);
        assert_eq!(path, PathBuf::from("out/ऋण आवेदन_000000123_20820305.json"));
    }

    struct DocxRenderer;

    impl DocumentRenderer for DocxRenderer {
        fn render(&self, _template: &Path, _context: &ContextMap, _output: &Path) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_default_extension_follows_template() {
        assert_eq!(DocxRenderer.extension(Path::new("t/tamasuk.docx")), "docx");
        assert_eq!(DocxRenderer.extension(Path::new("t/form.odt")), "odt");
        assert_eq!(DocxRenderer.extension(Path::new("plain")), "docx");
        assert_eq!(JsonContextRenderer.extension(Path::new("t/tamasuk.docx")), "json");
    }

    #[test]
    fn test_json_generation_logs_the_written_file() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("loan.db");
        let conn = rusqlite::Connection::open(&db).unwrap();
        crate::db::setup_database(&conn).unwrap();
        conn.execute(
            "INSERT INTO member_info (member_number, member_name) VALUES ('000000123', 'Ram')",
            [],
        )
        .unwrap();
        drop(conn);

        let store = ReportStore::open(&db).unwrap();
        let generator = ReportGenerator::new(store, dir.path().join("out"), JsonContextRenderer, RecordingLog::default());

        let generated = generator.generate(&request("123", "Manager")).unwrap();

        assert_eq!(generated.output.extension().and_then(|e| e.to_str()), Some("json"));
        let written = fs::read_to_string(&generated.output).unwrap();
        assert!(written.starts_with('{'));

        let entries = generator.log().entries.borrow();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].file_path, generated.output.to_string_lossy());
    }

    #[test]
    fn test_json_renderer_writes_context() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("context.json");
        let mut context = ContextMap::new();
        context.insert("member_name".to_string(), serde_json::json!("Ram"));

        JsonContextRenderer.render(Path::new("unused"), &context, &output).unwrap();

        let written: ContextMap = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written, context);
    }
}
