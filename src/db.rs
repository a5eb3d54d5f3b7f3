use anyhow::{bail, Context, Result};
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OpenFlags, Row};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::calendar::{bs_now_timestamp, normalize_date_str};

/// One shaped row: store column name → value
///
/// Rows are kept as maps rather than structs so the context map can carry
/// every column a template might name without a schema change here.
pub type Record = serde_json::Map<String, Value>;

/// Surrogate key column, never part of a shaped record
const SURROGATE_COLUMN: &str = "id";

// ============================================================================
// SCHEMA
// ============================================================================

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode so readers never block the data-entry forms
    conn.pragma_update(None, "journal_mode", "WAL")?;

    // ==========================================================================
    // Member profile + loan request (the two central records)
    // ==========================================================================
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS member_info (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT,
            member_number TEXT UNIQUE NOT NULL,
            member_name TEXT,
            address TEXT,
            ward_no TEXT,
            phone TEXT,
            dob_bs TEXT,
            citizenship_no TEXT,
            father_name TEXT,
            grandfather_name TEXT,
            spouse_name TEXT,
            spouse_phone TEXT,
            business_name TEXT,
            business_address TEXT,
            job_name TEXT,
            job_address TEXT,
            email TEXT,
            profession TEXT,
            facebook_detail TEXT,
            whatsapp_detail TEXT
        );

        CREATE TABLE IF NOT EXISTS loan_info (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            member_number TEXT NOT NULL,
            loan_type TEXT,
            interest_rate REAL,
            loan_duration TEXT,
            repayment_duration TEXT,
            loan_amount TEXT,
            loan_amount_in_words TEXT,
            loan_completion_year TEXT,
            loan_completion_month TEXT,
            loan_completion_day TEXT,
            status TEXT NOT NULL DEFAULT 'pending'
                CHECK (status IN ('pending', 'approved', 'active', 'cleared', 'rejected'))
        );

        CREATE TABLE IF NOT EXISTS approval_info (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            member_number TEXT NOT NULL,
            approval_date TEXT,
            entered_by TEXT,
            entered_post TEXT,
            approved_by TEXT,
            approved_post TEXT,
            remarks TEXT,
            approved_loan_amount TEXT,
            approved_loan_amount_words TEXT
        );",
    )?;

    // ==========================================================================
    // Collateral (savings, land, affiliations, household, projects)
    // ==========================================================================
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS collateral_basic (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            member_number TEXT NOT NULL,
            monthly_saving TEXT,
            child_saving TEXT,
            total_saving TEXT
        );

        CREATE TABLE IF NOT EXISTS collateral_properties (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            member_number TEXT NOT NULL,
            owner_name TEXT,
            father_or_spouse TEXT,
            grandfather_or_father_inlaw TEXT,
            district TEXT,
            municipality_vdc TEXT,
            sheet_no TEXT,
            ward_no TEXT,
            plot_no TEXT,
            area TEXT,
            land_type TEXT
        );

        CREATE TABLE IF NOT EXISTS collateral_affiliations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            member_number TEXT NOT NULL,
            institution TEXT,
            address TEXT,
            position TEXT,
            estimated_income TEXT,
            remarks TEXT
        );

        CREATE TABLE IF NOT EXISTS collateral_family_details (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            member_number TEXT NOT NULL,
            name TEXT,
            age TEXT,
            relation TEXT,
            member_of_org TEXT,
            occupation TEXT,
            monthly_income TEXT
        );

        CREATE TABLE IF NOT EXISTS collateral_income_expense (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            member_number TEXT NOT NULL,
            field TEXT,
            amount TEXT,
            type TEXT
        );

        CREATE TABLE IF NOT EXISTS collateral_projects (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            member_number TEXT NOT NULL,
            project_name TEXT,
            self_investment TEXT,
            requested_loan_amount TEXT,
            total_cost TEXT,
            remarks TEXT
        );",
    )?;

    // ==========================================================================
    // People vouching for the loan
    // ==========================================================================
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS loan_witness (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            member_number TEXT NOT NULL,
            name TEXT,
            relation TEXT,
            address_mun TEXT,
            ward_no TEXT,
            address_tole TEXT,
            age TEXT
        );

        CREATE TABLE IF NOT EXISTS guarantor_details (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            member_number TEXT NOT NULL,
            guarantor_member_number TEXT,
            guarantor_name TEXT,
            guarantor_address TEXT,
            guarantor_ward TEXT,
            guarantor_phone TEXT,
            guarantor_citizenship TEXT,
            guarantor_grandfather TEXT,
            guarantor_father TEXT,
            guarantor_issue_dist TEXT,
            guarantor_age TEXT
        );

        CREATE TABLE IF NOT EXISTS consent_details (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            member_number TEXT NOT NULL,
            person_name TEXT,
            grandfather_name TEXT,
            father_name TEXT,
            age TEXT,
            district TEXT,
            municipality TEXT,
            ward_no TEXT,
            tole TEXT
        );",
    )?;

    // ==========================================================================
    // Report log (one row per generated document)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS report_tracking (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            event_id TEXT UNIQUE NOT NULL,
            member_number TEXT NOT NULL,
            report_type TEXT NOT NULL,
            file_path TEXT NOT NULL,
            generated_by TEXT NOT NULL,
            generated_date TEXT NOT NULL
        )",
        [],
    )?;

    // ==========================================================================
    // Indexes (every fetch is scoped by member_number)
    // ==========================================================================
    for table in [
        "loan_info",
        "approval_info",
        "collateral_basic",
        "collateral_properties",
        "collateral_affiliations",
        "collateral_family_details",
        "collateral_income_expense",
        "collateral_projects",
        "loan_witness",
        "guarantor_details",
        "consent_details",
        "report_tracking",
    ] {
        conn.execute(
            &format!(
                "CREATE INDEX IF NOT EXISTS idx_{table}_member ON {table}(member_number)"
            ),
            [],
        )?;
    }

    Ok(())
}

// ============================================================================
// ROW SHAPING
// ============================================================================

/// Column names of a prepared statement, owned so the statement can be queried
pub fn column_names(stmt: &rusqlite::Statement<'_>) -> Vec<String> {
    stmt.column_names().into_iter().map(String::from).collect()
}

/// Shape a row into a `Record` keyed by column name
///
/// NULL → null, INTEGER/REAL → number, TEXT → string. BLOB columns and the
/// surrogate `id` are skipped.
pub fn row_to_record(row: &Row<'_>, columns: &[String]) -> rusqlite::Result<Record> {
    let mut record = Record::new();

    for (idx, name) in columns.iter().enumerate() {
        if name == SURROGATE_COLUMN {
            continue;
        }

        let value = match row.get_ref(idx)? {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::from(i),
            ValueRef::Real(f) => serde_json::Number::from_f64(f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
            ValueRef::Blob(_) => continue,
        };

        record.insert(name.clone(), value);
    }

    Ok(record)
}

// ============================================================================
// REPORT STORE
// ============================================================================

/// Handle to the embedded member database
///
/// Holds only the path: every aggregation opens its own read-only connection
/// and one read transaction, and drops both before returning. Nothing is
/// cached between calls.
#[derive(Debug, Clone)]
pub struct ReportStore {
    path: PathBuf,
}

impl ReportStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            bail!("Database not found at {}", path.display());
        }
        Ok(ReportStore {
            path: path.to_path_buf(),
        })
    }

    /// Run `f` inside a single short-lived read transaction
    ///
    /// All fetchers of one aggregation see the same snapshot of the store.
    pub fn read<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("Failed to open {} read-only", self.path.display()))?;

        let tx = conn
            .unchecked_transaction()
            .context("Failed to begin read transaction")?;
        debug!(path = %self.path.display(), "read transaction opened");

        let result = f(&tx);

        // Nothing was written; ending the transaction only releases the snapshot
        if let Err(e) = tx.finish() {
            warn!(error = %e, "failed to close read transaction");
        }

        result
    }

    /// Read-write connection, used only by the report log sink
    pub fn write_connection(&self) -> Result<Connection> {
        Connection::open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))
    }
}

// ============================================================================
// REPORT LOG STORAGE
// ============================================================================

/// One document generation event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportLogEntry {
    pub event_id: String,
    pub member_number: String,
    pub report_type: String,
    pub file_path: String,
    pub generated_by: String,
    /// BS timestamp "YYYY-MM-DD HH:MM:SS"
    pub generated_date: String,
}

impl ReportLogEntry {
    pub fn new(member_number: &str, report_type: &str, file_path: &str, generated_by: &str) -> Self {
        let generated_date = bs_now_timestamp().unwrap_or_else(|| {
            warn!("current date is outside the BS calendar table; logging without timestamp");
            String::new()
        });

        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            member_number: member_number.to_string(),
            report_type: report_type.to_string(),
            file_path: file_path.to_string(),
            generated_by: generated_by.to_string(),
            generated_date,
        }
    }
}

/// Insert a generation event into the report log
pub fn insert_report_log(conn: &Connection, entry: &ReportLogEntry) -> Result<()> {
    conn.execute(
        "INSERT INTO report_tracking (
            event_id, member_number, report_type, file_path, generated_by, generated_date
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            entry.event_id,
            entry.member_number,
            entry.report_type,
            entry.file_path,
            entry.generated_by,
            entry.generated_date,
        ],
    )
    .context("Failed to insert report log entry")?;

    Ok(())
}

/// List report log entries, newest first
///
/// `date_filter` is a BS date ('/' or '-' separated) matched against the
/// date part of `generated_date`.
pub fn fetch_report_logs(conn: &Connection, date_filter: Option<&str>) -> Result<Vec<ReportLogEntry>> {
    let map_row = |row: &Row<'_>| -> rusqlite::Result<ReportLogEntry> {
        Ok(ReportLogEntry {
            event_id: row.get(0)?,
            member_number: row.get(1)?,
            report_type: row.get(2)?,
            file_path: row.get(3)?,
            generated_by: row.get(4)?,
            generated_date: row.get(5)?,
        })
    };

    let base = "SELECT event_id, member_number, report_type, file_path, generated_by, generated_date
                FROM report_tracking";

    let entries = match date_filter {
        Some(raw) => {
            let day = normalize_date_str(raw)
                .with_context(|| format!("Invalid BS date filter '{}'", raw))?;
            let mut stmt = conn.prepare(&format!(
                "{base} WHERE substr(generated_date, 1, 10) = ?1 ORDER BY generated_date DESC, id DESC"
            ))?;
            let rows = stmt.query_map([day], map_row)?;
            rows.collect::<Result<Vec<_>, _>>()?
        }
        None => {
            let mut stmt = conn.prepare(&format!("{base} ORDER BY generated_date DESC, id DESC"))?;
            let rows = stmt.query_map([], map_row)?;
            rows.collect::<Result<Vec<_>, _>>()?
        }
    };

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        setup_database(&conn).unwrap();

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 13);
    }

    #[test]
    fn test_loan_status_is_constrained() {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();

        conn.execute(
            "INSERT INTO loan_info (member_number, loan_amount) VALUES ('000000001', '100')",
            [],
        )
        .unwrap();
        let status: String = conn
            .query_row("SELECT status FROM loan_info", [], |row| row.get(0))
            .unwrap();
        assert_eq!(status, "pending");

        let bad = conn.execute(
            "INSERT INTO loan_info (member_number, status) VALUES ('000000001', 'lost')",
            [],
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_row_to_record_shapes_types() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT, rate REAL, n INTEGER, missing TEXT, raw BLOB);
             INSERT INTO t (name, rate, n, missing, raw) VALUES ('Sita', 12.5, 3, NULL, x'00');",
        )
        .unwrap();

        let mut stmt = conn.prepare("SELECT * FROM t").unwrap();
        let columns = column_names(&stmt);
        let record = stmt
            .query_row([], |row| row_to_record(row, &columns))
            .unwrap();

        assert!(!record.contains_key("id"));
        assert!(!record.contains_key("raw"));
        assert_eq!(record["name"], serde_json::json!("Sita"));
        assert_eq!(record["rate"], serde_json::json!(12.5));
        assert_eq!(record["n"], serde_json::json!(3));
        assert_eq!(record["missing"], Value::Null);
    }

    #[test]
    fn test_report_log_round_trip_and_filter() {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();

        let mut first = ReportLogEntry::new("000000123", "loan_application", "out/a.docx", "admin");
        first.generated_date = "2082-03-05 10:00:00".to_string();
        let mut second = ReportLogEntry::new("000000123", "tamasuk", "out/b.docx", "admin");
        second.generated_date = "2082-03-06 09:30:00".to_string();

        insert_report_log(&conn, &first).unwrap();
        insert_report_log(&conn, &second).unwrap();

        let all = fetch_report_logs(&conn, None).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].report_type, "tamasuk");

        let filtered = fetch_report_logs(&conn, Some("2082/3/5")).unwrap();
        assert_eq!(filtered, vec![first]);

        assert!(fetch_report_logs(&conn, Some("yesterday")).is_err());
    }

    #[test]
    fn test_store_open_requires_existing_file() {
        assert!(ReportStore::open("/definitely/not/here.db").is_err());
    }
}
