// Loan Report Engine - Core Library
// Exposes all modules for use in the CLI and tests

pub mod calendar;   // Bikram Sambat calendar
pub mod numerals;   // Devanagari digit localization
pub mod words;      // Nepali currency words
pub mod error;      // User-facing errors
pub mod db;         // Schema, row shaping, store handle, report log
pub mod entities;   // Entity catalog + fetchers
pub mod merge;      // Rename-then-merge of colliding fields
pub mod templates;  // Report types + placeholder checking
pub mod context;    // Context aggregator
pub mod report;     // Generation pipeline
pub mod config;     // Application configuration

// Re-export commonly used types
pub use calendar::{age_from_dob, age_on, normalize_date_str, BsDate};
pub use numerals::{delocalize_digits, localize_digits, localize_value};
pub use words::{amount_str_to_words, amount_to_words, number_to_words, INVALID_AMOUNT};
pub use error::ReportError;
pub use db::{
    fetch_report_logs, insert_report_log, setup_database,
    Record, ReportLogEntry, ReportStore,
};
pub use entities::{Cardinality, Entity, MemberId};
pub use merge::{merge_sources, resolve_collisions, Rename, Source};
pub use templates::{
    all_placeholders, check_placeholders, parse_placeholders,
    PlaceholderReport, ReportType, COLLECTION_KEYS,
};
pub use context::{
    build_context, prepare_context_with, prepare_report_context,
    ContextMap, MemberRecords, StaffInfo,
};
pub use report::{
    DocumentRenderer, GeneratedReport, JsonContextRenderer,
    ReportGenerator, ReportLog, ReportRequest, SqliteReportLog,
};
pub use config::AppConfig;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
