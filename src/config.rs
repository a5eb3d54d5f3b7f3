// ⚙️ Configuration - where the database lives and where documents go
//
// Resolution order (later wins):
//   1. Built-in defaults
//   2. JSON file: $LOAN_REPORT_CONFIG, else ./loan-report.json if present
//   3. Environment: LOAN_REPORT_DB, LOAN_REPORT_OUTPUT_DIR

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

pub const CONFIG_FILE: &str = "loan-report.json";
pub const CONFIG_ENV: &str = "LOAN_REPORT_CONFIG";
pub const DB_ENV: &str = "LOAN_REPORT_DB";
pub const OUTPUT_DIR_ENV: &str = "LOAN_REPORT_OUTPUT_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub output_dir: PathBuf,
    /// tracing filter directives, e.g. "info" or "warn,loan_report=debug"
    pub log_level: String,
    /// Operator name written to the report log
    pub generated_by: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_path: PathBuf::from("data/loan_app.db"),
            output_dir: PathBuf::from("generated_reports"),
            log_level: "info".to_string(),
            generated_by: String::new(),
        }
    }
}

impl AppConfig {
    /// Parse a JSON config file; absent keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Apply overrides from a variable lookup (the process environment in `load`)
    pub fn apply_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(db) = lookup(DB_ENV).filter(|v| !v.trim().is_empty()) {
            self.database_path = PathBuf::from(db);
        }
        if let Some(dir) = lookup(OUTPUT_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            self.output_dir = PathBuf::from(dir);
        }
        self
    }

    /// Subscriber filter for `log_level`; unparsable directives fall back to "info"
    pub fn log_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.log_level).unwrap_or_else(|_| EnvFilter::new("info"))
    }

    /// Defaults, then the config file if any, then the environment
    pub fn load() -> Result<Self> {
        let explicit = std::env::var(CONFIG_ENV).ok().map(PathBuf::from);
        let base = match explicit {
            Some(path) => Self::from_file(&path)?,
            None if Path::new(CONFIG_FILE).exists() => Self::from_file(Path::new(CONFIG_FILE))?,
            None => Self::default(),
        };
        Ok(base.apply_overrides(|key| std::env::var(key).ok()))
    }
}
