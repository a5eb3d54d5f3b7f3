use anyhow::Result;
use rusqlite::Connection;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use loan_report::{
    check_placeholders, parse_placeholders, prepare_report_context, setup_database, AppConfig,
    JsonContextRenderer, MemberId, ReportError, ReportGenerator, ReportRequest, ReportStore,
    ReportType, SqliteReportLog, StaffInfo,
};

const USAGE: &str = "Usage: loan-report <command>

Commands:
  init                                   Create the database schema
  context <member>                       Print the report context as JSON
  check <member> <template-text-file>    Compare template placeholders with the context
  generate <member> <loan-application|tamasuk> <template> <approver-name>
           [approver-post] [entered-name] [entered-post]
  logs [bs-date]                         List generated reports";

fn main() {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            std::process::exit(1);
        }
    };
    init_logging(&config);

    let args: Vec<String> = env::args().skip(1).collect();
    if let Err(e) = run(&config, &args) {
        // User-facing errors carry their own message
        match e.downcast_ref::<ReportError>() {
            Some(report_error) => eprintln!("❌ {}", report_error),
            None => eprintln!("❌ {:#}", e),
        }
        std::process::exit(1);
    }
}

fn init_logging(config: &AppConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(config.log_filter())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(config: &AppConfig, args: &[String]) -> Result<()> {
    let arg = |i: usize| args.get(i).map(String::as_str);

    match arg(0) {
        Some("init") => run_init(&config.database_path),
        Some("context") => run_context(config, arg(1).unwrap_or("")),
        Some("check") => match arg(2) {
            Some(template) => run_check(config, arg(1).unwrap_or(""), Path::new(template)),
            None => usage(),
        },
        Some("generate") => {
            let (Some(member), Some(kind), Some(template)) = (arg(1), arg(2), arg(3)) else {
                return usage();
            };
            let staff = StaffInfo {
                approved_by_name: arg(4).unwrap_or("").to_string(),
                approved_by_post: arg(5).unwrap_or("").to_string(),
                entered_by_name: arg(6).unwrap_or("").to_string(),
                entered_by_post: arg(7).unwrap_or("").to_string(),
            };
            run_generate(config, member, kind, Path::new(template), staff)
        }
        Some("logs") => run_logs(config, arg(1)),
        _ => usage(),
    }
}

fn usage() -> Result<()> {
    println!("{}", USAGE);
    Ok(())
}

fn run_init(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let conn = Connection::open(db_path)?;
    setup_database(&conn)?;
    println!("✓ Database initialized at {} (WAL mode)", db_path.display());
    Ok(())
}

fn open_store(config: &AppConfig) -> Result<ReportStore> {
    ReportStore::open(&config.database_path).map_err(|e| ReportError::Store(e).into())
}

fn run_context(config: &AppConfig, member: &str) -> Result<()> {
    let member = MemberId::normalize(member)?;
    let store = open_store(config)?;

    let context = prepare_report_context(&store, &member, &StaffInfo::default());
    if context.is_empty() {
        return Err(ReportError::NoData(member.to_string()).into());
    }

    println!("{}", serde_json::to_string_pretty(&context)?);
    Ok(())
}

fn run_check(config: &AppConfig, member: &str, template: &Path) -> Result<()> {
    let member = MemberId::normalize(member)?;
    let store = open_store(config)?;
    let text = fs::read_to_string(template)?;

    let context = prepare_report_context(&store, &member, &StaffInfo::default());
    if context.is_empty() {
        return Err(ReportError::NoData(member.to_string()).into());
    }

    let placeholders = parse_placeholders(&text);
    let report = check_placeholders(placeholders.iter().map(String::as_str), &context);

    println!("📄 {} placeholders in {}", placeholders.len(), template.display());
    if report.is_complete() {
        println!("✅ Every placeholder has a value in the context");
    } else {
        println!("⚠️  Missing from context ({}):", report.missing.len());
        for name in &report.missing {
            println!("   - {}", name);
        }
    }
    println!("ℹ️  Context keys not used by this template: {}", report.unused.len());

    Ok(())
}

fn run_generate(config: &AppConfig, member: &str, kind: &str, template: &Path, staff: StaffInfo) -> Result<()> {
    let report_type = ReportType::parse(kind)
        .ok_or_else(|| anyhow::anyhow!("Unknown report type '{}'", kind))?;

    let request = ReportRequest {
        member: member.to_string(),
        report_type,
        template: PathBuf::from(template),
        staff,
        generated_by: config.generated_by.clone(),
    };
    // Validate before the store is even opened
    request.validate()?;

    let store = open_store(config)?;
    let generator = ReportGenerator::new(
        store.clone(),
        &config.output_dir,
        JsonContextRenderer,
        SqliteReportLog::new(store),
    );

    let generated = generator.generate(&request)?;
    println!("✅ Report generated: {}", generated.output.display());
    Ok(())
}

fn run_logs(config: &AppConfig, date: Option<&str>) -> Result<()> {
    let log = SqliteReportLog::new(open_store(config)?);
    let entries = log.list(date)?;

    if entries.is_empty() {
        println!("No reports generated");
        return Ok(());
    }

    println!("📊 {} report(s)", entries.len());
    for entry in entries {
        println!(
            "{}  {:<16}  {}  {}  {}",
            entry.generated_date, entry.report_type, entry.member_number, entry.generated_by, entry.file_path
        );
    }
    Ok(())
}
