// 🗂️ Report Context - one flat map per member for the document renderer
//
// Pipeline (one call = one member):
//   1. Fetch every entity inside one read transaction
//   2. Normalize dates through the BS calendar
//   3. Localize display quantities to Devanagari digits
//   4. Spell requested/approved amounts in words
//   5. Derive age and today's BS breakdown
//   6. Rename colliding keys (see merge.rs)
//   7. Merge singles + derived fields, attach collections under fixed keys
//
// Any store failure is logged and turned into an empty map, which the
// caller presents as "no data found".

use anyhow::Result;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::calendar::{age_on, BsDate};
use crate::db::{Record, ReportStore};
use crate::entities::{self, Entity, MemberId};
use crate::merge::{merge_sources, Source};
use crate::numerals::{localize_digits, localize_value};
use crate::templates::{all_placeholders, COLLECTION_KEYS};
use crate::words::{amount_str_to_words, INVALID_AMOUNT};

/// The flat key-value map handed to the document renderer
pub type ContextMap = Record;

/// Deprecated column names still found in older approval rows → canonical name
const APPROVAL_ALIASES: [(&str, &str); 2] = [
    ("entered_designation", "entered_post"),
    ("approved_designation", "approved_post"),
];

/// Join key repeated in every table; only the profile's copy is kept
const JOIN_KEY: &str = "member_number";

// ============================================================================
// STAFF INFO
// ============================================================================

/// Free-text staff identification supplied by the caller
///
/// Empty fields fall back to what the approval record says.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaffInfo {
    pub entered_by_name: String,
    pub entered_by_post: String,
    pub approved_by_name: String,
    pub approved_by_post: String,
}

impl StaffInfo {
    pub fn approver(name: &str, post: &str) -> Self {
        StaffInfo {
            approved_by_name: name.to_string(),
            approved_by_post: post.to_string(),
            ..Default::default()
        }
    }
}

// ============================================================================
// MEMBER RECORDS (step 1)
// ============================================================================

/// Everything stored about one member, exactly as fetched
#[derive(Debug, Clone, Default)]
pub struct MemberRecords {
    pub profile: Record,
    pub loan: Record,
    pub collateral_basic: Record,
    pub affiliations: Vec<Record>,
    pub properties: Vec<Record>,
    pub family: Vec<Record>,
    pub income_expense: Vec<Record>,
    pub projects: Vec<Record>,
    pub approval: Record,
    pub witnesses: Vec<Record>,
    pub guarantors: Vec<Record>,
    pub consent: Record,
}

/// Log a fetch failure with its entity before passing it up
fn logged<T>(entity: Entity, member: &MemberId, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        error!(entity = entity.as_str(), member = %member, error = %format!("{:#}", e), "fetch failed");
    }
    result
}

impl MemberRecords {
    /// Run every fetcher in the fixed order against one connection
    ///
    /// Absent entities come back empty; only store failures are errors.
    pub fn fetch(conn: &Connection, member: &MemberId) -> Result<Self> {
        let records = MemberRecords {
            profile: logged(Entity::MemberProfile, member, entities::fetch_member_profile(conn, member))?,
            loan: logged(Entity::LoanRequest, member, entities::fetch_loan_request(conn, member))?,
            collateral_basic: logged(
                Entity::CollateralBasic,
                member,
                entities::fetch_collateral_basic(conn, member),
            )?,
            affiliations: logged(
                Entity::CollateralAffiliations,
                member,
                entities::fetch_collateral_affiliations(conn, member),
            )?,
            properties: logged(
                Entity::CollateralProperties,
                member,
                entities::fetch_collateral_properties(conn, member),
            )?,
            family: logged(Entity::FamilyDetails, member, entities::fetch_family_details(conn, member))?,
            income_expense: logged(
                Entity::IncomeExpense,
                member,
                entities::fetch_income_expense(conn, member),
            )?,
            projects: logged(
                Entity::ProjectDetails,
                member,
                entities::fetch_project_details(conn, member),
            )?,
            approval: logged(
                Entity::ApprovalRecord,
                member,
                entities::fetch_approval_record(conn, member),
            )?,
            witnesses: logged(
                Entity::WitnessDetails,
                member,
                entities::fetch_witness_details(conn, member),
            )?,
            guarantors: logged(
                Entity::GuarantorDetails,
                member,
                entities::fetch_guarantor_details(conn, member),
            )?,
            consent: logged(
                Entity::ConsentDetails,
                member,
                entities::fetch_consent_details(conn, member),
            )?,
        };

        debug!(
            member = %member,
            has_profile = !records.profile.is_empty(),
            has_loan = !records.loan.is_empty(),
            has_approval = !records.approval.is_empty(),
            family = records.family.len(),
            witnesses = records.witnesses.len(),
            guarantors = records.guarantors.len(),
            "member records fetched"
        );

        Ok(records)
    }
}

// ============================================================================
// FIELD HELPERS
// ============================================================================

/// Display text of a field; missing and null are ""
fn text(record: &Record, key: &str) -> String {
    match record.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(_) => String::new(),
    }
}

/// Localized display text of a field; missing and null are ""
fn localized(record: &Record, key: &str) -> String {
    record.get(key).map(localize_value).unwrap_or_default()
}

/// Replace a field's value with its localized form, if present
fn localize_in_place(record: &mut Record, key: &str) {
    if let Some(value) = record.get_mut(key) {
        *value = Value::String(localize_value(value));
    }
}

/// Canonicalize a date field in place; unparsable dates keep their raw text
fn normalize_date_in_place(record: &mut Record, key: &str) -> Option<BsDate> {
    let raw = text(record, key);
    if raw.is_empty() {
        return None;
    }
    match BsDate::parse(&raw) {
        Some(date) => {
            record.insert(key.to_string(), Value::String(date.to_string()));
            Some(date)
        }
        None => {
            debug!(field = key, value = %raw, "not a BS date, kept as entered");
            None
        }
    }
}

/// Fold deprecated alias columns into their canonical names
fn canonicalize_aliases(record: &mut Record, aliases: &[(&str, &str)]) {
    for &(alias, canonical) in aliases {
        if let Some(value) = record.remove(alias) {
            if text(record, canonical).is_empty() {
                record.insert(canonical.to_string(), value);
            }
        }
    }
}

/// Amount in words for a stored amount; "" when empty, "" + warning when invalid
fn amount_words(raw: &str, field: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let words = amount_str_to_words(raw);
    if words == INVALID_AMOUNT {
        warn!(field, value = %raw, "amount is not a non-negative integer; left blank in words");
        return String::new();
    }
    words
}

/// Caller value when given, otherwise the stored one
fn prefer(caller: &str, stored: String) -> String {
    let caller = caller.trim();
    if caller.is_empty() {
        stored
    } else {
        caller.to_string()
    }
}

fn insert(derived: &mut Record, key: &str, value: String) {
    derived.insert(key.to_string(), Value::String(value));
}

// ============================================================================
// BUILD CONTEXT (steps 2-7)
// ============================================================================

/// Shape fetched records into the context map
///
/// Pure: no store access and no clock. `today` is `None` only when the
/// clock is outside the calendar table, in which case date-derived fields
/// are blank. A member without a profile yields an empty map.
pub fn build_context(records: MemberRecords, staff: &StaffInfo, today: Option<BsDate>) -> ContextMap {
    let MemberRecords {
        mut profile,
        mut loan,
        mut collateral_basic,
        affiliations,
        properties,
        mut family,
        income_expense,
        projects,
        mut approval,
        mut witnesses,
        mut guarantors,
        mut consent,
    } = records;

    if profile.is_empty() {
        return ContextMap::new();
    }

    for secondary in [&mut loan, &mut collateral_basic, &mut approval, &mut consent] {
        secondary.remove(JOIN_KEY);
    }
    canonicalize_aliases(&mut approval, &APPROVAL_ALIASES);

    let mut derived = Record::new();

    // -- Dates ---------------------------------------------------------------
    let dob = normalize_date_in_place(&mut profile, "dob_bs");
    normalize_date_in_place(&mut profile, "date");
    normalize_date_in_place(&mut approval, "approval_date");

    let age = match (dob, today) {
        (Some(dob), Some(today)) => age_on(&dob.to_string(), today),
        _ => None,
    };
    insert(&mut derived, "age", age.map(|a| localize_digits(&a.to_string())).unwrap_or_default());
    insert(&mut derived, "dob_bs_nep", localized(&profile, "dob_bs"));
    insert(&mut derived, "date_bs", localized(&profile, "date"));
    insert(&mut derived, "approved_date_bs", localized(&approval, "approval_date"));

    match today {
        Some(today) => {
            insert(&mut derived, "today_bs", localize_digits(&today.to_string()));
            insert(&mut derived, "bs_year", localize_digits(&today.year().to_string()));
            insert(&mut derived, "bs_month", localize_digits(&today.month().to_string()));
            insert(&mut derived, "bs_day", localize_digits(&today.day().to_string()));
            insert(&mut derived, "bs_month_name", today.month_name().to_string());
            // 1 = Sunday
            insert(&mut derived, "bs_roj", localize_digits(&(today.weekday() + 1).to_string()));
        }
        None => {
            warn!("today is outside the BS calendar table; date fields left blank");
            for key in ["today_bs", "bs_year", "bs_month", "bs_day", "bs_month_name", "bs_roj"] {
                insert(&mut derived, key, String::new());
            }
        }
    }

    // Loan completion date is stored as three parts
    let completion_parts = (
        text(&loan, "loan_completion_year"),
        text(&loan, "loan_completion_month"),
        text(&loan, "loan_completion_day"),
    );
    let completion = {
        let (y, m, d) = &completion_parts;
        match (y.parse::<i32>(), m.parse::<u32>(), d.parse::<u32>()) {
            (Ok(y), Ok(m), Ok(d)) => BsDate::new(y, m, d),
            _ => None,
        }
    };
    match completion {
        Some(date) => {
            insert(&mut derived, "bs_year_lastdate", localize_digits(&format!("{:04}", date.year())));
            insert(&mut derived, "bs_month_lastdate", localize_digits(&format!("{:02}", date.month())));
            insert(&mut derived, "bs_day_lastdate", localize_digits(&format!("{:02}", date.day())));
            insert(&mut derived, "loan_completion_date_bs", localize_digits(&date.to_string()));
        }
        None => {
            let (y, m, d) = completion_parts;
            if !(y.is_empty() && m.is_empty() && d.is_empty()) {
                debug!(year = %y, month = %m, day = %d, "loan completion date is not a BS date");
            }
            insert(&mut derived, "bs_year_lastdate", localize_digits(&y));
            insert(&mut derived, "bs_month_lastdate", localize_digits(&m));
            insert(&mut derived, "bs_day_lastdate", localize_digits(&d));
            insert(&mut derived, "loan_completion_date_bs", String::new());
        }
    }

    // -- Localized display quantities -----------------------------------------
    localize_in_place(&mut profile, JOIN_KEY);
    for (target, record, key) in [
        ("ward_no_nep", &profile, "ward_no"),
        ("phone_nep", &profile, "phone"),
        ("citizenship_no_nep", &profile, "citizenship_no"),
        ("loan_amount_nep", &loan, "loan_amount"),
        ("interest_rate_nep", &loan, "interest_rate"),
        ("monthly_saving_nep", &collateral_basic, "monthly_saving"),
        ("child_saving_nep", &collateral_basic, "child_saving"),
        ("total_saving_nep", &collateral_basic, "total_saving"),
        ("approved_loan_amount_nep", &approval, "approved_loan_amount"),
    ] {
        insert(&mut derived, target, localized(record, key));
    }

    // -- Amounts in words (stored word columns are recomputed) -----------------
    if !loan.is_empty() {
        let words = amount_words(&text(&loan, "loan_amount"), "loan_amount");
        insert(&mut loan, "loan_amount_in_words", words);
    }
    if !approval.is_empty() {
        let words = amount_words(&text(&approval, "approved_loan_amount"), "approved_loan_amount");
        insert(&mut approval, "approved_loan_amount_words", words);
    }

    // -- Staff ----------------------------------------------------------------
    insert(&mut derived, "prepared_by_name", prefer(&staff.entered_by_name, text(&approval, "entered_by")));
    insert(&mut derived, "prepared_by_post", prefer(&staff.entered_by_post, text(&approval, "entered_post")));
    insert(&mut derived, "approved_by_name", prefer(&staff.approved_by_name, text(&approval, "approved_by")));
    insert(&mut derived, "approved_by_post", prefer(&staff.approved_by_post, text(&approval, "approved_post")));

    // -- Collections ------------------------------------------------------------
    for row in family.iter_mut() {
        localize_in_place(row, "age");
        localize_in_place(row, "monthly_income");
    }
    for row in witnesses.iter_mut() {
        localize_in_place(row, "age");
    }
    for row in guarantors.iter_mut() {
        localize_in_place(row, "guarantor_age");
    }
    localize_in_place(&mut consent, "age");

    let (income, expense) = partition_income_expense(income_expense);

    let mut collections = Record::new();
    for (key, rows) in [
        ("family_details", family),
        ("affiliations", affiliations),
        ("properties", properties),
        ("project_details", projects),
        ("monthly_income", income),
        ("monthly_expense", expense),
        ("witnesses", witnesses),
        ("guarantors", guarantors),
    ] {
        let rows: Vec<Value> = rows.into_iter().map(Value::Object).collect();
        collections.insert(key.to_string(), Value::Array(rows));
    }

    // -- Merge ------------------------------------------------------------------
    let (mut context, renames) = merge_sources(vec![
        Source::new("member_profile", "member", profile),
        Source::new("derived", "derived", derived),
        Source::new("loan_request", "loan", loan),
        Source::new("collateral_basic", "saving", collateral_basic),
        Source::new("approval_record", "approval", approval),
        Source::new("consent_details", "consent", consent),
        Source::new("collections", "collection", collections),
    ]);
    if !renames.is_empty() {
        debug!(count = renames.len(), "colliding fields renamed");
    }

    // Known placeholders never render as missing
    for key in all_placeholders() {
        if !context.contains_key(key) {
            let blank = if COLLECTION_KEYS.contains(&key) {
                Value::Array(Vec::new())
            } else {
                Value::String(String::new())
            };
            context.insert(key.to_string(), blank);
        }
    }

    context
}

/// Split income/expense rows by their "type" tag
///
/// Tags are matched case-insensitively; rows with any other tag are dropped.
fn partition_income_expense(rows: Vec<Record>) -> (Vec<Record>, Vec<Record>) {
    let mut income = Vec::new();
    let mut expense = Vec::new();

    for row in rows {
        match text(&row, "type").to_lowercase().as_str() {
            "income" => income.push(row),
            "expense" => expense.push(row),
            other => debug!(tag = %other, "income/expense row with unknown type skipped"),
        }
    }

    (income, expense)
}

// ============================================================================
// ENTRY POINTS
// ============================================================================

/// Aggregate a member's context from an already-open connection
///
/// Wraps all fetchers in one read transaction on `conn`. Store failures are
/// logged and yield an empty map.
pub fn prepare_context_with(conn: &Connection, member: &MemberId, staff: &StaffInfo) -> ContextMap {
    let fetched = conn
        .unchecked_transaction()
        .map_err(anyhow::Error::from)
        .and_then(|tx| {
            let records = MemberRecords::fetch(&tx, member);
            tx.finish()?;
            records
        });

    finish(fetched, member, staff)
}

/// Aggregate a member's context from the store
///
/// Opens a fresh read-only connection for this call only.
pub fn prepare_report_context(store: &ReportStore, member: &MemberId, staff: &StaffInfo) -> ContextMap {
    let fetched = store.read(|conn| MemberRecords::fetch(conn, member));
    finish(fetched, member, staff)
}

fn finish(fetched: Result<MemberRecords>, member: &MemberId, staff: &StaffInfo) -> ContextMap {
    match fetched {
        Ok(records) => {
            let context = build_context(records, staff, BsDate::today());
            if context.is_empty() {
                info!(member = %member, "no profile found for member");
            } else {
                info!(member = %member, keys = context.len(), "report context prepared");
            }
            context
        }
        Err(e) => {
            error!(member = %member, error = %format!("{:#}", e), "report context aggregation failed");
            ContextMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::setup_database;
    use serde_json::json;

    fn record(pairs: &[(&str, Value)]) -> Record {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    fn today() -> Option<BsDate> {
        BsDate::new(2082, 3, 5)
    }

    fn profile_only() -> MemberRecords {
        MemberRecords {
            profile: record(&[
                ("member_number", json!("000000123")),
                ("member_name", json!("X")),
                ("dob_bs", json!("2055/01/01")),
                ("ward_no", json!("4")),
                ("father_name", json!("Hari")),
            ]),
            ..Default::default()
        }
    }

    #[test]
    fn test_profile_only_is_not_empty() {
        let context = build_context(profile_only(), &StaffInfo::default(), today());

        assert!(!context.is_empty());
        assert_eq!(context["member_name"], json!("X"));
        assert_eq!(context["member_number"], json!("००००००१२३"));
        assert_eq!(context["dob_bs"], json!("2055-01-01"));
        assert_eq!(context["ward_no_nep"], json!("४"));
        assert_eq!(context["approved_loan_amount"], json!(""));
        assert_eq!(context["loan_amount_in_words"], json!(""));
        assert_eq!(context["family_details"], json!([]));
    }

    #[test]
    fn test_no_profile_yields_empty_map() {
        let records = MemberRecords {
            loan: record(&[("loan_amount", json!("50000"))]),
            ..Default::default()
        };
        assert!(build_context(records, &StaffInfo::default(), today()).is_empty());
    }

    #[test]
    fn test_age_and_today_breakdown() {
        let context = build_context(profile_only(), &StaffInfo::default(), today());

        // 2055-01-01 → 2082-03-05: birthday already passed this year
        assert_eq!(context["age"], json!("२७"));
        assert_eq!(context["bs_year"], json!("२०८२"));
        assert_eq!(context["bs_month"], json!("३"));
        assert_eq!(context["bs_day"], json!("५"));
        assert_eq!(context["today_bs"], json!("२०८२-०३-०५"));

        let weekday = BsDate::new(2082, 3, 5).unwrap().weekday() + 1;
        assert_eq!(context["bs_roj"], json!(localize_digits(&weekday.to_string())));
    }

    #[test]
    fn test_malformed_dob_gives_blank_age() {
        let mut records = profile_only();
        records.profile.insert("dob_bs".to_string(), json!("someday"));

        let context = build_context(records, &StaffInfo::default(), today());
        assert_eq!(context["age"], json!(""));
        assert_eq!(context["dob_bs"], json!("someday"));
    }

    #[test]
    fn test_consent_and_family_age_both_retrievable() {
        let mut records = profile_only();
        records.family = vec![record(&[("name", json!("Sita")), ("age", json!("40"))])];
        records.consent = record(&[
            ("member_number", json!("000000123")),
            ("person_name", json!("Gita")),
            ("father_name", json!("Shyam")),
            ("age", json!("55")),
        ]);

        let context = build_context(records, &StaffInfo::default(), today());

        assert_eq!(context["age"], json!("२७"));
        assert_eq!(context["consent_age"], json!("५५"));
        assert_eq!(context["family_details"][0]["age"], json!("४०"));
        assert_eq!(context["father_name"], json!("Hari"));
        assert_eq!(context["consent_father_name"], json!("Shyam"));
        assert_eq!(context["person_name"], json!("Gita"));
        // the consent join key is not renamed into the map
        assert!(!context.contains_key("consent_member_number"));
    }

    #[test]
    fn test_loan_amount_words_and_localization() {
        let mut records = profile_only();
        records.loan = record(&[
            ("loan_amount", json!("50000")),
            ("loan_amount_in_words", json!("stale")),
            ("interest_rate", json!(12.5)),
            ("loan_completion_year", json!("2085")),
            ("loan_completion_month", json!("4")),
            ("loan_completion_day", json!("1")),
        ]);

        let context = build_context(records, &StaffInfo::default(), today());

        assert_eq!(context["loan_amount"], json!("50000"));
        assert_eq!(context["loan_amount_nep"], json!("५००००"));
        assert_eq!(context["loan_amount_in_words"], json!("रु. पचास हजार मात्र"));
        assert_eq!(context["interest_rate_nep"], json!("१२.५"));
        assert_eq!(context["bs_year_lastdate"], json!("२०८५"));
        assert_eq!(context["bs_month_lastdate"], json!("०४"));
        assert_eq!(context["bs_day_lastdate"], json!("०१"));
        assert_eq!(context["loan_completion_date_bs"], json!("२०८५-०४-०१"));
    }

    #[test]
    fn test_invalid_amount_left_blank() {
        let mut records = profile_only();
        records.loan = record(&[("loan_amount", json!("-5"))]);

        let context = build_context(records, &StaffInfo::default(), today());
        assert_eq!(context["loan_amount_in_words"], json!(""));
    }

    #[test]
    fn test_approval_aliases_and_staff_fallback() {
        let mut records = profile_only();
        records.approval = record(&[
            ("member_number", json!("000000123")),
            ("approval_date", json!("2082/2/20")),
            ("entered_by", json!("Clerk")),
            ("entered_designation", json!("Assistant")),
            ("approved_by", json!("Manager")),
            ("approved_post", json!("Branch Manager")),
            ("approved_loan_amount", json!("45000")),
        ]);

        let staff = StaffInfo::approver("CEO Name", "");
        let context = build_context(records, &staff, today());

        assert_eq!(context["prepared_by_name"], json!("Clerk"));
        assert_eq!(context["prepared_by_post"], json!("Assistant"));
        assert_eq!(context["entered_post"], json!("Assistant"));
        assert!(!context.contains_key("entered_designation"));
        assert_eq!(context["approved_by_name"], json!("CEO Name"));
        assert_eq!(context["approved_by_post"], json!("Branch Manager"));
        assert_eq!(context["approval_date"], json!("2082-02-20"));
        assert_eq!(context["approved_date_bs"], json!("२०८२-०२-२०"));
        assert_eq!(context["approved_loan_amount_words"], json!("रु. पैंतालीस हजार मात्र"));
        assert_eq!(context["approved_loan_amount_nep"], json!("४५०००"));
    }

    #[test]
    fn test_income_expense_partition() {
        let mut records = profile_only();
        records.income_expense = vec![
            record(&[("field", json!("salary")), ("amount", json!("30000")), ("type", json!("income"))]),
            record(&[("field", json!("rent")), ("amount", json!("8000")), ("type", json!("Expense"))]),
            record(&[("field", json!("?")), ("amount", json!("1")), ("type", json!("other"))]),
            record(&[("field", json!("shop")), ("amount", json!("12000")), ("type", json!("income"))]),
        ];

        let context = build_context(records, &StaffInfo::default(), today());

        let income = context["monthly_income"].as_array().unwrap();
        let expense = context["monthly_expense"].as_array().unwrap();
        assert_eq!(income.len(), 2);
        assert_eq!(income[0]["field"], json!("salary"));
        assert_eq!(income[1]["field"], json!("shop"));
        assert_eq!(expense.len(), 1);
        assert_eq!(expense[0]["field"], json!("rent"));
    }

    #[test]
    fn test_unknown_today_blanks_date_fields() {
        let context = build_context(profile_only(), &StaffInfo::default(), None);
        assert_eq!(context["age"], json!(""));
        assert_eq!(context["bs_year"], json!(""));
        assert_eq!(context["bs_roj"], json!(""));
    }

    #[test]
    fn test_every_known_placeholder_present() {
        let context = build_context(profile_only(), &StaffInfo::default(), today());
        for key in all_placeholders() {
            assert!(context.contains_key(key), "{} missing", key);
        }
    }

    #[test]
    fn test_prepare_with_connection_missing_tables_is_empty() {
        let conn = Connection::open_in_memory().unwrap();
        let member = MemberId::normalize("123").unwrap();
        assert!(prepare_context_with(&conn, &member, &StaffInfo::default()).is_empty());
    }

    #[test]
    fn test_prepare_with_connection_profile_and_loan() {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        conn.execute_batch(
            "INSERT INTO member_info (member_number, member_name, dob_bs) VALUES ('000000123', 'X', '2055-01-01');
             INSERT INTO loan_info (member_number, loan_amount) VALUES ('000000123', '50000');",
        )
        .unwrap();

        let member = MemberId::normalize("123").unwrap();
        let context = prepare_context_with(&conn, &member, &StaffInfo::default());

        assert_eq!(context["member_name"], json!("X"));
        assert_eq!(context["loan_amount_in_words"], json!("रु. पचास हजार मात्र"));
        assert_eq!(context["status"], json!("pending"));
    }
}
