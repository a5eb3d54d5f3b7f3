// 📄 Report Templates - known document kinds and the placeholders they use
//
// The rendering engine is external; all this crate knows about a template
// is which placeholder names it embeds. A placeholder with no matching key
// in the context renders empty, so the aggregator fills every known
// placeholder and `check_placeholders` reports drift between a template
// file and the context.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::db::Record;

/// Context keys that hold lists of records rather than display strings
pub const COLLECTION_KEYS: [&str; 8] = [
    "family_details",
    "affiliations",
    "properties",
    "project_details",
    "monthly_income",
    "monthly_expense",
    "witnesses",
    "guarantors",
];

const LOAN_APPLICATION_PLACEHOLDERS: &[&str] = &[
    // member
    "member_name", "member_number", "address", "ward_no_nep", "phone_nep", "dob_bs", "age",
    "citizenship_no_nep", "father_name", "grandfather_name", "spouse_name", "spouse_phone",
    "business_name", "business_address", "job_name", "job_address", "email", "profession",
    "facebook_detail", "whatsapp_detail", "date_bs",
    // loan request
    "loan_type", "loan_amount_nep", "loan_amount_in_words", "interest_rate_nep",
    "loan_duration", "repayment_duration",
    // savings
    "monthly_saving_nep", "child_saving_nep", "total_saving_nep",
    // approval
    "prepared_by_name", "prepared_by_post", "approved_by_name", "approved_by_post",
    "approved_loan_amount", "approved_loan_amount_words", "approved_date_bs",
    // today
    "bs_year", "bs_month", "bs_day", "bs_roj",
    // collections
    "family_details", "affiliations", "properties", "project_details",
    "monthly_income", "monthly_expense",
];

const TAMASUK_PLACEHOLDERS: &[&str] = &[
    // borrower
    "member_name", "member_number", "address", "ward_no_nep", "age", "father_name",
    "grandfather_name", "citizenship_no_nep",
    // amounts and term
    "approved_loan_amount_nep", "approved_loan_amount_words", "loan_amount_nep",
    "loan_amount_in_words", "interest_rate_nep",
    "bs_year_lastdate", "bs_month_lastdate", "bs_day_lastdate",
    // signing date
    "bs_year", "bs_month", "bs_day", "bs_roj",
    // consenting party
    "person_name", "consent_father_name", "consent_grandfather_name", "consent_age",
    "district", "municipality", "consent_ward_no", "tole",
    // staff
    "approved_by_name", "approved_by_post",
    // people vouching
    "witnesses", "guarantors",
];

// ============================================================================
// REPORT TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    /// Loan application form (ऋण आवेदन)
    LoanApplication,

    /// Promissory note signed at disbursement (तमसुक)
    Tamasuk,
}

impl ReportType {
    pub const ALL: [ReportType; 2] = [ReportType::LoanApplication, ReportType::Tamasuk];

    /// Identifier stored in the report log
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::LoanApplication => "loan_application",
            ReportType::Tamasuk => "tamasuk",
        }
    }

    /// Stem of generated file names
    pub fn file_stem(&self) -> &'static str {
        match self {
            ReportType::LoanApplication => "ऋण आवेदन",
            ReportType::Tamasuk => "तमसुक",
        }
    }

    /// Accepts the log identifier or its kebab-case form
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().replace('-', "_").as_str() {
            "loan_application" => Some(ReportType::LoanApplication),
            "tamasuk" => Some(ReportType::Tamasuk),
            _ => None,
        }
    }

    /// Placeholder names the stock template for this report embeds
    pub fn placeholders(&self) -> &'static [&'static str] {
        match self {
            ReportType::LoanApplication => LOAN_APPLICATION_PLACEHOLDERS,
            ReportType::Tamasuk => TAMASUK_PLACEHOLDERS,
        }
    }
}

/// Union of the placeholders of every known template
pub fn all_placeholders() -> BTreeSet<&'static str> {
    ReportType::ALL
        .iter()
        .flat_map(|t| t.placeholders().iter().copied())
        .collect()
}

// ============================================================================
// PLACEHOLDER CHECK
// ============================================================================

/// Drift between a template and a context map
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceholderReport {
    /// In the template, absent from the context (will render empty)
    pub missing: Vec<String>,

    /// In the context, never referenced by the template
    pub unused: Vec<String>,
}

impl PlaceholderReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Compare a template's placeholder names with the keys of a context map
pub fn check_placeholders<'a, I>(placeholders: I, context: &Record) -> PlaceholderReport
where
    I: IntoIterator<Item = &'a str>,
{
    let wanted: BTreeSet<&str> = placeholders.into_iter().collect();
    let available: BTreeSet<&str> = context.keys().map(String::as_str).collect();

    PlaceholderReport {
        missing: wanted.difference(&available).map(|s| s.to_string()).collect(),
        unused: available.difference(&wanted).map(|s| s.to_string()).collect(),
    }
}

fn leading_identifier(expr: &str) -> Option<&str> {
    let expr = expr.trim();
    let end = expr
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(expr.len());
    let ident = &expr[..end];
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        None
    } else {
        Some(ident)
    }
}

/// Extract the free variables of a Jinja-style template text
///
/// Collects the leading identifier of every `{{ ... }}` expression and the
/// iterable of every `{% for x in y %}`. Loop variables are not free.
pub fn parse_placeholders(text: &str) -> BTreeSet<String> {
    let mut found: BTreeSet<String> = BTreeSet::new();
    let mut loop_vars: BTreeSet<String> = BTreeSet::new();

    let mut rest = text;
    while let Some(start) = rest.find('{') {
        let tail = &rest[start..];
        let (close, is_expr) = if tail.starts_with("{{") {
            ("}}", true)
        } else if tail.starts_with("{%") {
            ("%}", false)
        } else {
            rest = &tail[1..];
            continue;
        };

        let body_start = 2;
        let Some(end) = tail[body_start..].find(close) else {
            break;
        };
        let body = tail[body_start..body_start + end].trim_matches(|c: char| c == '-' || c == ' ');

        if is_expr {
            if let Some(ident) = leading_identifier(body) {
                found.insert(ident.to_string());
            }
        } else {
            let words: Vec<&str> = body.split_whitespace().collect();
            // {% for item in collection %} / {%tr for item in collection %}
            if let Some(pos) = words.iter().position(|w| *w == "for") {
                if let (Some(var), Some("in"), Some(iter)) =
                    (words.get(pos + 1), words.get(pos + 2).copied(), words.get(pos + 3))
                {
                    loop_vars.insert(var.to_string());
                    if let Some(ident) = leading_identifier(iter) {
                        found.insert(ident.to_string());
                    }
                }
            }
        }

        rest = &tail[body_start + end + close.len()..];
    }

    found.retain(|name| !loop_vars.contains(name));
    found
}
