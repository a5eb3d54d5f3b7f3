// 📥 Entity Fetchers - one scoped query per entity
//
// "Not found" is a value, not an error: singles come back as `{}` and
// collections as `[]`. Only a real store failure returns `Err`, with the
// entity and member named in the context chain.
//
// Fetchers take a borrowed connection. The caller decides its lifetime
// (the aggregator shares one read transaction across all of them).

use anyhow::{Context, Result};
use rusqlite::Connection;

use super::{Entity, MemberId};
use crate::db::{column_names, row_to_record, Record};

/// Fetch the most recent row of a single entity, `{}` when absent
pub fn fetch_single(conn: &Connection, entity: Entity, member: &MemberId) -> Result<Record> {
    let run = || -> Result<Record> {
        let mut stmt = conn.prepare(&entity.query())?;
        let columns = column_names(&stmt);
        let mut rows = stmt.query([member.as_str()])?;

        match rows.next()? {
            Some(row) => Ok(row_to_record(row, &columns)?),
            None => Ok(Record::new()),
        }
    };

    run().with_context(|| format!("Failed to fetch {} for member {}", entity.as_str(), member))
}

/// Fetch every row of a collection entity in insertion order, `[]` when absent
pub fn fetch_collection(conn: &Connection, entity: Entity, member: &MemberId) -> Result<Vec<Record>> {
    let run = || -> Result<Vec<Record>> {
        let mut stmt = conn.prepare(&entity.query())?;
        let columns = column_names(&stmt);
        let records = stmt
            .query_map([member.as_str()], |row| row_to_record(row, &columns))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    };

    run().with_context(|| format!("Failed to fetch {} for member {}", entity.as_str(), member))
}

// ============================================================================
// SINGLE ENTITIES
// ============================================================================

pub fn fetch_member_profile(conn: &Connection, member: &MemberId) -> Result<Record> {
    fetch_single(conn, Entity::MemberProfile, member)
}

pub fn fetch_loan_request(conn: &Connection, member: &MemberId) -> Result<Record> {
    fetch_single(conn, Entity::LoanRequest, member)
}

pub fn fetch_collateral_basic(conn: &Connection, member: &MemberId) -> Result<Record> {
    fetch_single(conn, Entity::CollateralBasic, member)
}

pub fn fetch_approval_record(conn: &Connection, member: &MemberId) -> Result<Record> {
    fetch_single(conn, Entity::ApprovalRecord, member)
}

pub fn fetch_consent_details(conn: &Connection, member: &MemberId) -> Result<Record> {
    fetch_single(conn, Entity::ConsentDetails, member)
}

// ============================================================================
// COLLECTION ENTITIES
// ============================================================================

pub fn fetch_collateral_affiliations(conn: &Connection, member: &MemberId) -> Result<Vec<Record>> {
    fetch_collection(conn, Entity::CollateralAffiliations, member)
}

pub fn fetch_collateral_properties(conn: &Connection, member: &MemberId) -> Result<Vec<Record>> {
    fetch_collection(conn, Entity::CollateralProperties, member)
}

pub fn fetch_family_details(conn: &Connection, member: &MemberId) -> Result<Vec<Record>> {
    fetch_collection(conn, Entity::FamilyDetails, member)
}

pub fn fetch_income_expense(conn: &Connection, member: &MemberId) -> Result<Vec<Record>> {
    fetch_collection(conn, Entity::IncomeExpense, member)
}

pub fn fetch_project_details(conn: &Connection, member: &MemberId) -> Result<Vec<Record>> {
    fetch_collection(conn, Entity::ProjectDetails, member)
}

pub fn fetch_witness_details(conn: &Connection, member: &MemberId) -> Result<Vec<Record>> {
    fetch_collection(conn, Entity::WitnessDetails, member)
}

pub fn fetch_guarantor_details(conn: &Connection, member: &MemberId) -> Result<Vec<Record>> {
    fetch_collection(conn, Entity::GuarantorDetails, member)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::setup_database;
    use serde_json::json;

    fn member(raw: &str) -> MemberId {
        MemberId::normalize(raw).unwrap()
    }

    fn test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        conn
    }

    #[test]
    fn test_single_absent_is_empty_map() {
        let conn = test_db();
        let profile = fetch_member_profile(&conn, &member("123")).unwrap();
        assert!(profile.is_empty());
    }

    #[test]
    fn test_collection_absent_is_empty_list() {
        let conn = test_db();
        let witnesses = fetch_witness_details(&conn, &member("123")).unwrap();
        assert!(witnesses.is_empty());
    }

    #[test]
    fn test_padding_mismatch_finds_nothing() {
        let conn = test_db();
        // Stored unpadded by some older import: normalized lookups must not see it
        conn.execute(
            "INSERT INTO member_info (member_number, member_name) VALUES ('123', 'Ram')",
            [],
        )
        .unwrap();
        assert!(fetch_member_profile(&conn, &member("123")).unwrap().is_empty());
    }

    #[test]
    fn test_profile_keys_are_column_names() {
        let conn = test_db();
        conn.execute(
            "INSERT INTO member_info (member_number, member_name, dob_bs) VALUES ('000000123', 'Ram', '2055-01-01')",
            [],
        )
        .unwrap();

        let profile = fetch_member_profile(&conn, &member("123")).unwrap();
        assert_eq!(profile["member_name"], json!("Ram"));
        assert_eq!(profile["dob_bs"], json!("2055-01-01"));
        assert_eq!(profile["member_number"], json!("000000123"));
        assert!(!profile.contains_key("id"));
    }

    #[test]
    fn test_loan_skips_cleared_and_rejected() {
        let conn = test_db();
        conn.execute_batch(
            "INSERT INTO loan_info (member_number, loan_amount, status) VALUES ('000000123', '10000', 'active');
             INSERT INTO loan_info (member_number, loan_amount, status) VALUES ('000000123', '20000', 'rejected');",
        )
        .unwrap();

        let loan = fetch_loan_request(&conn, &member("123")).unwrap();
        assert_eq!(loan["loan_amount"], json!("10000"));

        conn.execute("UPDATE loan_info SET status = 'cleared' WHERE loan_amount = '10000'", [])
            .unwrap();
        assert!(fetch_loan_request(&conn, &member("123")).unwrap().is_empty());
    }

    #[test]
    fn test_single_takes_most_recent_row() {
        let conn = test_db();
        conn.execute_batch(
            "INSERT INTO approval_info (member_number, approved_loan_amount) VALUES ('000000123', '40000');
             INSERT INTO approval_info (member_number, approved_loan_amount) VALUES ('000000123', '45000');",
        )
        .unwrap();

        let approval = fetch_approval_record(&conn, &member("123")).unwrap();
        assert_eq!(approval["approved_loan_amount"], json!("45000"));
    }

    #[test]
    fn test_collection_preserves_insertion_order_and_scope() {
        let conn = test_db();
        conn.execute_batch(
            "INSERT INTO collateral_family_details (member_number, name, age) VALUES ('000000123', 'Sita', '40');
             INSERT INTO collateral_family_details (member_number, name, age) VALUES ('000000999', 'Other', '1');
             INSERT INTO collateral_family_details (member_number, name, age) VALUES ('000000123', 'Hari', '12');",
        )
        .unwrap();

        let family = fetch_family_details(&conn, &member("123")).unwrap();
        let names: Vec<&str> = family.iter().map(|r| r["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["Sita", "Hari"]);
    }

    #[test]
    fn test_missing_table_is_an_error_with_context() {
        let conn = Connection::open_in_memory().unwrap();
        let err = fetch_guarantor_details(&conn, &member("123")).unwrap_err();
        let msg = format!("{:#}", err);
        assert!(msg.contains("guarantor_details"));
        assert!(msg.contains("000000123"));
    }
}
