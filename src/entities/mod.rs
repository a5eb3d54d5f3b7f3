// Entity Catalog - the fixed set of record shapes hanging off a member
//
// Each entity is one table keyed by `member_number`:
// - Single entities (0:1 / 1:1) shape into one `Record`, `{}` when absent
// - Collection entities (0:N) shape into an ordered `Vec<Record>`, `[]` when absent

pub mod fetchers;
pub mod member_id;

pub use fetchers::{
    fetch_approval_record, fetch_collateral_affiliations, fetch_collateral_basic,
    fetch_collateral_properties, fetch_consent_details, fetch_family_details,
    fetch_guarantor_details, fetch_income_expense, fetch_loan_request, fetch_member_profile,
    fetch_project_details, fetch_witness_details,
};
pub use member_id::{MemberId, MEMBER_ID_WIDTH};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cardinality {
    /// At most one row per member
    Single,

    /// Zero or more rows per member, in insertion order
    Collection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Entity {
    MemberProfile,
    LoanRequest,
    CollateralBasic,
    CollateralAffiliations,
    CollateralProperties,
    FamilyDetails,
    IncomeExpense,
    ProjectDetails,
    ApprovalRecord,
    WitnessDetails,
    GuarantorDetails,
    ConsentDetails,
}

impl Entity {
    /// Every entity in fetch order
    pub const ALL: [Entity; 12] = [
        Entity::MemberProfile,
        Entity::LoanRequest,
        Entity::CollateralBasic,
        Entity::CollateralAffiliations,
        Entity::CollateralProperties,
        Entity::FamilyDetails,
        Entity::IncomeExpense,
        Entity::ProjectDetails,
        Entity::ApprovalRecord,
        Entity::WitnessDetails,
        Entity::GuarantorDetails,
        Entity::ConsentDetails,
    ];

    /// Name used in logs and error context
    pub fn as_str(&self) -> &'static str {
        match self {
            Entity::MemberProfile => "member_profile",
            Entity::LoanRequest => "loan_request",
            Entity::CollateralBasic => "collateral_basic",
            Entity::CollateralAffiliations => "collateral_affiliations",
            Entity::CollateralProperties => "collateral_properties",
            Entity::FamilyDetails => "family_details",
            Entity::IncomeExpense => "income_expense",
            Entity::ProjectDetails => "project_details",
            Entity::ApprovalRecord => "approval_record",
            Entity::WitnessDetails => "witness_details",
            Entity::GuarantorDetails => "guarantor_details",
            Entity::ConsentDetails => "consent_details",
        }
    }

    pub fn table(&self) -> &'static str {
        match self {
            Entity::MemberProfile => "member_info",
            Entity::LoanRequest => "loan_info",
            Entity::CollateralBasic => "collateral_basic",
            Entity::CollateralAffiliations => "collateral_affiliations",
            Entity::CollateralProperties => "collateral_properties",
            Entity::FamilyDetails => "collateral_family_details",
            Entity::IncomeExpense => "collateral_income_expense",
            Entity::ProjectDetails => "collateral_projects",
            Entity::ApprovalRecord => "approval_info",
            Entity::WitnessDetails => "loan_witness",
            Entity::GuarantorDetails => "guarantor_details",
            Entity::ConsentDetails => "consent_details",
        }
    }

    pub fn cardinality(&self) -> Cardinality {
        match self {
            Entity::MemberProfile
            | Entity::LoanRequest
            | Entity::CollateralBasic
            | Entity::ApprovalRecord
            | Entity::ConsentDetails => Cardinality::Single,
            _ => Cardinality::Collection,
        }
    }

    /// The one scoped query issued for this entity
    ///
    /// Single entities take the most recent row. The loan request skips
    /// requests that are already cleared or rejected.
    pub fn query(&self) -> String {
        let table = self.table();
        match self {
            Entity::LoanRequest => format!(
                "SELECT * FROM {table}
                 WHERE member_number = ?1 AND status NOT IN ('cleared', 'rejected')
                 ORDER BY id DESC LIMIT 1"
            ),
            _ if self.cardinality() == Cardinality::Single => format!(
                "SELECT * FROM {table} WHERE member_number = ?1 ORDER BY id DESC LIMIT 1"
            ),
            _ => format!("SELECT * FROM {table} WHERE member_number = ?1 ORDER BY id ASC"),
        }
    }
}
