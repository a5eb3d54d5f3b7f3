// ⚠️ Report Errors - the messages a user can actually see
//
// Internals use `anyhow` with context. Anything that crosses into the
// caller's hands is one of these variants, and its Display text is the
// message shown to the user.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    /// No member identifier was supplied
    #[error("No member selected. Please search for and select a member first.")]
    MissingMember,

    /// The identifier does not fit the fixed-width member number
    #[error("Invalid member number '{0}': expected at most 9 characters")]
    InvalidMemberId(String),

    /// Document generation requires the approving staff name
    #[error("No approver selected. Please choose the approving staff member.")]
    MissingApprover,

    /// Aggregation produced no data for this member
    #[error("No data found for member {0}")]
    NoData(String),

    /// The store could not be opened or read
    #[error("Could not read the member database: {0:#}")]
    Store(anyhow::Error),

    /// The renderer or the report log failed
    #[error("Failed to generate report: {0:#}")]
    Render(anyhow::Error),
}
