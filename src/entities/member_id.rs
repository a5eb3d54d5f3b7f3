// 🪪 Member Identifier - fixed-width lookup key
//
// Every table keys off `member_number`, stored as a 9-character zero-padded
// string. A lookup with "123" instead of "000000123" does not fail, it just
// finds nothing, so normalization happens once here and the rest of the
// crate only ever sees a `MemberId`.

use crate::error::ReportError;
use crate::numerals::delocalize_digits;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of a stored member number
pub const MEMBER_ID_WIDTH: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberId(String);

impl MemberId {
    /// Trim, map Devanagari digits back to ASCII and left-pad with '0'
    pub fn normalize(raw: &str) -> Result<Self, ReportError> {
        let trimmed = delocalize_digits(raw.trim());

        if trimmed.is_empty() {
            return Err(ReportError::MissingMember);
        }

        let width = trimmed.chars().count();
        if width > MEMBER_ID_WIDTH || trimmed.chars().any(char::is_whitespace) {
            return Err(ReportError::InvalidMemberId(raw.trim().to_string()));
        }

        let padding = "0".repeat(MEMBER_ID_WIDTH - width);
        Ok(MemberId(format!("{}{}", padding, trimmed)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
