// 📅 Bikram Sambat Calendar - lunar-solar date arithmetic
//
// Every date stored or displayed by the cooperative is a BS date.
// Month lengths are not computable from a formula, so the calendar is
// table-driven: one row of twelve month lengths per BS year, anchored at
// BS 2000-01-01 = AD 1943-04-14.
//
// Failure policy: malformed or out-of-range input yields `None`, never a panic.

use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// CALENDAR TABLE
// ============================================================================

/// First BS year covered by the month table
pub const BS_MIN_YEAR: i32 = 2000;

/// Last BS year covered by the month table
pub const BS_MAX_YEAR: i32 = 2090;

/// Gregorian date of BS 2000-01-01 (a Wednesday)
const EPOCH_GREGORIAN: (i32, u32, u32) = (1943, 4, 14);

/// Weekday of the epoch, Sunday = 0
const EPOCH_WEEKDAY: i64 = 3;

const MONTH_NAMES: [&str; 12] = [
    "बैशाख", "जेठ", "असार", "साउन", "भदौ", "असोज",
    "कार्तिक", "मंसिर", "पुस", "माघ", "फागुन", "चैत",
];

#[rustfmt::skip]
const MONTH_DAYS: [[u8; 12]; (BS_MAX_YEAR - BS_MIN_YEAR + 1) as usize] = [
    [30, 32, 31, 32, 31, 30, 30, 30, 29, 30, 29, 31], // 2000
    [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30], // 2001
    [31, 31, 32, 32, 31, 30, 30, 29, 30, 29, 30, 30], // 2002
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 31], // 2003
    [30, 32, 31, 32, 31, 30, 30, 30, 29, 30, 29, 31], // 2004
    [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30], // 2005
    [31, 31, 32, 32, 31, 30, 30, 29, 30, 29, 30, 30], // 2006
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 31], // 2007
    [31, 31, 31, 32, 31, 31, 29, 30, 30, 29, 29, 31], // 2008
    [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30], // 2009
    [31, 31, 32, 32, 31, 30, 30, 29, 30, 29, 30, 30], // 2010
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 31], // 2011
    [31, 31, 31, 32, 31, 31, 29, 30, 30, 29, 30, 30], // 2012
    [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30], // 2013
    [31, 31, 32, 32, 31, 30, 30, 29, 30, 29, 30, 30], // 2014
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 31], // 2015
    [31, 31, 31, 32, 31, 31, 29, 30, 30, 29, 30, 30], // 2016
    [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30], // 2017
    [31, 32, 31, 32, 31, 30, 30, 29, 30, 29, 30, 30], // 2018
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 30, 29, 31], // 2019
    [31, 31, 31, 32, 31, 31, 30, 29, 30, 29, 30, 30], // 2020
    [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30], // 2021
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 30], // 2022
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 30, 29, 31], // 2023
    [31, 31, 31, 32, 31, 31, 30, 29, 30, 29, 30, 30], // 2024
    [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30], // 2025
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 31], // 2026
    [30, 32, 31, 32, 31, 30, 30, 30, 29, 30, 29, 31], // 2027
    [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30], // 2028
    [31, 31, 32, 31, 32, 30, 30, 29, 30, 29, 30, 30], // 2029
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 31], // 2030
    [30, 32, 31, 32, 31, 30, 30, 30, 29, 30, 29, 31], // 2031
    [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30], // 2032
    [31, 31, 32, 32, 31, 30, 30, 29, 30, 29, 30, 30], // 2033
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 31], // 2034
    [30, 32, 31, 32, 31, 31, 29, 30, 30, 29, 29, 31], // 2035
    [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30], // 2036
    [31, 31, 32, 32, 31, 30, 30, 29, 30, 29, 30, 30], // 2037
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 31], // 2038
    [31, 31, 31, 32, 31, 31, 29, 30, 30, 29, 30, 30], // 2039
    [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30], // 2040
    [31, 31, 32, 32, 31, 30, 30, 29, 30, 29, 30, 30], // 2041
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 31], // 2042
    [31, 31, 31, 32, 31, 31, 29, 30, 30, 29, 30, 30], // 2043
    [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30], // 2044
    [31, 32, 31, 32, 31, 30, 30, 29, 30, 29, 30, 30], // 2045
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 31], // 2046
    [31, 31, 31, 32, 31, 31, 30, 29, 30, 29, 30, 30], // 2047
    [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30], // 2048
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 30], // 2049
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 30, 29, 31], // 2050
    [31, 31, 31, 32, 31, 31, 30, 29, 30, 29, 30, 30], // 2051
    [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30], // 2052
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 30], // 2053
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 30, 29, 31], // 2054
    [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30], // 2055
    [31, 31, 32, 31, 32, 30, 30, 29, 30, 29, 30, 30], // 2056
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 31], // 2057
    [30, 32, 31, 32, 31, 30, 30, 30, 29, 30, 29, 31], // 2058
    [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30], // 2059
    [31, 31, 32, 32, 31, 30, 30, 29, 30, 29, 30, 30], // 2060
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 31], // 2061
    [30, 32, 31, 32, 31, 31, 29, 30, 29, 30, 29, 31], // 2062
    [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30], // 2063
    [31, 31, 32, 32, 31, 30, 30, 29, 30, 29, 30, 30], // 2064
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 31], // 2065
    [31, 31, 31, 32, 31, 31, 29, 30, 30, 29, 29, 31], // 2066
    [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30], // 2067
    [31, 31, 32, 32, 31, 30, 30, 29, 30, 29, 30, 30], // 2068
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 31], // 2069
    [31, 31, 31, 32, 31, 31, 29, 30, 30, 29, 30, 30], // 2070
    [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30], // 2071
    [31, 32, 31, 32, 31, 30, 30, 29, 30, 29, 30, 30], // 2072
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 31], // 2073
    [31, 31, 31, 32, 31, 31, 30, 29, 30, 29, 30, 30], // 2074
    [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30], // 2075
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 30], // 2076
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 30, 29, 31], // 2077
    [31, 31, 31, 32, 31, 31, 30, 29, 30, 29, 30, 30], // 2078
    [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30], // 2079
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 30], // 2080
    [31, 31, 32, 32, 31, 30, 30, 30, 29, 30, 30, 30], // 2081
    [31, 31, 32, 31, 31, 30, 30, 30, 29, 30, 30, 30], // 2082
    [31, 31, 32, 31, 31, 30, 30, 30, 29, 30, 30, 30], // 2083
    [31, 31, 32, 31, 31, 30, 30, 30, 29, 30, 30, 30], // 2084
    [31, 32, 31, 32, 30, 31, 30, 30, 29, 30, 30, 30], // 2085
    [30, 32, 31, 32, 31, 30, 30, 30, 29, 30, 30, 30], // 2086
    [31, 31, 32, 31, 31, 31, 30, 30, 29, 30, 30, 30], // 2087
    [30, 31, 32, 32, 30, 31, 30, 30, 29, 30, 30, 30], // 2088
    [30, 32, 31, 32, 31, 30, 30, 30, 29, 30, 30, 30], // 2089
    [30, 32, 31, 32, 31, 30, 30, 30, 29, 30, 30, 30], // 2090
];

fn year_row(year: i32) -> Option<&'static [u8; 12]> {
    if !(BS_MIN_YEAR..=BS_MAX_YEAR).contains(&year) {
        return None;
    }
    MONTH_DAYS.get((year - BS_MIN_YEAR) as usize)
}

fn epoch() -> Option<NaiveDate> {
    let (y, m, d) = EPOCH_GREGORIAN;
    NaiveDate::from_ymd_opt(y, m, d)
}

/// Number of days in a BS month, `None` when the year/month is outside the table
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    if !(1..=12).contains(&month) {
        return None;
    }
    year_row(year).map(|row| row[(month - 1) as usize] as u32)
}

/// Number of days in a BS year
pub fn days_in_year(year: i32) -> Option<u32> {
    year_row(year).map(|row| row.iter().map(|&d| d as u32).sum())
}

// ============================================================================
// BS DATE
// ============================================================================

/// A validated Bikram Sambat date
///
/// Construction always goes through the month table, so a `BsDate` value is
/// guaranteed to exist in the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BsDate {
    year: i32,
    month: u32,
    day: u32,
}

impl BsDate {
    /// Construct from (year, month, day); `None` when the date does not exist
    pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        let max_day = days_in_month(year, month)?;
        if day == 0 || day > max_day {
            return None;
        }
        Some(BsDate { year, month, day })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// Today's date in the BS calendar (local clock)
    pub fn today() -> Option<Self> {
        Self::from_gregorian(Local::now().date_naive())
    }

    /// Convert a Gregorian date; `None` outside the table range
    pub fn from_gregorian(date: NaiveDate) -> Option<Self> {
        let mut remaining = date.signed_duration_since(epoch()?).num_days();
        if remaining < 0 {
            return None;
        }

        for year in BS_MIN_YEAR..=BS_MAX_YEAR {
            let row = year_row(year)?;
            let year_len: i64 = row.iter().map(|&d| d as i64).sum();
            if remaining >= year_len {
                remaining -= year_len;
                continue;
            }
            for (idx, &len) in row.iter().enumerate() {
                let len = len as i64;
                if remaining < len {
                    return Some(BsDate {
                        year,
                        month: idx as u32 + 1,
                        day: remaining as u32 + 1,
                    });
                }
                remaining -= len;
            }
        }

        None
    }

    /// Days elapsed since BS 2000-01-01
    fn days_since_epoch(&self) -> i64 {
        let mut days: i64 = 0;
        for year in BS_MIN_YEAR..self.year {
            days += days_in_year(year).unwrap_or(0) as i64;
        }
        if let Some(row) = year_row(self.year) {
            days += row[..(self.month - 1) as usize]
                .iter()
                .map(|&d| d as i64)
                .sum::<i64>();
        }
        days + (self.day as i64 - 1)
    }

    /// Convert back to the Gregorian calendar
    pub fn to_gregorian(&self) -> Option<NaiveDate> {
        epoch()?.checked_add_signed(Duration::days(self.days_since_epoch()))
    }

    /// Weekday ordinal, Sunday = 0 ... Saturday = 6
    pub fn weekday(&self) -> u32 {
        ((EPOCH_WEEKDAY + self.days_since_epoch()).rem_euclid(7)) as u32
    }

    /// Nepali month name
    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[(self.month - 1) as usize]
    }

    /// Compact stamp used in generated file names: "YYYYMMDD"
    pub fn compact(&self) -> String {
        format!("{:04}{:02}{:02}", self.year, self.month, self.day)
    }

    /// Parse "YYYY-MM-DD" or "YYYY/MM/DD" (parts may be unpadded)
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        let separator = if trimmed.contains('/') { '/' } else { '-' };

        let parts: Vec<&str> = trimmed.split(separator).collect();
        if parts.len() != 3 {
            return None;
        }

        let mut numbers = [0u32; 3];
        for (slot, part) in numbers.iter_mut().zip(parts.iter()) {
            let part = part.trim();
            if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            *slot = part.parse().ok()?;
        }

        BsDate::new(numbers[0] as i32, numbers[1], numbers[2])
    }
}

impl fmt::Display for BsDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

// ============================================================================
// STRING HELPERS
// ============================================================================

/// Canonicalize a BS date string to zero-padded "YYYY-MM-DD"
///
/// Accepts '/' or '-' as separator. Returns `None` for anything that is not a
/// real BS date.
pub fn normalize_date_str(input: &str) -> Option<String> {
    BsDate::parse(input).map(|d| d.to_string())
}

/// Age in completed years on `today` for a birth date string
///
/// The birthday counts as reached on its (month, day). A birth date after
/// `today` or an unparsable string yields `None`.
pub fn age_on(dob: &str, today: BsDate) -> Option<u32> {
    let birth = BsDate::parse(dob)?;
    let mut age = today.year - birth.year;
    if (today.month, today.day) < (birth.month, birth.day) {
        age -= 1;
    }
    u32::try_from(age).ok()
}

/// Age as of today's BS date
pub fn age_from_dob(dob: &str) -> Option<u32> {
    age_on(dob, BsDate::today()?)
}

/// Current local time as a BS timestamp "YYYY-MM-DD HH:MM:SS"
pub fn bs_now_timestamp() -> Option<String> {
    let now = Local::now();
    let date = BsDate::from_gregorian(now.date_naive())?;
    Some(format!("{} {}", date, now.format("%H:%M:%S")))
}

// ============================================================================
// TESTS
// ============================================================================
