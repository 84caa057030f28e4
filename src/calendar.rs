use chrono::{Datelike, Local, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of day columns in the timeline grid (February is always 28 days).
pub const DAYS_IN_GRID: usize = 365;

/// The twelve fixed months of the timeline grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }

    /// Three letter abbreviation, used for narrow headers
    pub fn short_name(self) -> &'static str {
        &self.name()[..3]
    }

    pub fn day_count(self) -> u8 {
        match self {
            Month::February => 28,
            Month::April | Month::June | Month::September | Month::November => 30,
            _ => 31,
        }
    }

    /// Position in the fixed ordering (0 = January)
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Month> {
        Self::ALL.get(index).copied()
    }

    pub fn contains_day(self, day: u8) -> bool {
        (1..=self.day_count()).contains(&day)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Month {
    type Err = String;

    /// Accepts full names and three letter abbreviations, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Month::ALL
            .iter()
            .copied()
            .find(|m| {
                let name = m.name().to_lowercase();
                name == needle || (needle.len() == 3 && name.starts_with(&needle))
            })
            .ok_or_else(|| format!("Invalid month: {}", s))
    }
}

/// The fixed ordered month sequence.
pub fn months() -> &'static [Month] {
    &Month::ALL
}

/// Zero-based column of `(month, day)` across the whole grid.
pub fn day_of_year(month: Month, day: u8) -> usize {
    let preceding: usize = Month::ALL[..month.index()]
        .iter()
        .map(|m| m.day_count() as usize)
        .sum();
    preceding + day.saturating_sub(1) as usize
}

/// Inverse of [`day_of_year`]. Returns None past the last grid column.
pub fn from_day_of_year(mut offset: usize) -> Option<(Month, u8)> {
    for month in Month::ALL {
        let count = month.day_count() as usize;
        if offset < count {
            return Some((month, offset as u8 + 1));
        }
        offset -= count;
    }
    None
}

/// Binds the abstract month/day grid to a real year for weekend shading,
/// quick-select filtering and the "today" marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    year: i32,
}

impl Calendar {
    pub fn new(year: i32) -> Self {
        Self { year }
    }

    /// Calendar pinned to the current local year.
    pub fn current() -> Self {
        Self::new(Local::now().year())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn weekday(&self, month: Month, day: u8) -> Option<Weekday> {
        NaiveDate::from_ymd_opt(self.year, month.index() as u32 + 1, day as u32).map(|d| d.weekday())
    }

    pub fn is_weekend(&self, month: Month, day: u8) -> bool {
        matches!(self.weekday(month, day), Some(Weekday::Sat | Weekday::Sun))
    }

    /// Grid cell for `date` when it falls in this calendar's year.
    /// February 29 has no column and yields None.
    pub fn cell_for(&self, date: NaiveDate) -> Option<(Month, u8)> {
        if date.year() != self.year {
            return None;
        }
        let month = Month::from_index(date.month0() as usize)?;
        let day = date.day() as u8;
        month.contains_day(day).then_some((month, day))
    }

    pub fn today(&self) -> Option<(Month, u8)> {
        self.cell_for(Local::now().date_naive())
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self::current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_day_counts() {
        let counts: Vec<u8> = months().iter().map(|m| m.day_count()).collect();
        assert_eq!(counts, vec![31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]);
        let total: usize = counts.iter().map(|c| *c as usize).sum();
        assert_eq!(total, DAYS_IN_GRID);
    }

    #[test]
    fn test_month_index_roundtrip() {
        for (i, month) in months().iter().enumerate() {
            assert_eq!(month.index(), i);
            assert_eq!(Month::from_index(i), Some(*month));
        }
        assert_eq!(Month::from_index(12), None);
    }

    #[test]
    fn test_month_from_str() {
        assert_eq!("January".parse::<Month>().unwrap(), Month::January);
        assert_eq!("sep".parse::<Month>().unwrap(), Month::September);
        assert_eq!(" DECEMBER ".parse::<Month>().unwrap(), Month::December);
        assert!("Janu".parse::<Month>().is_err());
        assert!("".parse::<Month>().is_err());
    }

    #[test]
    fn test_month_serializes_as_name() {
        let json = serde_json::to_string(&Month::March).unwrap();
        assert_eq!(json, "\"March\"");
        let parsed: Month = serde_json::from_str("\"October\"").unwrap();
        assert_eq!(parsed, Month::October);
    }

    #[test]
    fn test_day_of_year() {
        assert_eq!(day_of_year(Month::January, 1), 0);
        assert_eq!(day_of_year(Month::February, 1), 31);
        assert_eq!(day_of_year(Month::March, 1), 59);
        assert_eq!(day_of_year(Month::December, 31), 364);

        assert_eq!(from_day_of_year(0), Some((Month::January, 1)));
        assert_eq!(from_day_of_year(58), Some((Month::February, 28)));
        assert_eq!(from_day_of_year(364), Some((Month::December, 31)));
        assert_eq!(from_day_of_year(365), None);
    }

    #[test]
    fn test_is_weekend_2025() {
        let calendar = Calendar::new(2025);
        // 2025-01-04 is a Saturday, 2025-01-05 a Sunday, 2025-01-06 a Monday
        assert!(calendar.is_weekend(Month::January, 4));
        assert!(calendar.is_weekend(Month::January, 5));
        assert!(!calendar.is_weekend(Month::January, 6));
        assert!(!calendar.is_weekend(Month::January, 1));
    }

    #[test]
    fn test_weekends_per_month() {
        let calendar = Calendar::new(2025);
        let weekend_days = (1..=Month::February.day_count())
            .filter(|d| calendar.is_weekend(Month::February, *d))
            .count();
        assert_eq!(weekend_days, 8);
    }

    #[test]
    fn test_cell_for_date() {
        let calendar = Calendar::new(2024);
        let date = NaiveDate::from_ymd_opt(2024, 7, 14).unwrap();
        assert_eq!(calendar.cell_for(date), Some((Month::July, 14)));

        let leap_day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(calendar.cell_for(leap_day), None);

        let other_year = NaiveDate::from_ymd_opt(2023, 7, 14).unwrap();
        assert_eq!(calendar.cell_for(other_year), None);
    }
}
