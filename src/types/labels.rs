//! Display labels for the numeric month and season codes.
//!
//! The dataset itself always keeps the numeric codes; these mappings are only
//! applied when something is shown to a reader (chart axes, report tables).

use serde::Serialize;
use std::fmt;

/// Calendar month, as encoded by the `mnth` column (1 = January).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
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
    /// All months in code order (1..=12).
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

    /// Maps a `mnth` code to its month. Returns `None` outside 1..=12.
    ///
    /// # Examples
    ///
    /// ```
    /// use bikeshare::Month;
    ///
    /// assert_eq!(Month::from_code(3), Some(Month::March));
    /// assert_eq!(Month::from_code(13), None);
    /// ```
    pub fn from_code(code: i32) -> Option<Month> {
        usize::try_from(code)
            .ok()
            .and_then(|c| c.checked_sub(1))
            .and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn code(&self) -> i32 {
        *self as i32 + 1
    }

    pub fn label(&self) -> &'static str {
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
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Season, as encoded by the `season` column.
///
/// Code 1 is the cold season that opens the year in the dataset, followed by
/// spring, summer and autumn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    /// All seasons in code order (1..=4).
    pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Autumn];

    /// Maps a `season` code to its season. Returns `None` outside 1..=4.
    ///
    /// # Examples
    ///
    /// ```
    /// use bikeshare::Season;
    ///
    /// assert_eq!(Season::from_code(1), Some(Season::Winter));
    /// assert_eq!(Season::from_code(0), None);
    /// ```
    pub fn from_code(code: i32) -> Option<Season> {
        usize::try_from(code)
            .ok()
            .and_then(|c| c.checked_sub(1))
            .and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn code(&self) -> i32 {
        *self as i32 + 1
    }

    pub fn label(&self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Label for a raw month code, falling back to the number itself.
pub(crate) fn month_label(code: i32) -> String {
    Month::from_code(code)
        .map(|m| m.label().to_string())
        .unwrap_or_else(|| code.to_string())
}

/// Label for a raw season code, falling back to the number itself.
pub(crate) fn season_label(code: i32) -> String {
    Season::from_code(code)
        .map(|s| s.label().to_string())
        .unwrap_or_else(|| code.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_month_mapping_is_bijective() {
        let labels: HashSet<&str> = (1..=12)
            .map(|code| Month::from_code(code).expect("month code in range").label())
            .collect();
        assert_eq!(labels.len(), 12);

        for month in Month::ALL {
            assert_eq!(Month::from_code(month.code()), Some(month));
        }
        assert_eq!(Month::from_code(1).map(|m| m.label()), Some("January"));
        assert_eq!(Month::from_code(12).map(|m| m.label()), Some("December"));
    }

    #[test]
    fn test_season_mapping_is_bijective() {
        let labels: HashSet<&str> = (1..=4)
            .map(|code| Season::from_code(code).expect("season code in range").label())
            .collect();
        assert_eq!(labels.len(), 4);

        for season in Season::ALL {
            assert_eq!(Season::from_code(season.code()), Some(season));
        }
    }

    #[test]
    fn test_codes_out_of_range() {
        for code in [-1, 0, 13, 100] {
            assert_eq!(Month::from_code(code), None, "month code {code}");
        }
        for code in [-1, 0, 5] {
            assert_eq!(Season::from_code(code), None, "season code {code}");
        }
        assert_eq!(month_label(13), "13");
        assert_eq!(season_label(2), "Spring");
    }
}
