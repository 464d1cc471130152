use crate::types::labels::{Month, Season};
use chrono::NaiveDate;
use serde::Serialize;

/// One day of the bike-sharing dataset, restricted to the fields the
/// pipeline works with.
///
/// `temperature` and `humidity` are the dataset's normalized values (0..=1).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub date: NaiveDate,
    /// Season code, 1..=4.
    pub season: u8,
    /// Month code, 1..=12.
    pub month: u8,
    pub temperature: f64,
    pub humidity: f64,
    pub count: u64,
}

impl Record {
    pub fn season(&self) -> Option<Season> {
        Season::from_code(i32::from(self.season))
    }

    pub fn month(&self) -> Option<Month> {
        Month::from_code(i32::from(self.month))
    }
}
