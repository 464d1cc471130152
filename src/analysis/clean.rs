//! Data assessment and the one type normalization the pipeline performs.

use crate::error::BikeShareError;
use crate::types::dataset::{with_parsed_dates, Dataset};
use log::info;
use polars::prelude::*;
use serde::Serialize;

/// Missing-value count of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingValues {
    pub column: String,
    pub count: usize,
}

/// What `clean` found. Nothing it reports is removed from the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleaningReport {
    pub rows: usize,
    /// Rows identical to an earlier row across every column.
    pub duplicate_rows: usize,
    /// One entry per column, in frame order, including zero counts.
    pub missing_values: Vec<MissingValues>,
    /// Whether `dteday` was converted from text by this run.
    pub dates_converted: bool,
}

impl CleaningReport {
    pub fn total_missing(&self) -> usize {
        self.missing_values.iter().map(|m| m.count).sum()
    }
}

/// Assesses `dataset` and converts its `dteday` column to dates.
///
/// No rows are dropped: duplicate rows and missing values are only counted.
///
/// # Errors
///
/// Returns [`crate::SchemaError::DateParse`] if a date is not `YYYY-MM-DD`.
///
/// # Examples
///
/// ```
/// use bikeshare::{clean, Dataset, Record};
/// use chrono::NaiveDate;
///
/// let record = Record {
///     date: NaiveDate::from_ymd_opt(2011, 1, 1).unwrap(),
///     season: 1,
///     month: 1,
///     temperature: 0.34,
///     humidity: 0.81,
///     count: 985,
/// };
/// let dataset = Dataset::from_records(&[record.clone(), record]).unwrap();
/// let (cleaned, report) = clean(dataset).unwrap();
///
/// assert_eq!(report.duplicate_rows, 1);
/// assert_eq!(cleaned.height(), 2);
/// assert!(cleaned.has_parsed_dates());
/// ```
pub fn clean(dataset: Dataset) -> Result<(Dataset, CleaningReport), BikeShareError> {
    let duplicate_rows = count_duplicates(&dataset)?;
    let missing_values = count_missing(&dataset);
    let dates_converted = !dataset.has_parsed_dates();

    let frame = with_parsed_dates(dataset.frame().clone())?;
    let cleaned = Dataset::try_from_frame(frame)?;

    let report = CleaningReport {
        rows: cleaned.height(),
        duplicate_rows,
        missing_values,
        dates_converted,
    };
    info!(
        "Assessed {} rows: {} duplicates, {} missing values",
        report.rows,
        report.duplicate_rows,
        report.total_missing()
    );
    Ok((cleaned, report))
}

/// Number of rows that repeat an earlier row exactly.
pub fn count_duplicates(dataset: &Dataset) -> Result<usize, BikeShareError> {
    let frame = dataset.frame();
    let distinct = frame
        .clone()
        .lazy()
        .unique(None, UniqueKeepStrategy::First)
        .collect()?
        .height();
    Ok(frame.height() - distinct)
}

pub fn count_missing(dataset: &Dataset) -> Vec<MissingValues> {
    dataset
        .frame()
        .get_columns()
        .iter()
        .map(|column| MissingValues {
            column: column.name().to_string(),
            count: column.null_count(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::fixture_dataset;
    use crate::types::columns::{DATE, HUMIDITY};

    #[test]
    fn test_clean_reports_without_dropping() -> Result<(), Box<dyn std::error::Error>> {
        let dataset = fixture_dataset()?;
        let (cleaned, report) = clean(dataset.clone())?;

        assert_eq!(report.rows, 8);
        assert_eq!(cleaned.height(), dataset.height());
        assert_eq!(report.duplicate_rows, 1);
        assert_eq!(report.total_missing(), 1);

        let humidity = report
            .missing_values
            .iter()
            .find(|m| m.column == HUMIDITY)
            .expect("humidity listed");
        assert_eq!(humidity.count, 1);
        assert_eq!(report.missing_values.len(), dataset.frame().width());
        Ok(())
    }

    #[test]
    fn test_clean_converts_dates() -> Result<(), Box<dyn std::error::Error>> {
        let dataset = fixture_dataset()?;
        let (cleaned, report) = clean(dataset.clone())?;

        assert!(report.dates_converted);
        assert!(cleaned.has_parsed_dates());
        assert_eq!(cleaned.frame().column(DATE)?.dtype(), &DataType::Date);
        // The input is untouched.
        assert!(!dataset.has_parsed_dates());

        let (_, second) = clean(cleaned)?;
        assert!(!second.dates_converted);
        Ok(())
    }

    #[test]
    fn test_duplicate_count_survives_cleaning() -> Result<(), Box<dyn std::error::Error>> {
        let dataset = fixture_dataset()?;
        let direct = count_duplicates(&dataset)?;

        let (cleaned, report) = clean(dataset)?;

        assert_eq!(report.duplicate_rows, direct);
        assert_eq!(count_duplicates(&cleaned)?, direct);
        Ok(())
    }

    #[test]
    fn test_bad_date_is_schema_error() -> Result<(), Box<dyn std::error::Error>> {
        let frame = df!(
            DATE => ["2011-01-01", "01/02/2011"],
            "season" => [1i32, 1],
            "mnth" => [1i32, 1],
            "temp" => [0.3f64, 0.4],
            HUMIDITY => [0.5f64, 0.6],
            "cnt" => [985i64, 801]
        )?;
        let dataset = Dataset::try_from_frame(frame)?;

        assert!(matches!(
            clean(dataset),
            Err(BikeShareError::Schema(
                crate::dataset::error::SchemaError::DateParse { .. }
            ))
        ));
        Ok(())
    }
}
