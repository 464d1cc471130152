//! Contains the `Dataset` wrapper around the loaded bike-sharing `DataFrame`.

use crate::dataset::error::SchemaError;
use crate::error::BikeShareError;
use crate::types::columns::{
    required_columns, COUNT, DATE, DATE_FORMAT, HUMIDITY, MONTH, SEASON, TEMPERATURE,
};
use crate::types::record::Record;
use chrono::NaiveDate;
use polars::prelude::*;

// Days between 0001-01-01 and 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// The bike-sharing dataset, validated against the columns the pipeline needs.
///
/// The underlying frame keeps every column of the source file, so whole-row
/// checks (duplicates, missing values) and the raw table see the data as it
/// was loaded. The required columns are coerced on construction:
/// `season`/`mnth` to `Int32`, `cnt` to `Int64`, `temp`/`hum` to `Float64`.
///
/// A `Dataset` is never modified in place. Operations that change it, like
/// [`crate::clean`], return a new one.
#[derive(Debug, Clone)]
pub struct Dataset {
    frame: DataFrame,
}

impl Dataset {
    /// Validates `frame` and wraps it.
    ///
    /// # Errors
    ///
    /// * [`SchemaError::MissingColumn`] if one of `dteday, season, mnth, temp, hum, cnt` is absent.
    /// * [`SchemaError::ColumnType`] if a column cannot be coerced to its numeric type.
    /// * [`SchemaError::CodeOutOfRange`] for a season outside 1..=4 or a month outside 1..=12.
    /// * [`SchemaError::NegativeCount`] for a negative rental count.
    pub fn try_from_frame(mut frame: DataFrame) -> Result<Self, SchemaError> {
        for (name, dtype) in required_columns() {
            let column = frame
                .column(name)
                .map_err(|_| SchemaError::MissingColumn(name.to_string()))?;
            let Some(dtype) = dtype else {
                continue;
            };
            if column.dtype() == &dtype {
                continue;
            }
            let coerced = column
                .strict_cast(&dtype)
                .map_err(|source| SchemaError::ColumnType {
                    column: name.to_string(),
                    expected: dtype.clone(),
                    source,
                })?;
            frame
                .with_column(coerced)
                .map_err(|source| SchemaError::ColumnType {
                    column: name.to_string(),
                    expected: dtype,
                    source,
                })?;
        }

        check_codes(&frame, SEASON, 1, 4)?;
        check_codes(&frame, MONTH, 1, 12)?;
        check_counts(&frame)?;

        Ok(Self { frame })
    }

    /// Builds a dataset holding only the pipeline columns of `records`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bikeshare::{Dataset, Record};
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
    /// let dataset = Dataset::from_records(&[record.clone()]).unwrap();
    /// assert_eq!(dataset.records().unwrap(), vec![record]);
    /// ```
    pub fn from_records(records: &[Record]) -> Result<Self, BikeShareError> {
        let frame = df!(
            DATE => records.iter().map(|r| r.date.format(DATE_FORMAT).to_string()).collect::<Vec<_>>(),
            SEASON => records.iter().map(|r| i32::from(r.season)).collect::<Vec<_>>(),
            MONTH => records.iter().map(|r| i32::from(r.month)).collect::<Vec<_>>(),
            TEMPERATURE => records.iter().map(|r| r.temperature).collect::<Vec<_>>(),
            HUMIDITY => records.iter().map(|r| r.humidity).collect::<Vec<_>>(),
            COUNT => records.iter().map(|r| r.count as i64).collect::<Vec<_>>()
        )?;
        Ok(Self::try_from_frame(frame)?)
    }

    /// The validated frame, including the columns the pipeline ignores.
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// Whether `dteday` already holds structured dates rather than text.
    pub fn has_parsed_dates(&self) -> bool {
        self.frame
            .column(DATE)
            .map(|c| c.dtype() == &DataType::Date)
            .unwrap_or(false)
    }

    /// Returns the rows as typed [`Record`]s, in dataset order.
    ///
    /// Text dates are parsed on the fly; the dataset itself is left as is.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::NullValue`] if any pipeline column is missing a value,
    /// [`SchemaError::DateParse`] if a date cannot be parsed and
    /// [`SchemaError::DateOutOfRange`] if a date lies outside what `NaiveDate` holds.
    pub fn records(&self) -> Result<Vec<Record>, BikeShareError> {
        let frame = with_parsed_dates(self.frame.clone())?;

        let dates = frame.column(DATE)?.cast(&DataType::Int32)?;
        let dates = dates.i32()?;
        let seasons = frame.column(SEASON)?.i32()?;
        let months = frame.column(MONTH)?.i32()?;
        let temperatures = frame.column(TEMPERATURE)?.f64()?;
        let humidities = frame.column(HUMIDITY)?.f64()?;
        let counts = frame.column(COUNT)?.i64()?;

        (0..frame.height())
            .map(|row| -> Result<Record, BikeShareError> {
                let days = required(dates.get(row), DATE, row)?;
                let date = days
                    .checked_add(UNIX_EPOCH_DAYS_FROM_CE)
                    .and_then(NaiveDate::from_num_days_from_ce_opt)
                    .ok_or_else(|| SchemaError::DateOutOfRange {
                        column: DATE.to_string(),
                        row,
                        days,
                    })?;
                Ok(Record {
                    date,
                    // Codes were range checked on construction.
                    season: required(seasons.get(row), SEASON, row)? as u8,
                    month: required(months.get(row), MONTH, row)? as u8,
                    temperature: required(temperatures.get(row), TEMPERATURE, row)?,
                    humidity: required(humidities.get(row), HUMIDITY, row)?,
                    count: required(counts.get(row), COUNT, row)? as u64,
                })
            })
            .collect()
    }
}

/// Equality by value: same columns, same types, same cells (nulls compare equal).
impl PartialEq for Dataset {
    fn eq(&self, other: &Self) -> bool {
        self.frame.equals_missing(&other.frame)
    }
}

/// Converts a textual `dteday` column into `Date`. Frames whose dates are
/// already parsed are returned unchanged.
pub(crate) fn with_parsed_dates(frame: DataFrame) -> Result<DataFrame, SchemaError> {
    let is_text = frame
        .column(DATE)
        .map(|c| c.dtype() == &DataType::String)
        .map_err(|_| SchemaError::MissingColumn(DATE.to_string()))?;
    if !is_text {
        return Ok(frame);
    }

    frame
        .lazy()
        .with_column(col(DATE).str().to_date(StrptimeOptions {
            format: Some(DATE_FORMAT.into()),
            strict: true,
            ..Default::default()
        }))
        .collect()
        .map_err(|source| SchemaError::DateParse {
            column: DATE.to_string(),
            source,
        })
}

fn required<T>(value: Option<T>, column: &str, row: usize) -> Result<T, SchemaError> {
    value.ok_or_else(|| SchemaError::NullValue {
        column: column.to_string(),
        row,
    })
}

fn check_codes(frame: &DataFrame, column: &str, min: i32, max: i32) -> Result<(), SchemaError> {
    let values = frame
        .column(column)
        .and_then(|c| c.i32())
        .map_err(|source| SchemaError::ColumnType {
            column: column.to_string(),
            expected: DataType::Int32,
            source,
        })?;

    match values
        .into_iter()
        .flatten()
        .find(|value| *value < min || *value > max)
    {
        Some(value) => Err(SchemaError::CodeOutOfRange {
            column: column.to_string(),
            value,
            min,
            max,
        }),
        None => Ok(()),
    }
}

fn check_counts(frame: &DataFrame) -> Result<(), SchemaError> {
    let counts = frame
        .column(COUNT)
        .and_then(|c| c.i64())
        .map_err(|source| SchemaError::ColumnType {
            column: COUNT.to_string(),
            expected: DataType::Int64,
            source,
        })?;

    match counts.into_iter().flatten().find(|value| *value < 0) {
        Some(value) => Err(SchemaError::NegativeCount {
            column: COUNT.to_string(),
            value,
        }),
        None => Ok(()),
    }
}
