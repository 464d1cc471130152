//! Column names of the bike-sharing `day.csv` file used by the pipeline.

use polars::prelude::DataType;

pub const DATE: &str = "dteday";
pub const SEASON: &str = "season";
pub const MONTH: &str = "mnth";
pub const TEMPERATURE: &str = "temp";
pub const HUMIDITY: &str = "hum";
pub const COUNT: &str = "cnt";

/// Date format of the `dteday` column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Columns the pipeline needs, with the type each one is coerced to on load.
/// `dteday` stays textual until cleaning.
pub(crate) fn required_columns() -> [(&'static str, Option<DataType>); 6] {
    [
        (DATE, None),
        (SEASON, Some(DataType::Int32)),
        (MONTH, Some(DataType::Int32)),
        (TEMPERATURE, Some(DataType::Float64)),
        (HUMIDITY, Some(DataType::Float64)),
        (COUNT, Some(DataType::Int64)),
    ]
}
