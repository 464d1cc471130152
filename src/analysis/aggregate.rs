//! Grouped summary statistics of the daily rental count.

use crate::error::BikeShareError;
use crate::types::columns::{COUNT, HUMIDITY, MONTH, SEASON, TEMPERATURE};
use crate::types::dataset::Dataset;
use crate::types::labels::{month_label, season_label};
use log::debug;
use polars::prelude::*;
use serde::Serialize;
use std::fmt;

const ROWS: &str = "rows";
const SUM: &str = "sum";
const MAX: &str = "max";
const MIN: &str = "min";
const MEAN: &str = "mean";
const STD: &str = "std";

/// The field(s) records are grouped on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GroupBy {
    /// The (temperature, humidity) pair.
    Weather,
    Month,
    Season,
}

impl GroupBy {
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            GroupBy::Weather => &[TEMPERATURE, HUMIDITY],
            GroupBy::Month => &[MONTH],
            GroupBy::Season => &[SEASON],
        }
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.columns().join("+"))
    }
}

/// Value of the grouping field(s) shared by the records of one group.
/// Month and season hold the raw dataset codes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    Weather { temperature: f64, humidity: f64 },
    Month(i32),
    Season(i32),
}

impl GroupKey {
    /// Display form of the key: month and season names, or the weather pair.
    pub fn label(&self) -> String {
        match self {
            GroupKey::Weather {
                temperature,
                humidity,
            } => format!("{temperature} / {humidity}"),
            GroupKey::Month(code) => month_label(*code),
            GroupKey::Season(code) => season_label(*code),
        }
    }
}

/// Summary of the rental counts of one group.
///
/// `std` is the sample standard deviation; groups with a single count have none.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregate {
    pub key: GroupKey,
    /// Number of non-missing counts in the group.
    pub rows: u64,
    pub sum: i64,
    pub max: Option<i64>,
    pub min: Option<i64>,
    pub mean: Option<f64>,
    pub std: Option<f64>,
}

/// Groups the records of `dataset` by `by` and summarises `cnt` per group.
///
/// Groups come back in ascending key order. Records whose key is missing are
/// left out.
///
/// # Examples
///
/// ```
/// use bikeshare::{aggregate, Dataset, GroupBy, GroupKey, Record};
/// use chrono::NaiveDate;
///
/// let day = |m: u32, d: u32, count: u64| Record {
///     date: NaiveDate::from_ymd_opt(2011, m, d).unwrap(),
///     season: 1,
///     month: m as u8,
///     temperature: 0.3,
///     humidity: 0.6,
///     count,
/// };
/// let dataset = Dataset::from_records(&[day(1, 1, 10), day(1, 2, 20), day(2, 1, 30)]).unwrap();
///
/// let by_month = aggregate(&dataset, GroupBy::Month).unwrap();
/// assert_eq!(by_month[0].key, GroupKey::Month(1));
/// assert_eq!(by_month[0].sum, 30);
/// assert_eq!(by_month[0].mean, Some(15.0));
/// ```
pub fn aggregate(dataset: &Dataset, by: GroupBy) -> Result<Vec<Aggregate>, BikeShareError> {
    let keys: Vec<Expr> = by.columns().iter().map(|c| col(*c)).collect();
    let key_present = by
        .columns()
        .iter()
        .fold(lit(true), |acc, c| acc.and(col(*c).is_not_null()));

    let counts = col(COUNT);
    let frame = dataset
        .frame()
        .clone()
        .lazy()
        .filter(key_present)
        .group_by(keys.clone())
        .agg([
            counts.clone().count().cast(DataType::UInt64).alias(ROWS),
            counts.clone().sum().cast(DataType::Int64).alias(SUM),
            counts.clone().max().alias(MAX),
            counts.clone().min().alias(MIN),
            counts.clone().cast(DataType::Float64).mean().alias(MEAN),
            counts.cast(DataType::Float64).std(1).alias(STD),
        ])
        .sort_by_exprs(keys, SortMultipleOptions::default())
        .collect()?;

    let group_keys = extract_keys(&frame, by)?;
    let rows = frame.column(ROWS)?.u64()?;
    let sums = frame.column(SUM)?.i64()?;
    let maxima = frame.column(MAX)?.i64()?;
    let minima = frame.column(MIN)?.i64()?;
    let means = frame.column(MEAN)?.f64()?;
    let stds = frame.column(STD)?.f64()?;

    let aggregates: Vec<Aggregate> = group_keys
        .into_iter()
        .enumerate()
        .map(|(i, key)| {
            let rows = rows.get(i).unwrap_or(0);
            Aggregate {
                key,
                rows,
                sum: sums.get(i).unwrap_or(0),
                max: maxima.get(i),
                min: minima.get(i),
                mean: means.get(i).filter(|m| m.is_finite()),
                std: stds.get(i).filter(|s| rows > 1 && s.is_finite()),
            }
        })
        .collect();

    debug!("Aggregated {} groups by {}", aggregates.len(), by);
    Ok(aggregates)
}

fn extract_keys(frame: &DataFrame, by: GroupBy) -> Result<Vec<GroupKey>, BikeShareError> {
    let keys: Option<Vec<GroupKey>> = match by {
        GroupBy::Weather => {
            let temperatures = frame.column(TEMPERATURE)?.f64()?;
            let humidities = frame.column(HUMIDITY)?.f64()?;
            temperatures
                .into_iter()
                .zip(humidities)
                .map(|(t, h)| {
                    Some(GroupKey::Weather {
                        temperature: t?,
                        humidity: h?,
                    })
                })
                .collect()
        }
        GroupBy::Month => frame
            .column(MONTH)?
            .i32()?
            .into_iter()
            .map(|m| m.map(GroupKey::Month))
            .collect(),
        GroupBy::Season => frame
            .column(SEASON)?
            .i32()?
            .into_iter()
            .map(|s| s.map(GroupKey::Season))
            .collect(),
    };
    // Null keys were filtered out before grouping.
    keys.ok_or_else(|| {
        BikeShareError::Polars(PolarsError::ComputeError(
            format!("null group key after grouping by {}", by).into(),
        ))
    })
}

/// The three grouped summaries the report shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summaries {
    pub weather: Vec<Aggregate>,
    pub monthly: Vec<Aggregate>,
    pub seasonal: Vec<Aggregate>,
}

impl Summaries {
    pub fn compute(dataset: &Dataset) -> Result<Self, BikeShareError> {
        Ok(Self {
            weather: aggregate(dataset, GroupBy::Weather)?,
            monthly: aggregate(dataset, GroupBy::Month)?,
            seasonal: aggregate(dataset, GroupBy::Season)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{fixture_dataset, record};

    #[test]
    fn test_synthetic_monthly_aggregate() -> Result<(), Box<dyn std::error::Error>> {
        let dataset = Dataset::from_records(&[
            record(2011, 1, 1, 1, 0.2, 0.5, 10),
            record(2011, 1, 2, 1, 0.3, 0.5, 20),
            record(2011, 2, 1, 1, 0.4, 0.5, 30),
        ])?;

        let by_month = aggregate(&dataset, GroupBy::Month)?;
        assert_eq!(by_month.len(), 2);

        let january = &by_month[0];
        assert_eq!(january.key, GroupKey::Month(1));
        assert_eq!(january.rows, 2);
        assert_eq!(january.sum, 30);
        assert_eq!(january.max, Some(20));
        assert_eq!(january.min, Some(10));
        assert_eq!(january.mean, Some(15.0));
        let std = january.std.expect("two values have a deviation");
        assert!((std - 50f64.sqrt()).abs() < 1e-9);

        let february = &by_month[1];
        assert_eq!(february.key, GroupKey::Month(2));
        assert_eq!(february.sum, 30);
        assert_eq!(february.max, Some(30));
        assert_eq!(february.min, Some(30));
        assert_eq!(february.mean, Some(30.0));
        assert_eq!(february.std, None);
        Ok(())
    }

    #[test]
    fn test_month_keys_are_ordered_codes() -> Result<(), Box<dyn std::error::Error>> {
        let dataset = fixture_dataset()?;
        let by_month = aggregate(&dataset, GroupBy::Month)?;

        let keys: Vec<GroupKey> = by_month.iter().map(|a| a.key).collect();
        assert_eq!(
            keys,
            vec![
                GroupKey::Month(1),
                GroupKey::Month(4),
                GroupKey::Month(7),
                GroupKey::Month(10),
                GroupKey::Month(12),
            ]
        );
        assert!(keys.len() <= 12);

        let january = &by_month[0];
        assert_eq!(january.rows, 4);
        assert_eq!(january.sum, 4484);
        assert_eq!(january.mean, Some(1121.0));
        let std = january.std.expect("january has several days");
        assert!((std - 273.778_499).abs() < 1e-3);
        Ok(())
    }

    #[test]
    fn test_season_keys_within_codes() -> Result<(), Box<dyn std::error::Error>> {
        let dataset = fixture_dataset()?;
        let by_season = aggregate(&dataset, GroupBy::Season)?;

        assert_eq!(by_season.len(), 4);
        for aggregate in &by_season {
            match aggregate.key {
                GroupKey::Season(code) => assert!((1..=4).contains(&code)),
                other => panic!("Unexpected key {:?}", other),
            }
        }
        assert_eq!(by_season[0].sum, 5298);
        assert_eq!(by_season[0].key.label(), "Winter");
        assert_eq!(by_season.iter().map(|a| a.rows).sum::<u64>(), 8);
        Ok(())
    }

    #[test]
    fn test_weather_groups_skip_missing_keys() -> Result<(), Box<dyn std::error::Error>> {
        let dataset = fixture_dataset()?;
        let by_weather = aggregate(&dataset, GroupBy::Weather)?;

        // Eight rows, one duplicate pair, one row without humidity.
        assert_eq!(by_weather.len(), 6);

        let temperatures: Vec<f64> = by_weather
            .iter()
            .map(|a| match a.key {
                GroupKey::Weather { temperature, .. } => temperature,
                other => panic!("Unexpected key {:?}", other),
            })
            .collect();
        assert!(temperatures.windows(2).all(|w| w[0] <= w[1]));
        Ok(())
    }

    #[test]
    fn test_aggregation_is_deterministic() -> Result<(), Box<dyn std::error::Error>> {
        let dataset = fixture_dataset()?;
        assert_eq!(Summaries::compute(&dataset)?, Summaries::compute(&dataset)?);
        Ok(())
    }
}
