//! Small slice of `day.csv` shared by the unit tests.
//!
//! Rows 3 and 4 are an exact duplicate and row 5 has no humidity.

use crate::dataset::data_loader::parse_csv;
use crate::types::dataset::Dataset;
use crate::types::record::Record;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

pub(crate) const DAY_CSV: &str = "\
instant,dteday,season,yr,mnth,holiday,weekday,workingday,weathersit,temp,atemp,hum,windspeed,casual,registered,cnt
1,2011-01-01,1,0,1,0,6,0,2,0.344167,0.363625,0.805833,0.160446,331,654,985
2,2011-01-02,1,0,1,0,0,0,2,0.363478,0.353739,0.696087,0.248539,131,670,801
3,2011-01-03,1,0,1,0,1,1,1,0.196364,0.189405,0.437273,0.248309,120,1229,1349
3,2011-01-03,1,0,1,0,1,1,1,0.196364,0.189405,0.437273,0.248309,120,1229,1349
105,2011-04-15,2,0,4,1,5,0,1,0.446667,0.441913,,0.225754,1203,3146,4349
185,2011-07-04,3,0,7,1,1,0,2,0.726667,0.665417,0.637917,0.081479,3065,2978,6043
289,2011-10-16,4,0,10,0,0,0,1,0.5275,0.525,0.44125,0.121504,2397,3175,5572
359,2011-12-25,1,0,12,0,0,0,1,0.275,0.282454,0.50625,0.166,263,551,814
";

pub(crate) fn fixture_dataset() -> Result<Dataset, Box<dyn std::error::Error>> {
    let frame = parse_csv(DAY_CSV.as_bytes(), "fixture")?;
    Ok(Dataset::try_from_frame(frame)?)
}

pub(crate) fn write_fixture(dir: &Path, contents: &str) -> std::io::Result<PathBuf> {
    let path = dir.join("day.csv");
    std::fs::write(&path, contents)?;
    Ok(path)
}

pub(crate) fn record(
    year: i32,
    month: u32,
    day: u32,
    season: u8,
    temperature: f64,
    humidity: f64,
    count: u64,
) -> Record {
    Record {
        date: NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date"),
        season,
        month: month as u8,
        temperature,
        humidity,
        count,
    }
}
