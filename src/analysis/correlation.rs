use crate::error::BikeShareError;
use crate::types::columns::{COUNT, HUMIDITY, TEMPERATURE};
use crate::types::dataset::Dataset;
use polars::prelude::*;
use serde::Serialize;

/// Pairwise Pearson correlations between a fixed set of columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major, `values[i][j]` correlates `columns[i]` with `columns[j]`.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values.get(i)?.get(j).copied()
    }
}

/// Correlation of temperature, humidity and rental count.
///
/// Each pair is computed over the rows where both of its values are present,
/// so a missing humidity does not drop the row from the temperature/count
/// pair. A column without variance correlates as `NaN`.
pub fn correlation_matrix(dataset: &Dataset) -> Result<CorrelationMatrix, BikeShareError> {
    correlate(dataset, &[TEMPERATURE, HUMIDITY, COUNT])
}

fn correlate(dataset: &Dataset, columns: &[&str]) -> Result<CorrelationMatrix, BikeShareError> {
    let n = columns.len();
    let mut values = vec![vec![1.0; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let r = pair_coefficient(dataset.frame(), columns[i], columns[j])?;
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        columns: columns.iter().map(|c| c.to_string()).collect(),
        values,
    })
}

fn pair_coefficient(frame: &DataFrame, a: &str, b: &str) -> Result<f64, BikeShareError> {
    let coefficient = frame
        .clone()
        .lazy()
        .select([
            col(a).cast(DataType::Float64),
            col(b).cast(DataType::Float64),
        ])
        .drop_nulls(None)
        .select([pearson(a, b).alias("r")])
        .collect()?;
    Ok(coefficient.column("r")?.f64()?.get(0).unwrap_or(f64::NAN))
}

/// Population covariance over the product of population deviations.
fn pearson(a: &str, b: &str) -> Expr {
    let da = col(a) - col(a).mean();
    let db = col(b) - col(b).mean();
    (da * db).mean() / (col(a).std(0) * col(b).std(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{fixture_dataset, record};

    #[test]
    fn test_matrix_is_symmetric_with_unit_diagonal() -> Result<(), Box<dyn std::error::Error>> {
        let matrix = correlation_matrix(&fixture_dataset()?)?;

        assert_eq!(matrix.columns, vec!["temp", "hum", "cnt"]);
        for i in 0..3 {
            assert_eq!(matrix.values[i][i], 1.0);
            for j in 0..3 {
                assert_eq!(matrix.values[i][j], matrix.values[j][i]);
                assert!(matrix.values[i][j].abs() <= 1.0 + 1e-12);
            }
        }
        // Warmer days see more rentals in the fixture.
        assert!(matrix.get(TEMPERATURE, COUNT).unwrap_or_default() > 0.5);
        Ok(())
    }

    #[test]
    fn test_perfect_linear_relation() -> Result<(), Box<dyn std::error::Error>> {
        let dataset = Dataset::from_records(&[
            record(2011, 1, 1, 1, 0.1, 0.9, 100),
            record(2011, 1, 2, 1, 0.2, 0.8, 200),
            record(2011, 1, 3, 1, 0.3, 0.7, 300),
        ])?;
        let matrix = correlation_matrix(&dataset)?;

        let temp_count = matrix.get(TEMPERATURE, COUNT).expect("pair present");
        let hum_count = matrix.get(HUMIDITY, COUNT).expect("pair present");
        assert!((temp_count - 1.0).abs() < 1e-9);
        assert!((hum_count + 1.0).abs() < 1e-9);
        Ok(())
    }

    fn manual_pearson(pairs: &[(f64, f64)]) -> f64 {
        let n = pairs.len() as f64;
        let mean_a = pairs.iter().map(|p| p.0).sum::<f64>() / n;
        let mean_b = pairs.iter().map(|p| p.1).sum::<f64>() / n;
        let cov: f64 = pairs.iter().map(|p| (p.0 - mean_a) * (p.1 - mean_b)).sum();
        let var_a: f64 = pairs.iter().map(|p| (p.0 - mean_a).powi(2)).sum();
        let var_b: f64 = pairs.iter().map(|p| (p.1 - mean_b).powi(2)).sum();
        cov / (var_a * var_b).sqrt()
    }

    #[test]
    fn test_pairs_skip_only_their_own_missing_values() -> Result<(), Box<dyn std::error::Error>> {
        let dataset = fixture_dataset()?;
        let frame = dataset.frame();
        let temps: Vec<Option<f64>> = frame.column(TEMPERATURE)?.f64()?.into_iter().collect();
        let hums: Vec<Option<f64>> = frame.column(HUMIDITY)?.f64()?.into_iter().collect();
        let counts: Vec<Option<f64>> = frame
            .column(COUNT)?
            .i64()?
            .into_iter()
            .map(|c| c.map(|c| c as f64))
            .collect();
        let zip = |a: &[Option<f64>], b: &[Option<f64>]| -> Vec<(f64, f64)> {
            a.iter()
                .zip(b)
                .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
                .collect()
        };

        let matrix = correlation_matrix(&dataset)?;

        // The fixture's one missing humidity only affects pairs with humidity.
        let temp_count = zip(&temps, &counts);
        assert_eq!(temp_count.len(), 8);
        let expected = manual_pearson(&temp_count);
        let actual = matrix.get(TEMPERATURE, COUNT).expect("pair present");
        assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
        assert!((actual - 0.870759).abs() < 1e-5);

        let hum_count = zip(&hums, &counts);
        assert_eq!(hum_count.len(), 7);
        let actual = matrix.get(HUMIDITY, COUNT).expect("pair present");
        assert!((actual - manual_pearson(&hum_count)).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_get_on_short_matrix_is_none() {
        let matrix = CorrelationMatrix {
            columns: vec!["a".to_string(), "b".to_string()],
            values: vec![vec![1.0]],
        };
        assert_eq!(matrix.get("a", "a"), Some(1.0));
        assert_eq!(matrix.get("b", "a"), None);
        assert_eq!(matrix.get("a", "b"), None);
        assert_eq!(matrix.get("c", "a"), None);
    }
}
