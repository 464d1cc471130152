//! Chart-ready frames and the plotlars plots built from them.
//!
//! Month and season codes are turned into their display labels here, on
//! copies of the data, so the dataset keeps its numeric codes.

use crate::analysis::aggregate::Aggregate;
use crate::analysis::correlation::CorrelationMatrix;
use crate::error::BikeShareError;
use crate::render::artifact::ArtifactKind;
use crate::types::columns::{COUNT, HUMIDITY, SEASON, TEMPERATURE};
use crate::types::dataset::Dataset;
use crate::types::labels::season_label;
use plotlars::{BarPlot, HeatMap, ScatterPlot, Text};
use polars::prelude::*;

pub(crate) const SEASON_LABEL: &str = "season_label";
pub(crate) const LABEL: &str = "label";
pub(crate) const MEAN: &str = "mean";
const X: &str = "x";
const Y: &str = "y";
const Z: &str = "z";

/// `x` and `cnt` for rows where both are present, with a season label per row.
pub(crate) fn scatter_frame(dataset: &Dataset, x: &str) -> Result<DataFrame, BikeShareError> {
    let mut chart = dataset
        .frame()
        .clone()
        .lazy()
        .select([col(x), col(COUNT), col(SEASON)])
        .drop_nulls(None)
        .collect()?;

    let labels: Vec<String> = chart
        .column(SEASON)?
        .i32()?
        .into_iter()
        .map(|code| code.map(season_label).unwrap_or_default())
        .collect();
    chart.with_column(Column::new(SEASON_LABEL.into(), labels))?;
    Ok(chart)
}

/// Long-form (x, y, z) frame of a correlation matrix.
pub(crate) fn heatmap_frame(matrix: &CorrelationMatrix) -> Result<DataFrame, BikeShareError> {
    let display: Vec<&str> = matrix.columns.iter().map(|c| axis_label(c)).collect();

    let mut xs = Vec::new();
    let mut ys = Vec::new();
    let mut zs = Vec::new();
    for (i, row) in matrix.values.iter().enumerate() {
        for (j, value) in row.iter().enumerate() {
            xs.push(display[j]);
            ys.push(display[i]);
            zs.push((value * 100.0).round() / 100.0);
        }
    }

    Ok(df!(X => xs, Y => ys, Z => zs)?)
}

/// Label / mean-count frame of a set of aggregates, in aggregate order.
pub(crate) fn bar_frame(aggregates: &[Aggregate]) -> Result<DataFrame, BikeShareError> {
    let labels: Vec<String> = aggregates.iter().map(|a| a.key.label()).collect();
    let means: Vec<Option<f64>> = aggregates.iter().map(|a| a.mean).collect();
    Ok(df!(LABEL => labels, MEAN => means)?)
}

pub(crate) fn scatter_plot(kind: ArtifactKind, chart: &DataFrame, x: &str) -> ScatterPlot {
    ScatterPlot::builder()
        .data(chart)
        .x(x)
        .y(COUNT)
        .group(SEASON_LABEL)
        .opacity(0.7)
        .plot_title(Text::from(kind.title()).size(18))
        .x_title(axis_label(x))
        .y_title(axis_label(COUNT))
        .legend_title("Season")
        .build()
}

pub(crate) fn heatmap_plot(kind: ArtifactKind, chart: &DataFrame) -> HeatMap {
    HeatMap::builder()
        .data(chart)
        .x(X)
        .y(Y)
        .z(Z)
        .plot_title(Text::from(kind.title()).size(18))
        .build()
}

pub(crate) fn bar_plot(kind: ArtifactKind, chart: &DataFrame, x_title: &str) -> BarPlot {
    BarPlot::builder()
        .data(chart)
        .labels(LABEL)
        .values(MEAN)
        .plot_title(Text::from(kind.title()).size(18))
        .x_title(x_title)
        .y_title("Mean Bike Rentals")
        .build()
}

fn axis_label(column: &str) -> &str {
    match column {
        TEMPERATURE => "Temperature",
        HUMIDITY => "Humidity",
        COUNT => "Bike Rentals",
        other => other,
    }
}
