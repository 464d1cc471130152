//! Renders the report charts as standalone HTML files.

pub mod artifact;
mod charts;

use crate::analysis::aggregate::Summaries;
use crate::analysis::correlation::correlation_matrix;
use crate::error::BikeShareError;
use crate::render::artifact::{Artifact, ArtifactKind};
use crate::render::charts::{
    bar_frame, bar_plot, heatmap_frame, heatmap_plot, scatter_frame, scatter_plot,
};
use crate::types::columns::{HUMIDITY, TEMPERATURE};
use crate::types::dataset::Dataset;
use log::info;
use plotlars::Plot;
use std::path::Path;

/// Writes the five report charts into `output_dir`, in [`ArtifactKind::ALL`] order.
///
/// The scatter plots and the heatmap are drawn from `dataset`; the bar charts
/// from the monthly and seasonal aggregates of `summaries`, so months and
/// seasons keep their code order. Neither input is modified.
///
/// # Errors
///
/// Returns [`BikeShareError::OutputDirCreation`] if `output_dir` cannot be
/// created, [`BikeShareError::ReportWrite`] if a chart file cannot be created,
/// or a polars error if the chart data cannot be prepared.
///
/// # Panics
///
/// plotlars unwraps its own file handling, so a chart file that becomes
/// unwritable between the creation check and the write still panics.
pub fn render(
    dataset: &Dataset,
    summaries: &Summaries,
    output_dir: &Path,
) -> Result<Vec<Artifact>, BikeShareError> {
    std::fs::create_dir_all(output_dir)
        .map_err(|e| BikeShareError::OutputDirCreation(output_dir.to_path_buf(), e))?;

    ArtifactKind::ALL
        .iter()
        .map(|kind| -> Result<Artifact, BikeShareError> {
            let path = output_dir.join(kind.file_name());
            std::fs::File::create(&path)
                .map_err(|e| BikeShareError::ReportWrite(path.clone(), e))?;
            let target = path.to_string_lossy().to_string();
            match kind {
                ArtifactKind::TemperatureScatter => {
                    let chart = scatter_frame(dataset, TEMPERATURE)?;
                    scatter_plot(*kind, &chart, TEMPERATURE).write_html(target);
                }
                ArtifactKind::HumidityScatter => {
                    let chart = scatter_frame(dataset, HUMIDITY)?;
                    scatter_plot(*kind, &chart, HUMIDITY).write_html(target);
                }
                ArtifactKind::CorrelationHeatmap => {
                    let chart = heatmap_frame(&correlation_matrix(dataset)?)?;
                    heatmap_plot(*kind, &chart).write_html(target);
                }
                ArtifactKind::MonthlyTrend => {
                    let chart = bar_frame(&summaries.monthly)?;
                    bar_plot(*kind, &chart, "Month").write_html(target);
                }
                ArtifactKind::SeasonalTrend => {
                    let chart = bar_frame(&summaries.seasonal)?;
                    bar_plot(*kind, &chart, "Season").write_html(target);
                }
            }
            info!("Rendered '{}' to {}", kind.title(), path.display());
            Ok(Artifact {
                kind: *kind,
                title: kind.title().to_string(),
                path,
            })
        })
        .collect()
}
