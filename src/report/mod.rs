//! Writes the report page and its machine-readable summary.

pub mod page;

use crate::analysis::aggregate::Summaries;
use crate::analysis::clean::CleaningReport;
use crate::analysis::correlation::CorrelationMatrix;
use crate::error::BikeShareError;
use crate::render::artifact::Artifact;
use crate::report::page::ReportPage;
use crate::types::dataset::Dataset;
use log::info;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;

pub const INDEX_FILE_NAME: &str = "index.html";
pub const SUMMARY_FILE_NAME: &str = "summary.json";

/// Result of a full pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    /// Where the report page was written.
    pub index: PathBuf,
    pub cleaning: CleaningReport,
    pub summaries: Summaries,
    pub correlation: CorrelationMatrix,
    pub artifacts: Vec<Artifact>,
}

/// Writes `index.html` for `page` into `output_dir`.
pub async fn write_page(output_dir: &Path, page: &ReportPage<'_>) -> Result<PathBuf, BikeShareError> {
    let html = page.to_html()?;
    let path = output_dir.join(INDEX_FILE_NAME);
    fs::write(&path, html)
        .await
        .map_err(|e| BikeShareError::ReportWrite(path.clone(), e))?;
    info!("Wrote report page to {}", path.display());
    Ok(path)
}

/// Writes `summary` as pretty JSON into `output_dir`.
pub async fn write_summary(
    output_dir: &Path,
    summary: &ReportSummary,
) -> Result<PathBuf, BikeShareError> {
    let json = serde_json::to_vec_pretty(summary).map_err(BikeShareError::SummaryEncode)?;
    let path = output_dir.join(SUMMARY_FILE_NAME);
    fs::write(&path, json)
        .await
        .map_err(|e| BikeShareError::ReportWrite(path.clone(), e))?;
    Ok(path)
}

/// Builds the page from pipeline results and writes both report files.
pub(crate) async fn write_report(
    output_dir: &Path,
    dataset: &Dataset,
    cleaning: CleaningReport,
    summaries: Summaries,
    correlation: CorrelationMatrix,
    artifacts: Vec<Artifact>,
    raw_rows: Option<usize>,
) -> Result<ReportSummary, BikeShareError> {
    let page = ReportPage {
        dataset,
        cleaning: &cleaning,
        summaries: &summaries,
        artifacts: &artifacts,
        raw_rows,
    };
    let index = write_page(output_dir, &page).await?;

    let summary = ReportSummary {
        index,
        cleaning,
        summaries,
        correlation,
        artifacts,
    };
    write_summary(output_dir, &summary).await?;
    Ok(summary)
}
