//! Loads the bike-sharing day dataset, summarises the daily rental count by
//! weather, month and season, and renders the results as a chart report.

mod analysis;
mod bikeshare;
mod dataset;
mod error;
mod render;
mod report;
mod types;

#[cfg(test)]
mod test_fixtures;

pub use bikeshare::*;
pub use error::BikeShareError;

pub use dataset::data_loader::{DatasetLoader, DEFAULT_FETCH_TIMEOUT};
pub use dataset::dataset_cache::DatasetCache;
pub use dataset::error::{LoadError, SchemaError};
pub use dataset::source::{DataSource, DEFAULT_DATASET_URL};

pub use types::columns;
pub use types::dataset::Dataset;
pub use types::labels::{Month, Season};
pub use types::record::Record;

pub use analysis::aggregate::{aggregate, Aggregate, GroupBy, GroupKey, Summaries};
pub use analysis::clean::{clean, count_duplicates, count_missing, CleaningReport, MissingValues};
pub use analysis::correlation::{correlation_matrix, CorrelationMatrix};

pub use render::artifact::{Artifact, ArtifactKind};
pub use render::render;

pub use report::page::ReportPage;
pub use report::{write_page, write_summary, ReportSummary, INDEX_FILE_NAME, SUMMARY_FILE_NAME};
