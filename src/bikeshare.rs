//! This module provides the main entry point of the crate. It loads the
//! bike-sharing dataset and runs the reporting pipeline over it.

use crate::analysis::aggregate::Summaries;
use crate::analysis::clean::clean;
use crate::analysis::correlation::correlation_matrix;
use crate::dataset::data_loader::{DatasetLoader, DEFAULT_FETCH_TIMEOUT};
use crate::dataset::dataset_cache::DatasetCache;
use crate::dataset::source::DataSource;
use crate::error::BikeShareError;
use crate::render::render;
use crate::report::{write_report, ReportSummary};
use crate::types::dataset::Dataset;
use bon::bon;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::{fs, task};

/// The client struct for loading the dataset and producing reports.
///
/// It owns the HTTP loader and a [`DatasetCache`], so repeated loads of the
/// same source within one client are served from memory. A cache can be
/// shared between clients by passing it to [`BikeShare::with_options`].
///
/// # Examples
///
/// ```no_run
/// # use bikeshare::{BikeShare, BikeShareError, DataSource};
/// # #[tokio::main]
/// # async fn main() -> Result<(), BikeShareError> {
/// let client = BikeShare::new()?;
/// let dataset = client.load(&DataSource::default()).await?;
/// println!("{} days loaded", dataset.height());
/// # Ok(())
/// # }
/// ```
pub struct BikeShare {
    loader: DatasetLoader,
    cache: Arc<DatasetCache>,
}

#[bon]
impl BikeShare {
    /// Creates a client with the default fetch timeout and a fresh cache.
    ///
    /// # Errors
    ///
    /// Returns [`BikeShareError::Load`] if the HTTP client cannot be built.
    pub fn new() -> Result<Self, BikeShareError> {
        Self::with_options().call()
    }

    /// Creates a client with custom settings.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.fetch_timeout(Duration)`: Optional. Timeout of the dataset download. Defaults to 30 seconds.
    /// * `.no_timeout(bool)`: Optional. Disables the download timeout entirely.
    /// * `.cache(Arc<DatasetCache>)`: Optional. Cache to memoize loads in, e.g. one shared with another client.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bikeshare::{BikeShare, BikeShareError, DatasetCache};
    /// # use std::sync::Arc;
    /// # use std::time::Duration;
    /// # fn main() -> Result<(), BikeShareError> {
    /// let cache = Arc::new(DatasetCache::new());
    /// let client = BikeShare::with_options()
    ///     .fetch_timeout(Duration::from_secs(5))
    ///     .cache(cache.clone())
    ///     .call()?;
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub fn with_options(
        fetch_timeout: Option<Duration>,
        no_timeout: Option<bool>,
        cache: Option<Arc<DatasetCache>>,
    ) -> Result<Self, BikeShareError> {
        let timeout = if no_timeout.unwrap_or(false) {
            None
        } else {
            Some(fetch_timeout.unwrap_or(DEFAULT_FETCH_TIMEOUT))
        };
        Ok(Self {
            loader: DatasetLoader::new(timeout)?,
            cache: cache.unwrap_or_default(),
        })
    }

    /// Loads the dataset from `source`.
    ///
    /// The first call for a source fetches and validates it; later calls for
    /// the same source return the memoized dataset without fetching again.
    ///
    /// # Errors
    ///
    /// * [`BikeShareError::Load`] if the source cannot be read or parsed as CSV.
    /// * [`BikeShareError::Schema`] if required columns are missing or hold invalid values.
    pub async fn load(&self, source: &DataSource) -> Result<Dataset, BikeShareError> {
        self.cache.get_or_load(source, &self.loader).await
    }

    /// The cache this client memoizes loads in.
    pub fn cache(&self) -> &Arc<DatasetCache> {
        &self.cache
    }

    /// Runs the whole pipeline and writes the report into `output_dir`.
    ///
    /// Loads the dataset, assesses and cleans it, computes the weather, monthly
    /// and seasonal summaries, renders the five charts and writes `index.html`
    /// plus `summary.json`.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.output_dir(PathBuf)`: **Required.** Directory the report files are written to. Created if missing.
    /// * `.source(DataSource)`: Optional. Defaults to [`DataSource::default`], the public `day.csv`.
    /// * `.raw_rows(usize)`: Optional. Number of raw rows shown on the page. Defaults to all.
    ///
    /// # Errors
    ///
    /// Any failure is fatal to the run and returned as is; nothing is retried.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use bikeshare::{BikeShare, BikeShareError};
    /// # use std::path::PathBuf;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), BikeShareError> {
    /// let client = BikeShare::new()?;
    /// let summary = client
    ///     .report()
    ///     .output_dir(PathBuf::from("bikeshare_report"))
    ///     .raw_rows(100)
    ///     .call()
    ///     .await?;
    /// println!("Report written to {}", summary.index.display());
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn report(
        &self,
        output_dir: PathBuf,
        source: Option<DataSource>,
        raw_rows: Option<usize>,
    ) -> Result<ReportSummary, BikeShareError> {
        let source = source.unwrap_or_default();

        fs::create_dir_all(&output_dir)
            .await
            .map_err(|e| BikeShareError::OutputDirCreation(output_dir.clone(), e))?;

        let dataset = self.load(&source).await?;
        let (dataset, cleaning) = clean(dataset)?;
        let summaries = Summaries::compute(&dataset)?;
        let correlation = correlation_matrix(&dataset)?;

        let artifacts = {
            let dataset = dataset.clone();
            let summaries = summaries.clone();
            let output_dir = output_dir.clone();
            task::spawn_blocking(move || render(&dataset, &summaries, &output_dir))
                .await??
        };

        let summary = write_report(
            &output_dir,
            &dataset,
            cleaning,
            summaries,
            correlation,
            artifacts,
            raw_rows,
        )
        .await?;
        info!(
            "Report for {} written to {}",
            source,
            summary.index.display()
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::artifact::ArtifactKind;
    use crate::report::SUMMARY_FILE_NAME;
    use crate::test_fixtures::{write_fixture, DAY_CSV};

    #[tokio::test]
    async fn test_load_twice_returns_equal_dataset() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = write_fixture(dir.path(), DAY_CSV)?;
        let source = DataSource::Local(path);

        let client = BikeShare::new()?;
        let first = client.load(&source).await?;
        let second = client.load(&source).await?;

        assert_eq!(first, second);
        assert_eq!(client.cache().load_count(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_shared_cache_between_clients() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let source = DataSource::Local(write_fixture(dir.path(), DAY_CSV)?);
        let cache = Arc::new(DatasetCache::new());

        let first = BikeShare::with_options().cache(cache.clone()).call()?;
        let second = BikeShare::with_options()
            .cache(cache.clone())
            .no_timeout(true)
            .call()?;
        first.load(&source).await?;
        second.load(&source).await?;

        assert_eq!(cache.load_count(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_full_report() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let source = DataSource::Local(write_fixture(dir.path(), DAY_CSV)?);
        let output_dir = dir.path().join("report");

        let client = BikeShare::new()?;
        let summary = client
            .report()
            .output_dir(output_dir.clone())
            .source(source.clone())
            .call()
            .await?;

        assert!(summary.index.exists());
        assert!(output_dir.join(SUMMARY_FILE_NAME).exists());
        assert_eq!(summary.cleaning.duplicate_rows, 1);
        assert_eq!(summary.summaries.monthly.len(), 5);
        assert_eq!(summary.artifacts.len(), ArtifactKind::ALL.len());

        // The cached dataset still carries text dates and numeric codes.
        let cached = client.load(&source).await?;
        assert!(!cached.has_parsed_dates());
        assert_eq!(client.cache().load_count(), 1);

        let html = std::fs::read_to_string(&summary.index)?;
        for kind in ArtifactKind::ALL {
            assert!(html.contains(kind.file_name()), "{} not embedded", kind);
        }
        Ok(())
    }
}
