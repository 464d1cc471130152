use crate::dataset::error::LoadError;
use crate::dataset::source::DataSource;
use crate::error::BikeShareError;
use crate::types::dataset::Dataset;
use futures_util::TryStreamExt;
use log::{debug, info, warn};
use polars::prelude::*;
use reqwest::Client;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::io::AsyncReadExt;
use tokio::{fs, task};
use tokio_util::io::StreamReader;

/// Request timeout used when none is configured.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches the dataset CSV and turns it into a validated [`Dataset`].
///
/// The loader itself does not memoize; see [`crate::DatasetCache`].
pub struct DatasetLoader {
    download_client: Client,
}

impl DatasetLoader {
    /// Creates a loader whose HTTP requests give up after `timeout`.
    /// `None` disables the timeout.
    pub fn new(timeout: Option<Duration>) -> Result<DatasetLoader, LoadError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let download_client = builder.build().map_err(LoadError::ClientBuild)?;
        Ok(DatasetLoader { download_client })
    }

    /// Reads `source`, parses it as CSV with a header row and validates the schema.
    pub async fn load(&self, source: &DataSource) -> Result<Dataset, BikeShareError> {
        let raw_bytes = match source {
            DataSource::Remote(url) => self.download(url).await?,
            DataSource::Local(path) => Self::read_file(path).await?,
        };

        let frame = Self::csv_to_dataframe(raw_bytes, source.to_string()).await?;
        let dataset = Dataset::try_from_frame(frame)?;
        info!(
            "Loaded {} rows ({} columns) from {}",
            dataset.height(),
            dataset.frame().width(),
            source
        );
        Ok(dataset)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, LoadError> {
        info!("Downloading data from {}", url);

        let response = self
            .download_client
            .get(url)
            .send()
            .await
            .map_err(|e| LoadError::NetworkRequest(url.to_string(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    LoadError::HttpStatus {
                        url: url.to_string(),
                        status,
                        source: e,
                    }
                } else {
                    LoadError::NetworkRequest(url.to_string(), e)
                });
            }
        };

        let stream = response
            .bytes_stream()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e));
        let mut stream_reader = StreamReader::new(stream);
        let mut body = Vec::new();
        stream_reader.read_to_end(&mut body).await?;
        info!("Downloaded {} bytes from {}", body.len(), url);
        Ok(body)
    }

    async fn read_file(path: &Path) -> Result<Vec<u8>, LoadError> {
        debug!("Reading dataset from {}", path.display());
        fs::read(path)
            .await
            .map_err(|e| LoadError::FileRead(path.to_path_buf(), e))
    }

    /// Parses raw CSV bytes into a DataFrame on a blocking task.
    async fn csv_to_dataframe(bytes: Vec<u8>, origin: String) -> Result<DataFrame, LoadError> {
        task::spawn_blocking(move || parse_csv(&bytes, &origin)).await?
    }
}

/// Parses CSV bytes with a header row. The polars reader wants a file, so the
/// bytes go through a temporary one.
pub(crate) fn parse_csv(bytes: &[u8], origin: &str) -> Result<DataFrame, LoadError> {
    let io_error = |source| LoadError::CsvReadIo {
        origin: origin.to_string(),
        source,
    };
    let polars_error = |source| LoadError::CsvReadPolars {
        origin: origin.to_string(),
        source,
    };

    let mut temp_file = NamedTempFile::new().map_err(io_error)?;
    temp_file.write_all(bytes).map_err(io_error)?;
    temp_file.flush().map_err(io_error)?;

    CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(temp_file.path().to_path_buf()))
        .map_err(polars_error)?
        .finish()
        .map_err(polars_error)
}
