use std::fmt;
use std::path::PathBuf;

/// Location of the public bike-sharing `day.csv` file.
pub const DEFAULT_DATASET_URL: &str =
    "https://raw.githubusercontent.com/WidyaKhoirunnisa/Bike-Sharing-Dataset/main/day.csv";

/// Where the dataset CSV is read from.
///
/// # Examples
///
/// ```
/// use bikeshare::{DataSource, DEFAULT_DATASET_URL};
///
/// assert_eq!(DataSource::default(), DataSource::Remote(DEFAULT_DATASET_URL.to_string()));
/// assert_eq!(DataSource::from("data/day.csv").to_string(), "data/day.csv");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataSource {
    /// An `http(s)` URL, downloaded with the loader's HTTP client.
    Remote(String),
    /// A CSV file on the local filesystem.
    Local(PathBuf),
}

impl DataSource {
    /// Key under which the loaded dataset is memoized.
    pub fn cache_key(&self) -> String {
        match self {
            DataSource::Remote(url) => url.clone(),
            DataSource::Local(path) => format!("file://{}", path.display()),
        }
    }
}

impl Default for DataSource {
    fn default() -> Self {
        DataSource::Remote(DEFAULT_DATASET_URL.to_string())
    }
}

/// Strings starting with `http://` or `https://` are remote, anything else is a path.
impl From<&str> for DataSource {
    fn from(value: &str) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            DataSource::Remote(value.to_string())
        } else {
            DataSource::Local(PathBuf::from(value))
        }
    }
}

impl From<PathBuf> for DataSource {
    fn from(value: PathBuf) -> Self {
        DataSource::Local(value)
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Remote(url) => write!(f, "{}", url),
            DataSource::Local(path) => write!(f, "{}", path.display()),
        }
    }
}
