use crate::dataset::data_loader::DatasetLoader;
use crate::dataset::source::DataSource;
use crate::error::BikeShareError;
use crate::types::dataset::Dataset;
use log::debug;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// Single-entry memo of the last loaded dataset, keyed by [`DataSource::cache_key`].
///
/// Asking for the cached source returns a clone of the stored dataset without
/// touching the source again. Asking for a different source loads it and
/// replaces the entry.
#[derive(Default)]
pub struct DatasetCache {
    entry: Mutex<Option<(String, Dataset)>>,
    loads: AtomicUsize,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the dataset for `source`, loading it with `loader` on a miss.
    pub async fn get_or_load(
        &self,
        source: &DataSource,
        loader: &DatasetLoader,
    ) -> Result<Dataset, BikeShareError> {
        let key = source.cache_key();

        {
            let cache = self.entry.lock().await;
            if let Some((cached_key, dataset)) = cache.as_ref() {
                if *cached_key == key {
                    debug!("Dataset cache hit for {}", key);
                    return Ok(dataset.clone());
                }
            }
        } // Lock released while loading

        debug!("Dataset cache miss for {}", key);
        let loaded = loader.load(source).await?;
        self.loads.fetch_add(1, Ordering::Relaxed);

        let mut cache = self.entry.lock().await;
        match cache.as_ref() {
            // Loaded concurrently by another caller, keep the stored one.
            Some((cached_key, dataset)) if *cached_key == key => Ok(dataset.clone()),
            _ => {
                *cache = Some((key, loaded.clone()));
                Ok(loaded)
            }
        }
    }

    /// Number of times this cache had to go to a source.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }

    /// Key of the currently memoized dataset, if any.
    pub async fn cached_key(&self) -> Option<String> {
        self.entry.lock().await.as_ref().map(|(key, _)| key.clone())
    }

    pub async fn clear(&self) {
        self.entry.lock().await.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{write_fixture, DAY_CSV};

    #[tokio::test]
    async fn test_second_load_is_served_from_cache() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = write_fixture(dir.path(), DAY_CSV)?;
        let source = DataSource::Local(path.clone());

        let loader = DatasetLoader::new(None)?;
        let cache = DatasetCache::new();

        let first = cache.get_or_load(&source, &loader).await?;
        // The source is gone, so a second fetch would fail.
        std::fs::remove_file(&path)?;
        let second = cache.get_or_load(&source, &loader).await?;

        assert_eq!(first, second);
        assert_eq!(cache.load_count(), 1);
        assert_eq!(cache.cached_key().await, Some(source.cache_key()));
        Ok(())
    }

    #[tokio::test]
    async fn test_other_source_replaces_entry() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let first_path = write_fixture(dir.path(), DAY_CSV)?;
        let second_path = dir.path().join("copy.csv");
        std::fs::copy(&first_path, &second_path)?;

        let loader = DatasetLoader::new(None)?;
        let cache = DatasetCache::new();

        cache
            .get_or_load(&DataSource::Local(first_path), &loader)
            .await?;
        let second_source = DataSource::Local(second_path);
        cache.get_or_load(&second_source, &loader).await?;

        assert_eq!(cache.load_count(), 2);
        assert_eq!(cache.cached_key().await, Some(second_source.cache_key()));

        cache.clear().await;
        assert_eq!(cache.cached_key().await, None);
        Ok(())
    }
}
