//! Content loader - assembles sorted collections from a content directory

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::discovery::discover_files_async;
use super::error::ContentError;
use super::parser::parse_file;
use super::post::ContentRecord;
use crate::cache::{Fingerprint, RecordCache};

/// Outcome of assembling one collection
#[derive(Debug)]
pub struct LoadReport<R> {
    /// Valid records, newest first
    pub records: Vec<R>,
    /// Files that were skipped, in discovery order
    pub failures: Vec<ContentError>,
}

impl<R> LoadReport<R> {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Loads every record of one kind from a content directory
pub struct CollectionLoader<'a, R> {
    root: PathBuf,
    extensions: &'a [String],
    cache: Option<&'a RecordCache<R>>,
}

impl<'a, R: ContentRecord> CollectionLoader<'a, R> {
    /// Create a loader for the files under `root`
    pub fn new<P: Into<PathBuf>>(root: P, extensions: &'a [String]) -> Self {
        Self {
            root: root.into(),
            extensions,
            cache: None,
        }
    }

    /// Reuse records from `cache` while their files are unchanged
    pub fn with_cache(mut self, cache: &'a RecordCache<R>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Load the collection, collecting per-file failures instead of logging them
    ///
    /// A file that fails to parse or validate, or repeats an earlier slug, is
    /// left out and reported. Any other error aborts the whole build.
    pub async fn load_report(&self) -> Result<LoadReport<R>, ContentError> {
        let paths = discover_files_async(self.root.clone(), self.extensions.to_vec()).await?;

        let mut records: Vec<R> = Vec::with_capacity(paths.len());
        let mut failures = Vec::new();
        let mut claimed: HashMap<String, PathBuf> = HashMap::new();

        for path in &paths {
            match self.load_one(path).await {
                Ok(record) => {
                    if let Some(first) = claimed.get(record.slug()) {
                        tracing::debug!("Slug '{}' already used by {:?}", record.slug(), first);
                        failures.push(ContentError::DuplicateSlug {
                            path: record.file_path().to_path_buf(),
                            slug: record.slug().to_string(),
                        });
                        continue;
                    }
                    claimed.insert(record.slug().to_string(), path.clone());
                    records.push(record);
                }
                Err(e) if e.is_per_file() => failures.push(e),
                Err(e) => return Err(e),
            }
        }

        if let Some(cache) = self.cache {
            cache.retain_paths(&paths);
        }

        sort_newest_first(&mut records);

        Ok(LoadReport { records, failures })
    }

    /// Load the collection, skipping (and logging) files that fail
    pub async fn load(&self) -> Result<Vec<R>, ContentError> {
        let report = self.load_report().await?;

        for failure in &report.failures {
            tracing::warn!("Skipping {}: {}", R::KIND, failure);
        }
        tracing::debug!(
            "Loaded {} {} record(s) from {:?}",
            report.records.len(),
            R::KIND,
            self.root
        );

        Ok(report.records)
    }

    /// Load the collection and return the record with `slug`
    pub async fn find_by_slug(&self, slug: &str) -> Result<R, ContentError> {
        self.load()
            .await?
            .into_iter()
            .find(|record| record.slug() == slug)
            .ok_or_else(|| ContentError::NotFound {
                kind: R::KIND,
                slug: slug.to_string(),
            })
    }

    async fn load_one(&self, path: &Path) -> Result<R, ContentError> {
        let Some(cache) = self.cache else {
            return parse_file(path).await;
        };

        let fingerprint = Fingerprint::of(path)
            .await
            .map_err(|e| ContentError::filesystem(path, e))?;

        if let Some(record) = cache.get(path, fingerprint) {
            tracing::trace!("Cache hit for {:?}", path);
            return Ok(record);
        }

        match parse_file::<R>(path).await {
            Ok(record) => {
                cache.insert(path.to_path_buf(), fingerprint, record.clone());
                Ok(record)
            }
            Err(e) => {
                cache.remove(path);
                Err(e)
            }
        }
    }
}

/// Sort by publication date, newest first
///
/// The sort is stable: records sharing a date keep their discovery order.
pub fn sort_newest_first<R: ContentRecord>(records: &mut [R]) {
    records.sort_by(|a, b| b.date_published().cmp(&a.date_published()));
}
