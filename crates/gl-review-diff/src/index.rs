//! Lookup of file diffs within a diff version, with cached correspondences.
//!
//! Correspondences are built lazily on first use and cached keyed by
//! `(version identity, path)`. A cached entry is never patched: when a newer
//! [`DiffVersion`] replaces the current one, entries of other versions are
//! dropped and rebuilt on demand. Entries are handed out as `Arc`s, so a
//! caller still holding a correspondence of the previous version keeps a
//! consistent view of it.

use crate::correspondence::{DiffError, FileLineCorrespondence};
use crate::model::{DiffRefs, DiffSide, DiffVersion, FileDiff, ReviewId};
use log::debug;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    refs: DiffRefs,
    path: String,
}

type CorrespondenceCache = HashMap<CacheKey, Arc<FileLineCorrespondence>>;

/// The current diff version of one merge request.
#[derive(Debug)]
pub struct DiffVersionIndex {
    review: ReviewId,
    version: Arc<DiffVersion>,
    cache: Mutex<CorrespondenceCache>,
}

impl DiffVersionIndex {
    /// Create an index over `version`, the current diff of `review`.
    pub fn new(review: ReviewId, version: impl Into<Arc<DiffVersion>>) -> Self {
        Self {
            review,
            version: version.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// The merge request this index belongs to.
    pub fn review(&self) -> ReviewId {
        self.review
    }

    /// The current diff version.
    pub fn version(&self) -> &Arc<DiffVersion> {
        &self.version
    }

    pub fn refs(&self) -> &DiffRefs {
        &self.version.refs
    }

    /// Find the file of the current version shown as `path` on `side`.
    pub fn find_file(&self, path: &str, side: DiffSide) -> Option<&FileDiff> {
        self.version.find_file(path, side)
    }

    /// Replace the current version wholesale.
    ///
    /// Cached correspondences of any other version are discarded.
    pub fn replace_version(&mut self, version: impl Into<Arc<DiffVersion>>) {
        self.version = version.into();
        let refs = self.version.refs.clone();
        let cache = self.cache.get_mut().unwrap_or_else(PoisonError::into_inner);
        let before = cache.len();
        cache.retain(|key, _| key.refs == refs);
        debug!(
            "Replaced diff version with head {}: dropped {} cached correspondences",
            refs.head_sha,
            before - cache.len()
        );
    }

    /// Correspondence of a file of the current version.
    pub fn correspondence_for(
        &self,
        file: &FileDiff,
    ) -> Result<Arc<FileLineCorrespondence>, DiffError> {
        let key = CacheKey {
            refs: self.version.refs.clone(),
            path: file.new_path.clone(),
        };

        if let Some(cached) = self.lock_cache().get(&key) {
            debug!("Correspondence cache HIT for {}", key.path);
            return Ok(Arc::clone(cached));
        }

        debug!("Correspondence cache MISS for {}", key.path);
        let built = Arc::new(FileLineCorrespondence::from_raw_diff(&file.raw_diff_text)?);
        self.lock_cache().insert(key, Arc::clone(&built));
        Ok(built)
    }

    /// Number of cached correspondences.
    pub fn cached_len(&self) -> usize {
        self.lock_cache().len()
    }

    fn lock_cache(&self) -> MutexGuard<'_, CorrespondenceCache> {
        // The cache holds only fully built entries, so a poisoned lock is
        // still consistent.
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
