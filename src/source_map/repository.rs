//! Source map repository.
//!
//! Holds decoded source maps keyed by map filename (e.g. `app.min.js.map`).
//! Populated either eagerly by scanning directories at startup or lazily on
//! first request, behind the same `get` call.

use super::map::SourceMap;
use crate::utils::config::{MAX_CACHED_MISSES, SOURCE_MAP_EXTENSION};
use crate::utils::error::{RepositoryError, SourceMapError};
use log::{debug, info, warn};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// How the repository finds maps that are not yet cached
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStrategy {
    /// Only maps loaded up front (via `load_all` or `insert`) are served
    Eager,
    /// Misses are read from `base_path/<key>` once; the map or the failure
    /// is cached
    LazyCached { base_path: PathBuf },
}

/// Cache of decoded source maps shared by all resolution calls
///
/// Reads never block each other. In lazy mode a per-key guard makes sure a
/// given map file is read and decoded by one caller at a time; the others
/// wait and then see the stored map. Keys that failed to load are remembered
/// and never retried.
#[derive(Debug)]
pub struct SourceMapRepository {
    strategy: LoadStrategy,
    maps: RwLock<HashMap<String, Arc<SourceMap>>>,
    misses: RwLock<HashSet<String>>,
    load_guards: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SourceMapRepository {
    pub fn new(strategy: LoadStrategy) -> Self {
        Self {
            strategy,
            maps: RwLock::new(HashMap::new()),
            misses: RwLock::new(HashSet::new()),
            load_guards: Mutex::new(HashMap::new()),
        }
    }

    /// Repository that serves only eagerly loaded maps
    pub fn eager() -> Self {
        Self::new(LoadStrategy::Eager)
    }

    /// Repository that reads maps from `base_path` on first use
    pub fn lazy(base_path: impl Into<PathBuf>) -> Self {
        Self::new(LoadStrategy::LazyCached {
            base_path: base_path.into(),
        })
    }

    pub fn strategy(&self) -> &LoadStrategy {
        &self.strategy
    }

    /// Scan directories (non-recursive) for `*.map` files and cache them
    ///
    /// Directories are processed in the given order and files within a
    /// directory in filename order. When the same filename appears in several
    /// directories the last one loaded wins.
    ///
    /// # Errors
    /// * `RepositoryError::DirectoryRead` - a directory could not be listed.
    ///   Files that fail to read or decode are logged and skipped.
    pub fn load_all<P: AsRef<Path>>(&self, directories: &[P]) -> Result<(), RepositoryError> {
        for directory in directories {
            self.load_directory(directory.as_ref())?;
        }
        Ok(())
    }

    /// Scan a single directory; returns the number of maps loaded from it
    fn load_directory(&self, directory: &Path) -> Result<usize, RepositoryError> {
        debug!("Scanning source map directory: {}", directory.display());

        let entries = fs::read_dir(directory).map_err(|source| RepositoryError::DirectoryRead {
            path: directory.to_path_buf(),
            source,
        })?;

        let mut files: Vec<(String, PathBuf)> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| RepositoryError::DirectoryRead {
                path: directory.to_path_buf(),
                source,
            })?;

            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                warn!("Skipping non UTF-8 file name in {}", directory.display());
                continue;
            };
            if !name.ends_with(SOURCE_MAP_EXTENSION) {
                continue;
            }

            let path = entry.path();
            if path.is_dir() {
                continue;
            }
            files.push((name, path));
        }
        files.sort();

        let mut loaded = 0;
        for (name, path) in files {
            match SourceMap::from_path(&path) {
                Ok(map) => {
                    self.insert(name, map);
                    loaded += 1;
                }
                Err(e) => {
                    warn!("Skipping source map {}: {}", path.display(), e);
                }
            }
        }

        info!("Loaded {} source maps from {}", loaded, directory.display());
        Ok(loaded)
    }

    /// Store a decoded map under `key`, replacing any previous entry
    pub fn insert(&self, key: impl Into<String>, map: SourceMap) -> Arc<SourceMap> {
        let key = key.into();
        let map = Arc::new(map);
        self.misses
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&key);
        let mut maps = self.maps.write().unwrap_or_else(PoisonError::into_inner);
        if maps.insert(key.clone(), Arc::clone(&map)).is_some() {
            warn!("Source map {} loaded more than once, keeping the latest", key);
        }
        map
    }

    /// Get the map cached under `key`
    ///
    /// In lazy mode a miss reads `base_path/<key>` once and caches the result.
    pub fn get(&self, key: &str) -> Option<Arc<SourceMap>> {
        match &self.strategy {
            LoadStrategy::Eager => self.cached(key),
            LoadStrategy::LazyCached { base_path } => {
                self.get_or_load(&base_path.join(key), key)
            }
        }
    }

    /// Get the map cached under `key`, reading it from `path` on first use
    ///
    /// A failed read or decode is logged and recorded as a miss; later calls
    /// for the same key return `None` without touching the disk.
    pub fn get_or_load(&self, path: &Path, key: &str) -> Option<Arc<SourceMap>> {
        if let Some(map) = self.cached(key) {
            return Some(map);
        }
        if self.is_missing(key) {
            return None;
        }

        match self.load_once(path, key) {
            Ok(map) => Some(map),
            Err(e) => {
                debug!("Source map {} unavailable: {}", key, e);
                None
            }
        }
    }

    fn load_once(&self, path: &Path, key: &str) -> Result<Arc<SourceMap>, SourceMapError> {
        if !is_plain_file_name(key) {
            return Err(SourceMapError::InvalidKey(key.to_string()));
        }

        let guard = {
            let mut guards = self.load_guards.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(guards.entry(key.to_string()).or_default())
        };
        let _loading = guard.lock().unwrap_or_else(PoisonError::into_inner);

        let result = self.load_uncached(path, key);

        // Waiters keep their own handle; later callers hit either cache
        self.load_guards
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);

        result
    }

    fn load_uncached(&self, path: &Path, key: &str) -> Result<Arc<SourceMap>, SourceMapError> {
        // Another caller may have finished loading while we waited
        if let Some(map) = self.cached(key) {
            return Ok(map);
        }
        if self.is_missing(key) {
            return Err(SourceMapError::Missing(key.to_string()));
        }

        debug!("Loading source map on demand: {}", path.display());
        let map = match SourceMap::from_path(path) {
            Ok(map) => Arc::new(map),
            Err(e) => {
                self.record_miss(key);
                return Err(e);
            }
        };

        let mut maps = self.maps.write().unwrap_or_else(PoisonError::into_inner);
        let stored = maps.entry(key.to_string()).or_insert(map);
        Ok(Arc::clone(stored))
    }

    fn record_miss(&self, key: &str) {
        let mut misses = self.misses.write().unwrap_or_else(PoisonError::into_inner);
        if misses.len() >= MAX_CACHED_MISSES {
            debug!("Miss cache full, not recording {}", key);
            return;
        }
        misses.insert(key.to_string());
    }

    /// True if a lazy load of `key` already failed
    pub fn is_missing(&self, key: &str) -> bool {
        self.misses
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
    }

    pub fn missing_count(&self) -> usize {
        self.misses.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn cached(&self, key: &str) -> Option<Arc<SourceMap>> {
        let maps = self.maps.read().unwrap_or_else(PoisonError::into_inner);
        maps.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.cached(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.maps.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SourceMapRepository {
    fn default() -> Self {
        Self::eager()
    }
}

/// True if `key` names a single file (no directory components)
fn is_plain_file_name(key: &str) -> bool {
    !key.is_empty()
        && key != "."
        && key != ".."
        && Path::new(key).file_name().and_then(|n| n.to_str()) == Some(key)
}
