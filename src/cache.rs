//! Durable storage for compiled units.
//!
//! A cache is a directory of files, one per `(engine, template)` pair, each
//! holding the serialized form of a compiled program. Loading a key
//! reconstitutes an executable [`Template`] from the file. The cache never
//! populates itself: a missing key is reported to the caller, which is
//! expected to compile and [`store`][Cache::store] first.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::types::program;
use crate::{Error, Result, Template};

/// Identifies a compiled unit by the engine that produced it and the template
/// it was compiled from.
///
/// The key space is `(engine id, template id) -> content`. There is no
/// eviction, but nothing here precludes layering one over the key space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    engine: String,
    template: String,
}

impl CacheKey {
    /// Construct a new cache key.
    ///
    /// # Panics
    ///
    /// If either identifier is empty or contains a path separator.
    pub fn new(engine: impl Into<String>, template: impl Into<String>) -> Self {
        let engine = engine.into();
        let template = template.into();
        for id in [&engine, &template] {
            assert!(
                !id.is_empty() && !id.contains(['/', '\\']),
                "invalid cache key identifier `{id}`"
            );
        }
        Self { engine, template }
    }

    pub fn engine(&self) -> &str {
        &self.engine
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    fn file_name(&self) -> String {
        format!("{}.{}.unit.json", self.engine, self.template)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.engine, self.template)
    }
}

/// A directory of serialized compiled units.
#[derive(Debug)]
pub struct Cache {
    dir: PathBuf,
}

impl Cache {
    /// Open a cache rooted at the given directory, creating it if necessary.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|err| {
            Error::io(
                err,
                format_args!("failed to create cache directory `{}`", dir.display()),
            )
        })?;
        Ok(Self { dir })
    }

    /// The directory backing this cache.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Store a compiled unit under the given key.
    ///
    /// Returns whether anything was written: storing content identical to the
    /// existing entry is a no-op. The write goes through a temporary file and
    /// a rename, so concurrent stores to the same key leave a complete entry
    /// from one of the writers rather than an interleaving.
    pub fn store(&self, key: &CacheKey, unit: &Template<'_>) -> Result<bool> {
        let content = serde_json::to_string(&unit.program)?;
        let path = self.path(key);

        if let Ok(existing) = fs::read_to_string(&path) {
            if existing == content {
                debug!(%key, "cache entry up to date");
                return Ok(false);
            }
        }

        let tmp = self
            .dir
            .join(format!("{}.{}.tmp", std::process::id(), key.file_name()));
        fs::write(&tmp, &content).map_err(|err| {
            Error::io(
                err,
                format_args!("failed to write cache file `{}`", tmp.display()),
            )
        })?;
        fs::rename(&tmp, &path).map_err(|err| {
            Error::io(
                err,
                format_args!("failed to store cache file `{}`", path.display()),
            )
        })?;

        debug!(%key, bytes = content.len(), "stored compiled unit");
        Ok(true)
    }

    /// Load the compiled unit stored under the given key.
    ///
    /// Fails with a [cache miss][crate::ErrorKind::CacheMiss] if there is
    /// no entry for the key.
    pub fn load(&self, key: &CacheKey) -> Result<Template<'static>> {
        let path = self.path(key);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(Error::cache_miss(key));
            }
            Err(err) => {
                return Err(Error::io(
                    err,
                    format_args!("failed to read cache file `{}`", path.display()),
                ));
            }
        };
        let program: program::Template<'static> = serde_json::from_str(&content)?;
        debug!(%key, "loaded compiled unit");
        Ok(Template { program })
    }

    fn path(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(key.file_name())
    }
}
