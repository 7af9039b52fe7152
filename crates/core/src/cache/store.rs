//! File-backed content-addressed store.
//!
//! Entries live at `<root>/<subdir>/<digest[0..4]>/<digest>.<ext>`. The file
//! itself is the only record of a cached entry; there is no index to keep in
//! sync, and entries are never rewritten once present.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{Builder, NamedTempFile};

use super::hash::{self, SHARD_PREFIX_LEN};
use crate::Error;

/// Subdirectory holding cached search listing pages.
pub const LISTING_DIR: &str = "html_list";

/// Subdirectory holding cached document detail pages.
pub const DETAIL_DIR: &str = "html";

/// Extension used for every cached page.
pub const HTML_EXT: &str = "html";

/// Name prefix of in-flight temporary files; leftovers after a hard kill can be deleted.
pub const PARTIAL_PREFIX: &str = ".partial-";

/// Content-addressed cache rooted at a directory.
#[derive(Debug, Clone)]
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    /// Create a store rooted at `root`. Nothing is created on disk until the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Digest of an arbitrary byte key.
    pub fn key_for(&self, bytes: &[u8]) -> String {
        hash::key_for(bytes)
    }

    /// Location of the entry for `digest` under `subdir`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidHash` if the digest is too short to shard or
    /// contains anything other than hex digits.
    pub fn path_for(&self, digest: &str, subdir: &str, extension: &str) -> Result<PathBuf, Error> {
        if !hash::is_valid_digest(digest) {
            return Err(Error::InvalidHash);
        }

        Ok(self
            .root
            .join(subdir)
            .join(&digest[..SHARD_PREFIX_LEN])
            .join(format!("{digest}.{extension}")))
    }

    pub fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    /// Read a cached entry.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if nothing is cached at `path`.
    pub fn read(&self, path: &Path) -> Result<Vec<u8>, Error> {
        fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::NotFound(path.to_path_buf()),
            _ => Error::io(path, e),
        })
    }

    /// Write `content` to `path` so readers only ever see the old file or the complete new one.
    pub fn write_atomic(&self, path: &Path, content: &[u8]) -> Result<(), Error> {
        self.stage(path, content)?.commit()
    }

    /// First half of an atomic write: content is durable in a temporary file
    /// next to `path`, but `path` itself is untouched until [`StagedWrite::commit`].
    ///
    /// Dropping the returned value without committing removes the temporary file.
    pub fn stage(&self, path: &Path, content: &[u8]) -> Result<StagedWrite, Error> {
        let dir = path.parent().ok_or_else(|| {
            Error::io(path, std::io::Error::new(std::io::ErrorKind::InvalidInput, "cache path has no parent"))
        })?;

        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
        }

        let mut temp = Builder::new().prefix(PARTIAL_PREFIX).tempfile_in(dir).map_err(|e| Error::io(dir, e))?;
        temp.write_all(content).map_err(|e| Error::io(temp.path(), e))?;
        temp.as_file().sync_all().map_err(|e| Error::io(temp.path(), e))?;

        Ok(StagedWrite { temp, dest: path.to_path_buf() })
    }
}

/// A fully written and synced temporary file waiting to replace its destination.
#[derive(Debug)]
pub struct StagedWrite {
    temp: NamedTempFile,
    dest: PathBuf,
}

impl StagedWrite {
    pub fn temp_path(&self) -> &Path {
        self.temp.path()
    }

    /// Rename the temporary file over the destination.
    pub fn commit(self) -> Result<(), Error> {
        let dest = self.dest;
        self.temp.persist(&dest).map_err(|e| Error::io(&dest, e.error))?;
        tracing::trace!(path = %dest.display(), "cache entry written");
        Ok(())
    }
}
