//! File storage below a configured root directory.
//!
//! File names come straight from request paths, so every name is checked before it
//! touches the file system: it must be relative, must not contain `..`, and the
//! resolved file (following symlinks) has to stay inside the root.

use std::io;
use std::path::{Component, Path, PathBuf};

use bytes::Bytes;
use thiserror::Error;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("no storage directory configured")]
    NoRoot,

    #[error("invalid file name: {name:?}")]
    InvalidName { name: String },

    #[error("{} resolves outside of the storage directory", .path.display())]
    OutsideRoot { path: PathBuf },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl StorageError {
    pub fn invalid_name<S: ToString>(name: S) -> Self {
        Self::InvalidName { name: name.to_string() }
    }

    /// True for errors caused by the requested name rather than the file system
    pub fn is_rejected_name(&self) -> bool {
        matches!(self, StorageError::InvalidName { .. } | StorageError::OutsideRoot { .. })
    }
}

#[derive(Debug, Clone, Default)]
pub struct Storage {
    root: Option<PathBuf>,
}

impl Storage {
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }

    /// Joins `name` onto the root after a lexical check.
    ///
    /// # Errors
    ///
    /// - [`StorageError::NoRoot`] if no root is configured
    /// - [`StorageError::InvalidName`] for empty, absolute or `..` names
    pub fn resolve(&self, name: &str) -> Result<PathBuf, StorageError> {
        let root = self.root.as_deref().ok_or(StorageError::NoRoot)?;

        let relative = Path::new(name);
        let mut normal_components = 0;
        for component in relative.components() {
            match component {
                Component::Normal(_) => normal_components += 1,
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(StorageError::invalid_name(name));
                }
            }
        }

        if normal_components == 0 {
            return Err(StorageError::invalid_name(name));
        }

        Ok(root.join(relative))
    }

    /// Reads the whole file.
    ///
    /// # Errors
    ///
    /// Name errors from [`Storage::resolve`], [`StorageError::OutsideRoot`] when a
    /// symlink leads out of the root, and any I/O error.
    pub async fn read(&self, name: &str) -> Result<Bytes, StorageError> {
        let path = self.resolve(name)?;
        self.ensure_inside(&path).await?;

        let contents = tokio::fs::read(&path).await?;
        debug!(path = %path.display(), size = contents.len(), "read file");
        Ok(Bytes::from(contents))
    }

    /// Creates or truncates the file and writes `contents` to it.
    ///
    /// Parent directories must already exist. On unix the file is created with mode
    /// `0o666` (before umask).
    ///
    /// # Errors
    ///
    /// Same as [`Storage::read`].
    pub async fn write(&self, name: &str, contents: &[u8]) -> Result<(), StorageError> {
        let path = self.resolve(name)?;
        if let Some(parent) = path.parent() {
            self.ensure_inside(parent).await?;
        }
        if tokio::fs::symlink_metadata(&path).await.is_ok() {
            self.ensure_inside(&path).await?;
        }

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o666);

        let mut file = options.open(&path).await?;
        file.write_all(contents).await?;
        file.flush().await?;
        debug!(path = %path.display(), size = contents.len(), "wrote file");
        Ok(())
    }

    async fn ensure_inside(&self, path: &Path) -> Result<(), StorageError> {
        let root = self.root.as_deref().ok_or(StorageError::NoRoot)?;
        let canonical_root = tokio::fs::canonicalize(root).await?;
        let canonical_path = tokio::fs::canonicalize(path).await?;

        if canonical_path.starts_with(&canonical_root) {
            Ok(())
        } else {
            warn!(path = %path.display(), resolved = %canonical_path.display(), "file escapes the storage directory");
            Err(StorageError::OutsideRoot { path: path.to_path_buf() })
        }
    }
}
