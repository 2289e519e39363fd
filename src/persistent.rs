//! A [`RedBlackTree`] mirrored to a directory, one JSON file per entry.
//!
//! Files are named `{key}-{tag}.json`, where `{key}` is the key's `Display`
//! rendering and `{tag}` identifies the value type, so maps of different value
//! types may share a directory. Each file holds `{"key": ..., "value": ...}`.
//!
//! ```text
//! {dir}/
//!   apple-alloc__string__String.json
//!   pear-alloc__string__String.json
//! ```

use core::any::type_name;
use core::fmt::Display;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use alloc::format;
use alloc::string::{String, ToString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::RedBlackError;
use crate::red_black_tree::RedBlackTree;

/// Errors from [`PersistentRedBlackTree`].
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error(transparent)]
    Tree(#[from] RedBlackError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed entry file {path}: {source}")]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T, E = PersistenceError> = core::result::Result<T, E>;

#[derive(Serialize, Deserialize)]
struct Record<K, V> {
    key: K,
    value: V,
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> PersistenceError + '_ {
    move |source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn entry_path(dir: &Path, suffix: &str, key: &impl Display) -> Result<PathBuf> {
    let name = key.to_string();
    if name.is_empty() {
        return Err(RedBlackError::InvalidArgument("key renders to an empty string").into());
    }
    if name.contains(['/', '\\']) {
        return Err(RedBlackError::InvalidArgument("key rendering contains a path separator").into());
    }
    Ok(dir.join(format!("{name}{suffix}")))
}

/// Writes `bytes` to a temporary file next to `path`, then renames it into place,
/// so a crash never leaves a truncated entry. On failure the temporary file is
/// removed and `path` is left as it was.
fn write_entry(path: &Path, bytes: &[u8]) -> Result<()> {
    let temp_path = path.with_extension("tmp");
    let written = fs::write(&temp_path, bytes)
        .map_err(io_error(&temp_path))
        .and_then(|()| fs::rename(&temp_path, path).map_err(io_error(path)));

    if written.is_err()
        && let Err(error) = fs::remove_file(&temp_path)
        && error.kind() != io::ErrorKind::NotFound
    {
        warn!(path = %temp_path.display(), %error, "could not remove temporary entry file");
    }
    written
}

/// File name suffix identifying entries whose values are of type `V`.
fn value_tag<V>() -> String {
    type_name::<V>()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// A [`RedBlackTree`] that writes every insertion to disk and deletes the file
/// of every removed entry.
///
/// Reads go through [`tree`](Self::tree). Mutations are only available through
/// this wrapper so the directory and the map cannot drift apart.
///
/// # Examples
///
/// ```
/// use redblack_tree::PersistentRedBlackTree;
///
/// let dir = tempfile::tempdir().unwrap();
///
/// let mut fruit = PersistentRedBlackTree::open(dir.path()).unwrap();
/// fruit.insert("apple".to_string(), 3_u32).unwrap();
/// fruit.insert("pear".to_string(), 5_u32).unwrap();
/// drop(fruit);
///
/// let fruit: PersistentRedBlackTree<String, u32> = PersistentRedBlackTree::open(dir.path()).unwrap();
/// assert_eq!(fruit.tree().get("pear"), Ok(&5));
/// ```
pub struct PersistentRedBlackTree<K, V> {
    tree: RedBlackTree<K, V>,
    dir: PathBuf,
    suffix: String,
}

impl<K, V> PersistentRedBlackTree<K, V>
where
    K: Ord + Display + Serialize + DeserializeOwned,
    V: Serialize + DeserializeOwned,
{
    /// Opens the map stored in `dir`, creating the directory if it is missing.
    ///
    /// Every `*-{tag}.json` file in `dir` is loaded. Files for other value types
    /// and unrelated files are ignored.
    ///
    /// # Errors
    ///
    /// Fails if the directory cannot be created or read, if an entry file cannot
    /// be parsed, with [`RedBlackError::InvalidArgument`] if a file's name is not
    /// the one its key renders to, or with [`RedBlackError::DuplicateKey`] if two
    /// files hold the same key.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(io_error(&dir))?;

        let suffix = format!("-{}.json", value_tag::<V>());
        let mut tree = RedBlackTree::new();

        for entry in fs::read_dir(&dir).map_err(io_error(&dir))? {
            let path = entry.map_err(io_error(&dir))?.path();
            let is_entry = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with(&suffix));
            if !is_entry || !path.is_file() {
                continue;
            }

            let bytes = fs::read(&path).map_err(io_error(&path))?;
            let record: Record<K, V> =
                serde_json::from_slice(&bytes).map_err(|source| PersistenceError::Serialization {
                    path: path.clone(),
                    source,
                })?;
            if entry_path(&dir, &suffix, &record.key)? != path {
                return Err(RedBlackError::InvalidArgument("entry file name does not match its key").into());
            }
            tree.insert(record.key, record.value)?;
        }

        info!(dir = %dir.display(), entries = tree.len(), "opened persistent tree");
        Ok(Self { tree, dir, suffix })
    }

    /// Inserts an entry and writes its file.
    ///
    /// # Errors
    ///
    /// - [`RedBlackError::InvalidArgument`] if the key renders to an empty string or
    ///   contains a path separator.
    /// - [`RedBlackError::DuplicateKey`] if the key is already present.
    /// - [`PersistenceError::Io`] if the file cannot be written. The map is unchanged.
    pub fn insert(&mut self, key: K, value: V) -> Result<()> {
        let path = self.entry_path(&key)?;
        if self.tree.contains_key(&key) {
            return Err(RedBlackError::DuplicateKey.into());
        }

        let record = Record {
            key: &key,
            value: &value,
        };
        let bytes = serde_json::to_vec_pretty(&record).map_err(|source| PersistenceError::Serialization {
            path: path.clone(),
            source,
        })?;

        write_entry(&path, &bytes)?;
        debug!(path = %path.display(), size = bytes.len(), "wrote entry file");

        self.tree.insert(key, value)?;
        Ok(())
    }

    /// Removes the entry for `key` and deletes its file, returning the entry.
    ///
    /// A file that has already vanished is logged and otherwise ignored.
    ///
    /// # Errors
    ///
    /// [`RedBlackError::KeyNotFound`] if the key is absent, or
    /// [`PersistenceError::Io`] if the file exists but cannot be deleted. In the
    /// latter case the entry has already left the map.
    pub fn delete(&mut self, key: &K) -> Result<(K, V)> {
        let path = self.entry_path(key)?;
        let entry = self.tree.delete(key)?;

        match fs::remove_file(&path) {
            Ok(()) => debug!(path = %path.display(), "deleted entry file"),
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "entry file already missing");
            }
            Err(source) => return Err(PersistenceError::Io { path, source }),
        }
        Ok(entry)
    }

    /// Removes the entry for `key`, returning whether there was one.
    ///
    /// # Errors
    ///
    /// Only I/O failures are reported; an absent key yields `Ok(false)`.
    pub fn remove(&mut self, key: &K) -> Result<bool> {
        match self.delete(key) {
            Ok(_) => Ok(true),
            Err(PersistenceError::Tree(RedBlackError::KeyNotFound | RedBlackError::InvalidArgument(_))) => {
                Ok(false)
            }
            Err(error) => Err(error),
        }
    }

    fn entry_path(&self, key: &K) -> Result<PathBuf> {
        entry_path(&self.dir, &self.suffix, key)
    }
}

impl<K, V> PersistentRedBlackTree<K, V> {
    /// Read access to the in-memory map.
    #[must_use]
    pub fn tree(&self) -> &RedBlackTree<K, V> {
        &self.tree
    }

    /// The directory the entries are stored in.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl<K: core::fmt::Debug, V: core::fmt::Debug> core::fmt::Debug for PersistentRedBlackTree<K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PersistentRedBlackTree")
            .field("dir", &self.dir)
            .field("tree", &self.tree)
            .finish_non_exhaustive()
    }
}
