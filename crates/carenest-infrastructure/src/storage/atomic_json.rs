//! Atomic JSON file operations.
//!
//! Every write goes to a uniquely named sibling temp file that is fsynced
//! and renamed over the target, so readers never observe a half-written
//! document. Writers hold an exclusive `fs2` lock on `<file>.lock`; the
//! `update*` methods hold it across the whole read-modify-write.
//!
//! All methods block. Async callers run them on `spawn_blocking`.

use carenest_core::{CareNestError, Result};
use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A handle to one JSON document on disk.
#[derive(Debug)]
pub struct AtomicJsonFile<T> {
    path: PathBuf,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> Clone for AtomicJsonFile<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<T> AtomicJsonFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and decodes the document.
    ///
    /// A missing or whitespace-only file yields `Ok(None)`.
    pub fn load(&self) -> Result<Option<T>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        let data: T = serde_json::from_str(&content)?;
        Ok(Some(data))
    }

    /// Writes `data` atomically, creating parent directories as needed.
    pub fn save(&self, data: &T) -> Result<()> {
        let _lock = FileLock::acquire(&self.path)?;
        self.write(data)
    }

    /// Locked read-modify-write.
    ///
    /// `f` sees the stored document, or `default_value` when there is none.
    /// The document is written back only if `f` succeeds; its return value
    /// is passed through.
    pub fn update<R, F>(&self, default_value: T, f: F) -> Result<R>
    where
        F: FnOnce(&mut T) -> Result<R>,
    {
        let _lock = FileLock::acquire(&self.path)?;

        let mut data = self.load()?.unwrap_or(default_value);
        let result = f(&mut data)?;
        self.write(&data)?;

        Ok(result)
    }

    /// Locked read-modify-write of an existing document.
    ///
    /// Returns `Ok(None)` without writing when there is no document.
    pub fn update_existing<R, F>(&self, f: F) -> Result<Option<R>>
    where
        F: FnOnce(&mut T) -> Result<R>,
    {
        let _lock = FileLock::acquire(&self.path)?;

        let Some(mut data) = self.load()? else {
            return Ok(None);
        };
        let result = f(&mut data)?;
        self.write(&data)?;

        Ok(Some(result))
    }

    /// Removes the document. A missing file is not an error.
    pub fn remove(&self) -> Result<()> {
        let _lock = FileLock::acquire(&self.path)?;
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Unlocked write. Callers hold the file lock.
    fn write(&self, data: &T) -> Result<()> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| CareNestError::io("Path has no parent directory"))?;
        fs::create_dir_all(parent)?;

        let json = serde_json::to_string_pretty(data)?;

        let mut tmp_file = NamedTempFile::new_in(parent)?;
        tmp_file.write_all(json.as_bytes())?;
        tmp_file.as_file().sync_all()?;
        tmp_file.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

/// Exclusive lock on `<file>.lock`, released on drop.
///
/// The lock file is left in place so every writer locks the same inode.
struct FileLock {
    _file: File,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.with_extension("lock");
        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        use fs2::FileExt;
        file.lock_exclusive()
            .map_err(|e| CareNestError::data_access(format!("Failed to acquire lock: {}", e)))?;

        Ok(FileLock { _file: file })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Counter {
        name: String,
        count: u32,
    }

    #[test]
    fn test_missing_and_empty_files_load_as_none() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicJsonFile::<Counter>::new(temp_dir.path().join("missing.json"));
        assert!(file.load().unwrap().is_none());

        let empty = temp_dir.path().join("empty.json");
        fs::write(&empty, "  \n").unwrap();
        assert!(AtomicJsonFile::<Counter>::new(empty).load().unwrap().is_none());
    }

    #[test]
    fn test_save_creates_parents_and_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("counter.json");
        let file = AtomicJsonFile::<Counter>::new(path.clone());

        file.save(&Counter {
            name: "visits".into(),
            count: 3,
        })
        .unwrap();

        assert!(path.exists());
        let mut names: Vec<_> = fs::read_dir(temp_dir.path().join("nested"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["counter.json", "counter.lock"]);
        assert_eq!(file.load().unwrap().unwrap().count, 3);
    }

    #[test]
    fn test_update_passes_result_through() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicJsonFile::<BTreeMap<String, u32>>::new(temp_dir.path().join("m.json"));

        let len = file
            .update(BTreeMap::new(), |map| {
                map.insert("a".into(), 1);
                Ok(map.len())
            })
            .unwrap();
        assert_eq!(len, 1);

        let len = file
            .update(BTreeMap::new(), |map| {
                map.insert("b".into(), 2);
                Ok(map.len())
            })
            .unwrap();
        assert_eq!(len, 2);
    }

    #[test]
    fn test_concurrent_saves_and_updates_do_not_collide() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicJsonFile::<Counter>::new(temp_dir.path().join("shared.json"));
        let seed = Counter {
            name: "shared".into(),
            count: 0,
        };

        let workers: Vec<_> = (0..8)
            .map(|i| {
                let file = file.clone();
                let seed = seed.clone();
                std::thread::spawn(move || {
                    for _ in 0..20 {
                        if i % 2 == 0 {
                            file.save(&seed)?;
                        } else {
                            file.update(seed.clone(), |c| {
                                c.count += 1;
                                Ok(())
                            })?;
                        }
                    }
                    Ok::<(), CareNestError>(())
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap().unwrap();
        }

        let stored = file.load().unwrap().unwrap();
        assert_eq!(stored.name, "shared");
        assert!(stored.count <= 80);
    }

    #[test]
    fn test_failed_update_does_not_write() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicJsonFile::<Counter>::new(temp_dir.path().join("c.json"));
        let seed = Counter {
            name: "seed".into(),
            count: 1,
        };
        file.save(&seed).unwrap();

        let result: Result<()> = file.update(seed.clone(), |c| {
            c.count = 99;
            Err(CareNestError::internal("abort"))
        });
        assert!(result.is_err());
        assert_eq!(file.load().unwrap().unwrap(), seed);
    }

    #[test]
    fn test_corrupt_document_is_serialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();
        let err = AtomicJsonFile::<Counter>::new(path).load().unwrap_err();
        assert!(err.is_persistence());
    }

    #[test]
    fn test_update_existing_skips_missing_document() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("e.json");
        let file = AtomicJsonFile::<Counter>::new(path.clone());

        let touched = file.update_existing(|c| {
            c.count += 1;
            Ok(())
        });
        assert_eq!(touched.unwrap(), None);
        assert!(!path.exists());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicJsonFile::<Counter>::new(temp_dir.path().join("r.json"));
        file.save(&Counter {
            name: "x".into(),
            count: 0,
        })
        .unwrap();
        file.remove().unwrap();
        file.remove().unwrap();
        assert!(file.load().unwrap().is_none());
    }
}
