//! A single resource file and its lock.
//!
//! [`ResourceFile`] is the unit of storage: one JSON file on disk, holding an object that maps
//! each record id to the record. Every public operation:
//!
//! 1. acquires the file's mutex (the guard is dropped on every exit path, including `?`),
//! 2. reads and parses the whole file (creating it holding `{}` if it is missing),
//! 3. performs the query or mutation in memory,
//! 4. for mutations, writes the whole collection to `<file>.tmp` and renames it over the
//!    original.
//!
//! Holding the lock across the full read-modify-write is what makes concurrent writers to the
//! same file safe: they are serialised, so no update is lost. Different files have different
//! locks and do not contend.
//!
//! The lock is a blocking `std::sync::Mutex`. Callers must not hold it across an `.await`,
//! which the API guarantees because none of these methods are async.

use crate::constants::{EMPTY_COLLECTION, TEMP_SUFFIX};
use crate::{StoreError, StoreResult};
use fhir::Resource;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

type Collection<T> = BTreeMap<String, T>;

/// Handle on the JSON file storing every record of resource type `T`.
#[derive(Debug)]
pub struct ResourceFile<T> {
    path: PathBuf,
    lock: Mutex<()>,
    _records: PhantomData<fn() -> T>,
}

impl<T: Resource> ResourceFile<T> {
    /// Create a handle for `path`. Nothing is touched on disk until the first operation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
            _records: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the file holding an empty collection if it does not exist yet.
    pub fn ensure_exists(&self) -> StoreResult<()> {
        let _guard = self.acquire();
        self.create_if_missing()
    }

    /// All records, ordered by id.
    pub fn read_all(&self) -> StoreResult<Vec<T>> {
        let _guard = self.acquire();
        Ok(self.load()?.into_values().collect())
    }

    /// The record stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no such record exists.
    pub fn read_one(&self, id: &str) -> StoreResult<T> {
        let _guard = self.acquire();
        self.load()?
            .remove(id)
            .ok_or_else(|| not_found::<T>(id))
    }

    /// Whether a record with `id` exists.
    pub fn contains(&self, id: &str) -> StoreResult<bool> {
        let _guard = self.acquire();
        Ok(self.load()?.contains_key(id))
    }

    /// Every stored id, in one read.
    pub fn ids(&self) -> StoreResult<BTreeSet<String>> {
        let _guard = self.acquire();
        Ok(self.load()?.into_keys().collect())
    }

    /// All records matching `predicate`, ordered by id (linear scan).
    pub fn find<F>(&self, predicate: F) -> StoreResult<Vec<T>>
    where
        F: Fn(&T) -> bool,
    {
        let _guard = self.acquire();
        Ok(self
            .load()?
            .into_values()
            .filter(|record| predicate(record))
            .collect())
    }

    /// Insert a new record, keyed by its trimmed id. The stored record carries the same
    /// trimmed id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidRecord`] if the record has no id, or
    /// [`StoreError::AlreadyExists`] if the id is taken. The file is not written in either
    /// case.
    pub fn append(&self, mut record: T) -> StoreResult<T> {
        let id = record.id().trim().to_string();
        if id.is_empty() {
            return Err(StoreError::InvalidRecord(format!(
                "{} has no id",
                T::RESOURCE_TYPE
            )));
        }

        let _guard = self.acquire();
        let mut records = self.load()?;
        if records.contains_key(&id) {
            return Err(StoreError::AlreadyExists {
                resource: T::RESOURCE_TYPE,
                id,
            });
        }

        record.set_id(id.clone());
        records.insert(id.clone(), record.clone());
        self.save(&records)?;
        tracing::debug!("appended {} {} to {}", T::RESOURCE_TYPE, id, self.path.display());
        Ok(record)
    }

    /// Replace the record stored under `id` with `record`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if `id` is absent (the file is left untouched), or
    /// [`StoreError::InvalidRecord`] if `record` carries a different id.
    pub fn replace(&self, id: &str, record: T) -> StoreResult<T> {
        if record.id() != id {
            return Err(StoreError::InvalidRecord(format!(
                "{} id '{}' does not match '{}'",
                T::RESOURCE_TYPE,
                record.id(),
                id
            )));
        }

        let _guard = self.acquire();
        let mut records = self.load()?;
        let slot = records.get_mut(id).ok_or_else(|| not_found::<T>(id))?;
        *slot = record.clone();
        self.save(&records)?;
        tracing::debug!("replaced {} {} in {}", T::RESOURCE_TYPE, id, self.path.display());
        Ok(record)
    }

    // ------------------------------------------------------------------------
    // Internals (caller holds the lock)
    // ------------------------------------------------------------------------

    fn acquire(&self) -> MutexGuard<'_, ()> {
        // The mutex guards no data, so a panic in another holder leaves nothing inconsistent.
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn create_if_missing(&self) -> StoreResult<()> {
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(_) => {
                fs::write(&self.path, EMPTY_COLLECTION).map_err(|e| self.io_error(e))?;
                tracing::debug!("created empty store file {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn load(&self) -> StoreResult<Collection<T>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.create_if_missing()?;
                return Ok(Collection::new());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        if contents.trim().is_empty() {
            return Ok(Collection::new());
        }

        let what = self.path.display().to_string();
        Ok(fhir::parse_json(&what, &contents)?)
    }

    fn save(&self, records: &Collection<T>) -> StoreResult<()> {
        let mut rendered =
            serde_json::to_string_pretty(records).map_err(|source| StoreError::Serialise {
                path: self.path.clone(),
                source,
            })?;
        rendered.push('\n');

        let temp_path = self.path.with_extension(format!(
            "{}.{TEMP_SUFFIX}",
            self.path
                .extension()
                .and_then(|ext| ext.to_str())
                .unwrap_or("json")
        ));
        fs::write(&temp_path, rendered).map_err(|source| StoreError::Io {
            path: temp_path.clone(),
            source,
        })?;
        fs::rename(&temp_path, &self.path).map_err(|e| self.io_error(e))
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

fn not_found<T: Resource>(id: &str) -> StoreError {
    StoreError::NotFound {
        resource: T::RESOURCE_TYPE,
        id: id.to_string(),
    }
}
