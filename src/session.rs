//! Per-session dataset registry.
//!
//! A [`Session`] maps each uploaded file name to its current [`DataSet`] so that edits made by
//! one action are still there on the next render. It is an ordinary value: create one when the
//! user's session starts, pass it by `&mut` into every render, and drop it (or call
//! [`Session::end`]) when the session ends.

use std::collections::HashMap;

use crate::error::{SweepError, SweepResult};
use crate::ingestion::{load, LoadOptions, Upload};
use crate::types::DataSet;

/// File name → current dataset.
#[derive(Debug, Default)]
pub struct Session {
    datasets: HashMap<String, DataSet>,
}

impl Session {
    /// Start an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of files held.
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    /// `true` if no file has been loaded yet.
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    /// Whether a dataset is stored under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.datasets.contains_key(name)
    }

    /// Current dataset for `name`.
    pub fn get(&self, name: &str) -> Option<&DataSet> {
        self.datasets.get(name)
    }

    /// Store `dataset` under `name`, returning the one it replaces.
    pub fn insert(&mut self, name: impl Into<String>, dataset: DataSet) -> Option<DataSet> {
        self.datasets.insert(name.into(), dataset)
    }

    /// Forget `name`; the next render re-parses its upload.
    pub fn remove(&mut self, name: &str) -> Option<DataSet> {
        self.datasets.remove(name)
    }

    /// Stored file names, sorted.
    pub fn file_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.datasets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// The stored dataset for `upload`, parsing and storing it first if this is its first render.
    ///
    /// Once stored, the upload's bytes are not looked at again: later edits win over the file.
    pub fn get_or_load(&mut self, upload: &Upload, options: &LoadOptions) -> SweepResult<&DataSet> {
        if !self.datasets.contains_key(&upload.name) {
            let dataset = load(upload, options)?;
            self.datasets.insert(upload.name.clone(), dataset);
        }
        self.get(&upload.name).ok_or_else(|| SweepError::UnknownFile {
            name: upload.name.clone(),
        })
    }

    /// Replace the dataset for `name` with the result of `f`.
    ///
    /// `f` returns the new dataset plus any extra outcome, which is passed back. On error the
    /// stored dataset is left as it was.
    pub fn update<T, F>(&mut self, name: &str, f: F) -> SweepResult<T>
    where
        F: FnOnce(&DataSet) -> SweepResult<(DataSet, T)>,
    {
        let current = self
            .datasets
            .get_mut(name)
            .ok_or_else(|| SweepError::UnknownFile { name: name.to_owned() })?;
        let (next, outcome) = f(current)?;
        *current = next;
        Ok(outcome)
    }

    /// End the session, discarding every stored dataset.
    pub fn end(self) {
        log::debug!("session ended with {} file(s)", self.datasets.len());
    }
}
