mod data;

pub use data::{Annotation, AnnotationData, BasicStats, Median, StandardDeviation, StandardStats};

use indexmap::IndexMap;
use log::*;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{FeaturizerError, Result};

/// Annotations of one column, keyed by the name of the transform that produced them.
/// Insertion order is kept; lookups return the most recent matching annotation.
#[derive(Debug, Clone)]
pub struct AnnotationMap {
    column: usize,
    entries: IndexMap<String, Vec<Arc<Annotation>>>,
}

impl AnnotationMap {
    pub fn new(column: usize) -> Self {
        Self {
            column,
            entries: IndexMap::new(),
        }
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn get<D: AnnotationData>(&self, name: &str) -> Option<&D> {
        self.annotations(name)
            .iter()
            .rev()
            .find_map(|annotation| D::from_annotation(annotation))
    }

    /// Like [`AnnotationMap::get`], failing with `AnnotationNotFound` when missing.
    pub fn require<D: AnnotationData>(&self, name: &str) -> Result<&D> {
        self.get(name)
            .ok_or_else(|| FeaturizerError::AnnotationNotFound {
                column: self.column,
                name: name.to_string(),
            })
    }

    pub fn contains<D: AnnotationData>(&self, name: &str) -> bool {
        self.get::<D>(name).is_some()
    }

    pub fn annotations(&self, name: &str) -> &[Arc<Annotation>] {
        self.entries.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|name| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(|annotations| annotations.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains_kind(&self, name: &str, annotation: &Annotation) -> bool {
        self.annotations(name)
            .iter()
            .any(|existing| existing.same_kind(annotation))
    }

    fn push(&mut self, name: &str, annotation: Annotation) {
        self.entries
            .entry(name.to_string())
            .or_insert_with(Vec::new)
            .push(Arc::new(annotation));
    }
}

/// The annotation maps of every output column of one training run.
/// Cloning shares the underlying store.
#[derive(Debug, Clone)]
pub struct ColumnAnnotations {
    maps: Arc<RwLock<Vec<AnnotationMap>>>,
    n_columns: usize,
}

impl ColumnAnnotations {
    pub fn new(n_columns: usize) -> Result<Self> {
        if n_columns == 0 {
            return Err(FeaturizerError::InvalidArgument(
                "at least one column is required".to_string(),
            ));
        }
        let maps = (0..n_columns).map(AnnotationMap::new).collect();
        Ok(Self {
            maps: Arc::new(RwLock::new(maps)),
            n_columns,
        })
    }

    pub fn len(&self) -> usize {
        self.n_columns
    }

    pub fn is_empty(&self) -> bool {
        self.n_columns == 0
    }

    pub fn check_column(&self, column: usize) -> Result<()> {
        if column < self.n_columns {
            Ok(())
        } else {
            Err(FeaturizerError::InvalidColumn {
                column,
                columns: self.n_columns,
            })
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<AnnotationMap>>> {
        self.maps
            .read()
            .map_err(|_| FeaturizerError::Internal("annotation store lock is poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<AnnotationMap>>> {
        self.maps
            .write()
            .map_err(|_| FeaturizerError::Internal("annotation store lock is poisoned"))
    }

    /// Runs `f` with read access to the annotations of `column`.
    pub fn with_column<R, F>(&self, column: usize, f: F) -> Result<R>
    where
        F: FnOnce(&AnnotationMap) -> R,
    {
        self.check_column(column)?;
        let maps = self.read()?;
        Ok(f(&maps[column]))
    }

    pub fn get<D: AnnotationData>(&self, column: usize, name: &str) -> Result<Option<D>> {
        self.with_column(column, |map| map.get::<D>(name).cloned())
    }

    pub fn contains<D: AnnotationData>(&self, column: usize, name: &str) -> Result<bool> {
        self.with_column(column, |map| map.contains::<D>(name))
    }

    /// Appends a validated annotation for (`column`, `name`).
    pub fn insert(&self, column: usize, name: &str, annotation: Annotation) -> Result<()> {
        annotation.validate()?;
        self.check_column(column)?;
        let mut maps = self.write()?;
        maps[column].push(name, annotation);
        Ok(())
    }

    /// Inserts the annotation unless one of the same kind already exists for
    /// (`column`, `name`). Returns whether it was inserted.
    pub fn insert_if_absent(&self, column: usize, name: &str, annotation: Annotation) -> Result<bool> {
        annotation.validate()?;
        self.check_column(column)?;
        let mut maps = self.write()?;
        let map = &mut maps[column];
        if map.contains_kind(name, &annotation) {
            debug!("Column {} already has a '{}' annotation", column, name);
            return Ok(false);
        }
        map.push(name, annotation);
        Ok(true)
    }
}
