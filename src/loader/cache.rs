// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::{LoaderError, LoaderResult};
use crate::observability::messages::loader::{WorkerRegistered, WorkerRemoved};
use crate::observability::messages::StructuredLog;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of worker prototypes keyed by executor id.
///
/// Registered prototypes are shared read-only through `Arc`. A caller that
/// runs or customizes a worker takes a private copy with
/// [`instantiate`](Self::instantiate) (or through a
/// [`WorkerSlot`](super::WorkerSlot)) and never mutates the prototype.
/// Lookups far outnumber registrations, so the map sits behind a
/// reader/writer lock.
///
/// # Examples
///
/// ```
/// use the_chainworks::loader::WorkerLoader;
///
/// let loader: WorkerLoader<Vec<u32>> = WorkerLoader::new();
/// loader.register("weights", vec![1, 2, 3]);
///
/// let mut private = loader.instantiate("weights").unwrap();
/// private.push(4);
///
/// assert_eq!(*loader.require("weights").unwrap(), vec![1, 2, 3]);
/// assert!(loader.require("missing").is_err());
/// ```
pub struct WorkerLoader<W> {
    workers: RwLock<HashMap<String, Arc<W>>>,
}

impl<W> Default for WorkerLoader<W> {
    fn default() -> Self {
        Self {
            workers: RwLock::new(HashMap::new()),
        }
    }
}

impl<W: Clone> WorkerLoader<W> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a prototype, replacing any previous worker with the same id.
    pub fn register(&self, id: impl Into<String>, worker: W) -> Arc<W> {
        let id = id.into();
        let worker = Arc::new(worker);
        let replaced = self
            .workers
            .write()
            .insert(id.clone(), Arc::clone(&worker))
            .is_some();
        WorkerRegistered {
            worker_id: &id,
            replaced,
        }
        .log();
        worker
    }

    /// Shared read-only view of the prototype.
    pub fn get(&self, id: &str) -> Option<Arc<W>> {
        self.workers.read().get(id).cloned()
    }

    pub fn require(&self, id: &str) -> LoaderResult<Arc<W>> {
        self.get(id)
            .ok_or_else(|| LoaderError::NotRegistered(id.to_string()))
    }

    /// Private copy of the prototype, owned by the caller.
    pub fn instantiate(&self, id: &str) -> LoaderResult<W> {
        let prototype = self.require(id)?;
        Ok(W::clone(&prototype))
    }

    pub fn remove(&self, id: &str) -> Option<Arc<W>> {
        let removed = self.workers.write().remove(id);
        if removed.is_some() {
            WorkerRemoved { worker_id: id }.log();
        }
        removed
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.workers.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Registered workers, sorted by id.
    pub fn entries(&self) -> Vec<(String, Arc<W>)> {
        let mut entries: Vec<(String, Arc<W>)> = self
            .workers
            .read()
            .iter()
            .map(|(id, worker)| (id.clone(), Arc::clone(worker)))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// First worker, in id order, matching `predicate`.
    pub fn find(&self, predicate: impl Fn(&W) -> bool) -> Option<(String, Arc<W>)> {
        self.entries().into_iter().find(|(_, worker)| predicate(worker))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.workers.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.workers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.read().is_empty()
    }
}
