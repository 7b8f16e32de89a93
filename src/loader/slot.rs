// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::WorkerLoader;
use crate::errors::LoaderResult;
use crate::observability::messages::loader::WorkerInstantiated;
use crate::observability::messages::StructuredLog;
use std::sync::OnceLock;

/// Lazily created private copy of one registered worker.
///
/// The first call to [`get_or_instantiate`](Self::get_or_instantiate) clones
/// the prototype into a local value and only then publishes it, so no
/// thread can observe a partially built copy. When two threads race, both
/// build a copy, one is published and the other is dropped; every caller
/// gets the published one.
#[derive(Debug)]
pub struct WorkerSlot<W> {
    worker_id: String,
    worker: OnceLock<W>,
}

impl<W: Clone> WorkerSlot<W> {
    pub fn new(worker_id: impl Into<String>) -> Self {
        Self {
            worker_id: worker_id.into(),
            worker: OnceLock::new(),
        }
    }

    pub fn worker_id(&self) -> &str {
        &self.worker_id
    }

    pub fn get_or_instantiate(&self, loader: &WorkerLoader<W>) -> LoaderResult<&W> {
        if let Some(worker) = self.worker.get() {
            return Ok(worker);
        }
        let local = loader.instantiate(&self.worker_id)?;
        let published = self.worker.get_or_init(|| {
            WorkerInstantiated {
                worker_id: &self.worker_id,
            }
            .log();
            local
        });
        Ok(published)
    }

    /// The published copy, if any.
    pub fn get(&self) -> Option<&W> {
        self.worker.get()
    }

    pub fn is_instantiated(&self) -> bool {
        self.worker.get().is_some()
    }
}
