// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Executor specifications and the worker loader that caches them.
//!
//! [`WorkerLoader`] holds shared prototypes keyed by executor id.
//! [`WorkerSlot`] gives a caller its own lazily cloned copy. The [`models`]
//! functions fill a loader from the models folders of installed platforms.

mod cache;
pub mod models;
mod slot;
mod specification;

pub use cache::WorkerLoader;
pub use models::{load_specifications, read_all_if_valid, read_all_json_if_valid};
pub use slot::WorkerSlot;
pub(crate) use specification::read_json;
pub use specification::{
    ControlSpecification, ExecutorSpecification, PortSpecification, RoleSpecification,
    EXECUTOR_APP_NAME, EXECUTOR_CURRENT_VERSION, SETTINGS,
};
