// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Hierarchical settings: combining, splitting and discovering settings specifications.

mod combiner;
mod interpreters;
mod search;

pub use combiner::{resolve_sub_settings, CombinerLoader, SettingsCombiner};
pub use interpreters::{CombineSettings, SettingsOutput, SplitSettings};
pub use search::{probable_settings_ids, CandidateSupplier, SmartSearchSettings, UnresolvedReference};
