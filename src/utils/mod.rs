// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod json;

pub use json::{override_entries, to_pretty_string, FieldError};
