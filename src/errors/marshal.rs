// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors from packing multi-channel payloads into contiguous buffers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarshalError {
    /// Packed size does not fit into one contiguous buffer.
    #[error("Too large matrix: {channels} channels x {elements} elements x {element_size} bytes exceeds {limit} bytes")]
    Capacity {
        channels: usize,
        elements: u64,
        element_size: usize,
        limit: u64,
    },

    #[error("Invalid packed layout: {0}")]
    InvalidShape(String),
}

pub type MarshalResult<T> = Result<T, MarshalError>;
