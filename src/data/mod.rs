// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Marshalling of multi-channel payloads into packed buffers.
//!
//! Executors exchange matrices either channel by channel ([`MultiMatrix`]) or
//! as one packed buffer with channels interleaved per element
//! ([`PackedBuffer`]). [`ConvertibleMultiMatrix`] converts the former into
//! the latter on request.

mod convertible;
mod matrix;
mod packed;

pub use convertible::ConvertibleMultiMatrix;
pub use matrix::{
    ChannelOrder, ChannelView, ElementType, MultiChannelSource, MultiMatrix, MAX_NUMBER_OF_CHANNELS,
    MAX_PACKED_BYTES,
};
pub use packed::PackedBuffer;
