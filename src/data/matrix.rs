// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Multi-channel matrices as seen by the marshalling boundary.

use crate::errors::{MarshalError, MarshalResult};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Largest number of bytes a packed buffer may hold.
pub const MAX_PACKED_BYTES: u64 = i32::MAX as u64;
/// Largest number of channels of a multi-channel matrix.
pub const MAX_NUMBER_OF_CHANNELS: usize = 512;

/// Element type of every channel of a matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    U8,
    U16,
    I16,
    I32,
    F32,
    F64,
}

impl ElementType {
    /// Size of one element in bytes.
    pub fn size(self) -> usize {
        match self {
            ElementType::U8 => 1,
            ElementType::U16 | ElementType::I16 => 2,
            ElementType::I32 | ElementType::F32 => 4,
            ElementType::F64 => 8,
        }
    }
}

/// Order of channels inside a packed buffer.
///
/// # Variants
/// * `Standard` - Blue, green, red, alpha: the first and third channels are
///   swapped when there are at least three
/// * `PackedBuffer` - Natural channel order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelOrder {
    #[default]
    Standard,
    PackedBuffer,
}

impl ChannelOrder {
    /// Source channel index stored at each packed position.
    pub fn channel_indices(self, number_of_channels: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..number_of_channels).collect();
        if self == ChannelOrder::Standard && number_of_channels >= 3 {
            indices.swap(0, 2);
        }
        indices
    }
}

/// Byte view into a shared buffer.
#[derive(Debug, Clone)]
pub struct ChannelView {
    buffer: Arc<[u8]>,
    offset: usize,
    len: usize,
}

impl ChannelView {
    /// View of the whole buffer.
    pub fn new(buffer: Arc<[u8]>) -> Self {
        let len = buffer.len();
        Self {
            buffer,
            offset: 0,
            len,
        }
    }

    pub fn slice(buffer: Arc<[u8]>, offset: usize, len: usize) -> MarshalResult<Self> {
        match offset.checked_add(len) {
            Some(end) if end <= buffer.len() => Ok(Self {
                buffer,
                offset,
                len,
            }),
            _ => Err(MarshalError::InvalidShape(format!(
                "view {}..{} is outside a buffer of {} bytes",
                offset,
                offset.saturating_add(len),
                buffer.len()
            ))),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer[self.offset..self.offset + self.len]
    }

    pub fn buffer(&self) -> &Arc<[u8]> {
        &self.buffer
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// `true` when the view starts at offset zero and covers the whole buffer.
    pub fn is_whole_buffer(&self) -> bool {
        self.offset == 0 && self.len == self.buffer.len()
    }

    /// The viewed bytes as a standalone buffer, shared when possible.
    pub fn to_shared(&self) -> Arc<[u8]> {
        if self.is_whole_buffer() {
            Arc::clone(&self.buffer)
        } else {
            Arc::from(self.as_bytes())
        }
    }
}

impl From<Vec<u8>> for ChannelView {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(Arc::from(bytes))
    }
}

/// A multi-channel payload that can be packed.
///
/// Implementations describe the geometry and expose each channel as a byte
/// view of `size() * element_type().size()` bytes.
pub trait MultiChannelSource {
    fn element_type(&self) -> ElementType;

    /// Dimensions of one channel.
    fn dimensions(&self) -> &[u64];

    fn number_of_channels(&self) -> usize;

    fn channel(&self, index: usize) -> Option<&ChannelView>;

    /// Number of elements per channel, `None` on overflow.
    fn size(&self) -> Option<u64> {
        self.dimensions()
            .iter()
            .try_fold(1u64, |product, &dim| product.checked_mul(dim))
    }
}

/// Multi-channel matrix backed by byte views.
#[derive(Debug, Clone)]
pub struct MultiMatrix {
    element_type: ElementType,
    dimensions: Vec<u64>,
    channels: Vec<ChannelView>,
}

impl MultiMatrix {
    pub fn new(
        element_type: ElementType,
        dimensions: Vec<u64>,
        channels: Vec<ChannelView>,
    ) -> MarshalResult<Self> {
        if dimensions.is_empty() {
            return Err(MarshalError::InvalidShape("a matrix needs at least one dimension".into()));
        }
        if channels.is_empty() || channels.len() > MAX_NUMBER_OF_CHANNELS {
            return Err(MarshalError::InvalidShape(format!(
                "number of channels must be in 1..={}, not {}",
                MAX_NUMBER_OF_CHANNELS,
                channels.len()
            )));
        }
        let matrix = Self {
            element_type,
            dimensions,
            channels,
        };
        let expected = matrix.channel_bytes()?;
        if let Some((index, channel)) = matrix
            .channels
            .iter()
            .enumerate()
            .find(|(_, channel)| channel.len() != expected)
        {
            return Err(MarshalError::InvalidShape(format!(
                "channel {} has {} bytes, expected {}",
                index,
                channel.len(),
                expected
            )));
        }
        Ok(matrix)
    }

    /// Matrix over freshly owned channel bytes.
    pub fn from_channels(
        element_type: ElementType,
        dimensions: Vec<u64>,
        channels: Vec<Vec<u8>>,
    ) -> MarshalResult<Self> {
        Self::new(
            element_type,
            dimensions,
            channels.into_iter().map(ChannelView::from).collect(),
        )
    }

    pub fn channels(&self) -> &[ChannelView] {
        &self.channels
    }

    /// Bytes per channel.
    fn channel_bytes(&self) -> MarshalResult<usize> {
        self.size()
            .and_then(|size| size.checked_mul(self.element_type.size() as u64))
            .and_then(|bytes| usize::try_from(bytes).ok())
            .ok_or_else(|| MarshalError::InvalidShape(format!("dimensions {:?} overflow", self.dimensions)))
    }
}

impl MultiChannelSource for MultiMatrix {
    fn element_type(&self) -> ElementType {
        self.element_type
    }

    fn dimensions(&self) -> &[u64] {
        &self.dimensions
    }

    fn number_of_channels(&self) -> usize {
        self.channels.len()
    }

    fn channel(&self, index: usize) -> Option<&ChannelView> {
        self.channels.get(index)
    }
}

impl Display for MultiMatrix {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "multi-matrix {:?}x{:?}, {} channel(s)",
            self.element_type,
            self.dimensions,
            self.channels.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_indices() {
        struct TestCase {
            order: ChannelOrder,
            channels: usize,
            expected: Vec<usize>,
        }

        let test_cases = vec![
            TestCase {
                order: ChannelOrder::Standard,
                channels: 1,
                expected: vec![0],
            },
            TestCase {
                order: ChannelOrder::Standard,
                channels: 2,
                expected: vec![0, 1],
            },
            TestCase {
                order: ChannelOrder::Standard,
                channels: 4,
                expected: vec![2, 1, 0, 3],
            },
            TestCase {
                order: ChannelOrder::PackedBuffer,
                channels: 3,
                expected: vec![0, 1, 2],
            },
        ];

        for tc in test_cases {
            assert_eq!(
                tc.order.channel_indices(tc.channels),
                tc.expected,
                "{:?} with {} channel(s)",
                tc.order,
                tc.channels
            );
        }
    }

    #[test]
    fn test_view_bounds_and_sharing() {
        let buffer: Arc<[u8]> = Arc::from(vec![1u8, 2, 3, 4]);
        let whole = ChannelView::new(Arc::clone(&buffer));
        assert!(whole.is_whole_buffer());
        assert!(Arc::ptr_eq(&whole.to_shared(), &buffer));

        let tail = ChannelView::slice(Arc::clone(&buffer), 2, 2).unwrap();
        assert_eq!(tail.as_bytes(), &[3, 4]);
        assert!(!tail.is_whole_buffer());
        assert!(!Arc::ptr_eq(&tail.to_shared(), &buffer));

        assert!(ChannelView::slice(buffer, 3, 2).is_err());
    }

    #[test]
    fn test_matrix_validation() {
        assert!(MultiMatrix::from_channels(ElementType::U16, vec![2, 2], vec![vec![0; 8]]).is_ok());
        assert!(MultiMatrix::from_channels(ElementType::U16, vec![2, 2], vec![vec![0; 4]]).is_err());
        assert!(MultiMatrix::from_channels(ElementType::U8, vec![], vec![vec![0; 1]]).is_err());
        assert!(MultiMatrix::from_channels(ElementType::U8, vec![1], vec![]).is_err());
        assert!(MultiMatrix::from_channels(
            ElementType::U8,
            vec![1],
            vec![vec![0]; MAX_NUMBER_OF_CHANNELS + 1]
        )
        .is_err());
    }
}
