// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::matrix::{
    ChannelOrder, ChannelView, ElementType, MultiChannelSource, MAX_PACKED_BYTES,
};
use super::packed::PackedBuffer;
use crate::errors::{MarshalError, MarshalResult};
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Multi-channel source converted to packed form on request.
///
/// Conversion is lazy: nothing is packed until
/// [`to_packed_buffer`](Self::to_packed_buffer) or
/// [`to_byte_array`](Self::to_byte_array) is called, and single-channel
/// sources are handed over without interleaving.
///
/// # Example
/// ```
/// use the_chainworks::data::{ChannelOrder, ConvertibleMultiMatrix, ElementType, MultiMatrix};
///
/// let rgb = MultiMatrix::from_channels(
///     ElementType::U8,
///     vec![2],
///     vec![vec![1, 2], vec![3, 4], vec![5, 6]],
/// )
/// .unwrap();
///
/// let convertible = ConvertibleMultiMatrix::new(rgb);
/// assert_eq!(&convertible.to_byte_array().unwrap()[..], &[5, 3, 1, 6, 4, 2]);
/// assert!(convertible.cached_matrix(ChannelOrder::Standard).is_some());
/// assert!(convertible.cached_matrix(ChannelOrder::PackedBuffer).is_none());
/// ```
#[derive(Debug, Clone)]
pub struct ConvertibleMultiMatrix<S> {
    source: S,
    channel_order: ChannelOrder,
}

impl<S: MultiChannelSource> ConvertibleMultiMatrix<S> {
    /// Converter packing in [`ChannelOrder::Standard`].
    pub fn new(source: S) -> Self {
        Self::with_order(source, ChannelOrder::Standard)
    }

    pub fn with_order(source: S, channel_order: ChannelOrder) -> Self {
        Self {
            source,
            channel_order,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    pub fn channel_order(&self) -> ChannelOrder {
        self.channel_order
    }

    /// The source itself when `channel_order` is the order this converter packs in.
    pub fn cached_matrix(&self, channel_order: ChannelOrder) -> Option<&S> {
        (channel_order == self.channel_order).then_some(&self.source)
    }

    /// Packed buffer with dimensions `[channels, ..source dimensions]`.
    ///
    /// A single channel whose view covers a whole buffer is reused without copying.
    pub fn to_packed_buffer(&self) -> MarshalResult<PackedBuffer> {
        let number_of_channels = self.source.number_of_channels();
        let mut dimensions = Vec::with_capacity(self.source.dimensions().len() + 1);
        dimensions.push(number_of_channels as u64);
        dimensions.extend_from_slice(self.source.dimensions());

        if number_of_channels == 1 {
            let channel = self.channel(0)?;
            return PackedBuffer::from_packed(self.source.element_type(), dimensions, channel);
        }
        let packed = self.interleave()?;
        PackedBuffer::from_packed(
            self.source.element_type(),
            dimensions,
            &ChannelView::new(Arc::from(packed)),
        )
    }

    /// Packed bytes.
    ///
    /// A single-channel `u8` source backed by a whole buffer is returned
    /// without copying; other single-channel sources are copied as they are.
    pub fn to_byte_array(&self) -> MarshalResult<Arc<[u8]>> {
        if self.source.element_type() != ElementType::U8 {
            return Ok(Arc::clone(self.to_packed_buffer()?.shared_bytes()));
        }
        if self.source.number_of_channels() == 1 {
            return Ok(self.channel(0)?.to_shared());
        }
        Ok(Arc::from(self.interleave()?))
    }

    /// Interleaves all channels into one freshly allocated buffer.
    fn interleave(&self) -> MarshalResult<Vec<u8>> {
        let number_of_channels = self.source.number_of_channels();
        if number_of_channels == 0 {
            return Err(MarshalError::InvalidShape("a matrix needs at least one channel".into()));
        }
        let element_size = self.source.element_type().size();
        let elements = self.source.size();
        let total = elements
            .and_then(|size| size.checked_mul(number_of_channels as u64))
            .and_then(|size| size.checked_mul(element_size as u64));
        let total = match total {
            Some(total) if total <= MAX_PACKED_BYTES => total as usize,
            _ => {
                return Err(MarshalError::Capacity {
                    channels: number_of_channels,
                    elements: elements.unwrap_or(u64::MAX),
                    element_size,
                    limit: MAX_PACKED_BYTES,
                })
            }
        };

        let channel_bytes = total / number_of_channels;
        let stride = number_of_channels * element_size;
        let mut packed = vec![0u8; total];
        for (position, channel_index) in self
            .channel_order
            .channel_indices(number_of_channels)
            .into_iter()
            .enumerate()
        {
            let channel = self.channel(channel_index)?;
            if channel.len() != channel_bytes {
                return Err(MarshalError::InvalidShape(format!(
                    "channel {} has {} bytes, expected {}",
                    channel_index,
                    channel.len(),
                    channel_bytes
                )));
            }
            let offset = position * element_size;
            for (element, target) in channel
                .as_bytes()
                .chunks_exact(element_size)
                .zip(packed.chunks_exact_mut(stride))
            {
                target[offset..offset + element_size].copy_from_slice(element);
            }
        }
        Ok(packed)
    }

    fn channel(&self, index: usize) -> MarshalResult<&ChannelView> {
        self.source
            .channel(index)
            .ok_or_else(|| MarshalError::InvalidShape(format!("channel {} is missing", index)))
    }
}

impl<S: Display> Display for ConvertibleMultiMatrix<S> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "reference to {}", self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MultiMatrix;

    fn rgb_u16() -> MultiMatrix {
        // two elements per channel, little-endian u16
        MultiMatrix::from_channels(
            ElementType::U16,
            vec![2, 1],
            vec![vec![1, 0, 2, 0], vec![3, 0, 4, 0], vec![5, 0, 6, 0]],
        )
        .unwrap()
    }

    /// Reports huge dimensions without holding the data.
    struct HugeSource {
        dimensions: Vec<u64>,
        channel: ChannelView,
    }

    impl MultiChannelSource for HugeSource {
        fn element_type(&self) -> ElementType {
            ElementType::U8
        }

        fn dimensions(&self) -> &[u64] {
            &self.dimensions
        }

        fn number_of_channels(&self) -> usize {
            3
        }

        fn channel(&self, _index: usize) -> Option<&ChannelView> {
            Some(&self.channel)
        }
    }

    #[test]
    fn test_packed_buffer_orders() {
        struct TestCase {
            order: ChannelOrder,
            expected: Vec<u8>,
        }

        let test_cases = vec![
            TestCase {
                order: ChannelOrder::Standard,
                expected: vec![5, 0, 3, 0, 1, 0, 6, 0, 4, 0, 2, 0],
            },
            TestCase {
                order: ChannelOrder::PackedBuffer,
                expected: vec![1, 0, 3, 0, 5, 0, 2, 0, 4, 0, 6, 0],
            },
        ];

        for tc in test_cases {
            let convertible = ConvertibleMultiMatrix::with_order(rgb_u16(), tc.order);
            let packed = convertible.to_packed_buffer().unwrap();
            assert_eq!(packed.dimensions(), &[3, 2, 1], "{:?}", tc.order);
            assert_eq!(packed.as_bytes(), &tc.expected[..], "{:?}", tc.order);
            assert_eq!(&convertible.to_byte_array().unwrap()[..], &tc.expected[..]);

            let unpacked = packed.unpack(tc.order).unwrap();
            for (expected, restored) in rgb_u16().channels().iter().zip(unpacked.channels()) {
                assert_eq!(expected.as_bytes(), restored.as_bytes(), "{:?}", tc.order);
            }
        }
    }

    #[test]
    fn test_single_channel_zero_copy() {
        let buffer: Arc<[u8]> = Arc::from(vec![7u8, 8, 9, 10]);
        let whole = MultiMatrix::new(
            ElementType::U8,
            vec![2, 2],
            vec![ChannelView::new(Arc::clone(&buffer))],
        )
        .unwrap();
        let convertible = ConvertibleMultiMatrix::new(whole);
        assert!(Arc::ptr_eq(&convertible.to_byte_array().unwrap(), &buffer));
        assert!(Arc::ptr_eq(convertible.to_packed_buffer().unwrap().shared_bytes(), &buffer));

        let offset = MultiMatrix::new(
            ElementType::U8,
            vec![3],
            vec![ChannelView::slice(Arc::clone(&buffer), 1, 3).unwrap()],
        )
        .unwrap();
        let convertible = ConvertibleMultiMatrix::new(offset);
        let bytes = convertible.to_byte_array().unwrap();
        assert!(!Arc::ptr_eq(&bytes, &buffer));
        assert_eq!(&bytes[..], &[8, 9, 10]);
        assert!(!Arc::ptr_eq(convertible.to_packed_buffer().unwrap().shared_bytes(), &buffer));
    }

    #[test]
    fn test_capacity_exceeded() {
        struct TestCase {
            name: &'static str,
            dimensions: Vec<u64>,
        }

        let test_cases = vec![
            TestCase {
                name: "over the packed limit",
                dimensions: vec![1 << 16, 1 << 16],
            },
            TestCase {
                name: "element count overflows",
                dimensions: vec![u64::MAX, 2],
            },
        ];

        for tc in test_cases {
            let convertible = ConvertibleMultiMatrix::new(HugeSource {
                dimensions: tc.dimensions,
                channel: ChannelView::from(vec![0u8; 4]),
            });
            assert!(
                matches!(convertible.to_byte_array(), Err(MarshalError::Capacity { channels: 3, .. })),
                "case: {}",
                tc.name
            );
            assert!(
                matches!(convertible.to_packed_buffer(), Err(MarshalError::Capacity { .. })),
                "case: {}",
                tc.name
            );
        }
    }

    #[test]
    fn test_display() {
        let convertible = ConvertibleMultiMatrix::new(rgb_u16());
        assert_eq!(
            convertible.to_string(),
            "reference to multi-matrix U16x[2, 1], 3 channel(s)"
        );
    }
}
