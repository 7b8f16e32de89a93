// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::matrix::{
    ChannelOrder, ChannelView, ElementType, MultiMatrix, MAX_NUMBER_OF_CHANNELS,
};
use crate::errors::{MarshalError, MarshalResult};
use std::sync::Arc;

/// Contiguous buffer holding all channels interleaved element by element.
///
/// The first dimension is the number of channels; the rest are the
/// dimensions of one channel. The buffer always starts at offset zero and
/// is exactly as long as the packed data.
#[derive(Debug, Clone)]
pub struct PackedBuffer {
    element_type: ElementType,
    dimensions: Vec<u64>,
    bytes: Arc<[u8]>,
}

impl PackedBuffer {
    /// Wraps packed data.
    ///
    /// A view covering a whole buffer is reused as is; any other view is
    /// copied so the result owns a buffer starting at offset zero.
    ///
    /// # Errors
    /// [`MarshalError::InvalidShape`] when there are fewer than two
    /// dimensions, too many channels, or the view length does not match the
    /// dimensions.
    pub fn from_packed(
        element_type: ElementType,
        dimensions: Vec<u64>,
        packed: &ChannelView,
    ) -> MarshalResult<Self> {
        if dimensions.len() < 2 {
            return Err(MarshalError::InvalidShape(format!(
                "packed matrix cannot be {}-dimensional, the first dimension stores channels",
                dimensions.len()
            )));
        }
        if dimensions[0] == 0 || dimensions[0] > MAX_NUMBER_OF_CHANNELS as u64 {
            return Err(MarshalError::InvalidShape(format!(
                "number of channels must be in 1..={}, not {}",
                MAX_NUMBER_OF_CHANNELS, dimensions[0]
            )));
        }
        let expected = dimensions
            .iter()
            .try_fold(element_type.size() as u64, |product, &dim| product.checked_mul(dim));
        if expected != Some(packed.len() as u64) {
            return Err(MarshalError::InvalidShape(format!(
                "packed view has {} bytes, dimensions {:?} need {}",
                packed.len(),
                dimensions,
                expected.map_or_else(|| "more than u64::MAX".to_string(), |e| e.to_string())
            )));
        }
        Ok(Self {
            element_type,
            dimensions,
            bytes: packed.to_shared(),
        })
    }

    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    /// Packed dimensions, channels first.
    pub fn dimensions(&self) -> &[u64] {
        &self.dimensions
    }

    pub fn number_of_channels(&self) -> usize {
        self.dimensions[0] as usize
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn shared_bytes(&self) -> &Arc<[u8]> {
        &self.bytes
    }

    /// Splits the buffer back into a [`MultiMatrix`], reading channels in `order`.
    ///
    /// A single-channel buffer is shared with the matrix without copying.
    pub fn unpack(&self, order: ChannelOrder) -> MarshalResult<MultiMatrix> {
        let number_of_channels = self.number_of_channels();
        let channel_dimensions = self.dimensions[1..].to_vec();
        if number_of_channels == 1 {
            return MultiMatrix::new(
                self.element_type,
                channel_dimensions,
                vec![ChannelView::new(Arc::clone(&self.bytes))],
            );
        }

        let element_size = self.element_type.size();
        let stride = number_of_channels * element_size;
        let mut channels = vec![Vec::with_capacity(self.bytes.len() / number_of_channels); number_of_channels];
        for (position, &channel_index) in order.channel_indices(number_of_channels).iter().enumerate() {
            let channel = &mut channels[channel_index];
            for element in self.bytes.chunks_exact(stride) {
                let start = position * element_size;
                channel.extend_from_slice(&element[start..start + element_size]);
            }
        }
        MultiMatrix::from_channels(self.element_type, channel_dimensions, channels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MultiChannelSource;

    #[test]
    fn test_from_packed_validation() {
        struct TestCase {
            name: &'static str,
            dimensions: Vec<u64>,
            bytes: usize,
            valid: bool,
        }

        let test_cases = vec![
            TestCase {
                name: "rgb 2x2",
                dimensions: vec![3, 2, 2],
                bytes: 12,
                valid: true,
            },
            TestCase {
                name: "one dimension",
                dimensions: vec![12],
                bytes: 12,
                valid: false,
            },
            TestCase {
                name: "too many channels",
                dimensions: vec![MAX_NUMBER_OF_CHANNELS as u64 + 1, 1],
                bytes: MAX_NUMBER_OF_CHANNELS + 1,
                valid: false,
            },
            TestCase {
                name: "length mismatch",
                dimensions: vec![3, 2, 2],
                bytes: 11,
                valid: false,
            },
        ];

        for tc in test_cases {
            let view = ChannelView::from(vec![0u8; tc.bytes]);
            let result = PackedBuffer::from_packed(ElementType::U8, tc.dimensions, &view);
            assert_eq!(result.is_ok(), tc.valid, "case: {}", tc.name);
        }
    }

    #[test]
    fn test_offset_view_is_copied() {
        let buffer: Arc<[u8]> = Arc::from(vec![9u8, 1, 2, 3, 4]);
        let whole = ChannelView::slice(Arc::clone(&buffer), 0, 5).unwrap();
        let packed = PackedBuffer::from_packed(ElementType::U8, vec![1, 5], &whole).unwrap();
        assert!(Arc::ptr_eq(packed.shared_bytes(), &buffer));

        let tail = ChannelView::slice(Arc::clone(&buffer), 1, 4).unwrap();
        let packed = PackedBuffer::from_packed(ElementType::U8, vec![2, 2], &tail).unwrap();
        assert!(!Arc::ptr_eq(packed.shared_bytes(), &buffer));
        assert_eq!(packed.as_bytes(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_unpack_reorders_channels() {
        // two elements of three channels, packed as c2 c1 c0
        let view = ChannelView::from(vec![30u8, 20, 10, 31, 21, 11]);
        let packed = PackedBuffer::from_packed(ElementType::U8, vec![3, 2], &view).unwrap();

        let standard = packed.unpack(ChannelOrder::Standard).unwrap();
        assert_eq!(standard.dimensions(), &[2]);
        assert_eq!(standard.channels()[0].as_bytes(), &[10, 11]);
        assert_eq!(standard.channels()[2].as_bytes(), &[30, 31]);

        let natural = packed.unpack(ChannelOrder::PackedBuffer).unwrap();
        assert_eq!(natural.channels()[0].as_bytes(), &[30, 31]);
    }

    #[test]
    fn test_unpack_single_channel_shares_buffer() {
        let view = ChannelView::from(vec![1u8, 2, 3, 4]);
        let packed = PackedBuffer::from_packed(ElementType::U16, vec![1, 2], &view).unwrap();
        let matrix = packed.unpack(ChannelOrder::Standard).unwrap();
        assert_eq!(matrix.number_of_channels(), 1);
        assert!(Arc::ptr_eq(matrix.channels()[0].buffer(), packed.shared_bytes()));
    }
}
