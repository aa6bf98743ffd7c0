//! The `image` module provides the [`SparseImage`] struct, a sparse address → byte
//! mapping backed by a `BTreeMap`, and [`AddressRange`], the inclusive span an image
//! covers.
//!
//! A [`SparseImage`] is materialized into a flat buffer by walking every address of
//! its range and emitting either the stored byte or a single pad byte.

use crate::record::Record;
use std::collections::BTreeMap;

/// Inclusive address span `[start, end]`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AddressRange {
    pub start: usize,
    pub end: usize,
}

impl AddressRange {
    /// # Panics
    /// Debug builds panic if `start > end`.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// Number of addresses covered, `end - start + 1`.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Always `false`: a range holds at least one address.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    #[must_use]
    pub const fn contains(&self, address: usize) -> bool {
        self.start <= address && address <= self.end
    }

    /// Grow the range so it also covers `[start, end]`.
    pub fn include(&mut self, start: usize, end: usize) {
        self.start = self.start.min(start);
        self.end = self.end.max(end);
    }
}

#[derive(Debug, Clone, Default)]
pub struct SparseImage {
    /// Address → byte mapping
    buffer: BTreeMap<usize, u8>,
}

impl SparseImage {
    /// Creates an empty `SparseImage`.
    ///
    /// # Examples
    /// ```
    /// use fwimagelib::SparseImage;
    ///
    /// let image = SparseImage::new();
    /// assert!(image.is_empty());
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: BTreeMap::new(),
        }
    }

    /// Builds an image from records whose `address` is absolute (S-record).
    /// Only data records contribute; later records overwrite earlier bytes.
    #[must_use]
    pub fn from_records(records: &[Record]) -> Self {
        let mut image = Self::new();
        for record in records.iter().filter(|r| r.has_data()) {
            image.insert_slice(record.address as usize, &record.payload);
        }
        image
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Store `data` starting at `address`, overwriting bytes already present.
    ///
    /// # Example
    /// ```
    /// use fwimagelib::SparseImage;
    ///
    /// let mut image = SparseImage::new();
    /// image.insert_slice(0x100, &[0xAA, 0xBB]);
    ///
    /// assert_eq!(image.get_max_addr(), Some(0x101));
    /// ```
    pub fn insert_slice(&mut self, address: usize, data: &[u8]) {
        self.buffer.extend(
            data.iter()
                .enumerate()
                .map(|(i, byte)| (address + i, *byte)),
        );
    }

    /// Get the smallest address present in the data buffer.
    #[must_use]
    pub fn get_min_addr(&self) -> Option<usize> {
        self.buffer.first_key_value().map(|(key, _)| *key)
    }

    /// Get the highest address present in the data buffer.
    #[must_use]
    pub fn get_max_addr(&self) -> Option<usize> {
        self.buffer.last_key_value().map(|(key, _)| *key)
    }

    /// Span from the lowest to the highest stored address, `None` when empty.
    #[must_use]
    pub fn range(&self) -> Option<AddressRange> {
        self.get_min_addr()
            .zip(self.get_max_addr())
            .map(|(start, end)| AddressRange::new(start, end))
    }

    /// Produce one byte per address of `range`: the stored byte, or `pad` where
    /// nothing was stored.
    ///
    /// # Example
    /// ```
    /// use fwimagelib::{AddressRange, SparseImage};
    ///
    /// let mut image = SparseImage::new();
    /// image.insert_slice(0x10, &[0x01]);
    /// image.insert_slice(0x13, &[0x04]);
    ///
    /// let bytes = image.materialize(AddressRange::new(0x10, 0x13), 0xFF);
    /// assert_eq!(bytes, vec![0x01, 0xFF, 0xFF, 0x04]);
    /// ```
    #[must_use]
    pub fn materialize(&self, range: AddressRange, pad: u8) -> Vec<u8> {
        let mut binary_data = Vec::with_capacity(range.len());
        for addr in range.start..=range.end {
            match self.buffer.get(&addr) {
                Some(byte) => binary_data.push(*byte),
                None => binary_data.push(pad),
            }
        }
        binary_data
    }
}
