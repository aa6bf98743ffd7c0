//! # `fwimagelib`
//!
//! `fwimagelib` is a Rust library for turning line-oriented firmware record files
//! (Intel HEX and Motorola S-record) into flat raw binary images.
//!
//! The library provides:
//! - Line parsers for both formats (modules [`ihex`] and [`srec`]).
//! - Image reconstruction over the minimal address span touched by data records,
//!   with a configurable pad byte for the gaps ([`hex_to_image`], [`srec_to_image`]).
//! - File level converters ([`hex_to_bin`], [`mot_to_bin`]).
//! - Error handling with [`ImageError`].
//!
//! ## Example
//!
//! ```
//! use fwimagelib::{ConvertOptions, hex_to_image};
//!
//! let hex = b":10000000112233445566778899AABBCCDDEEFF1B\n:00000001FF\n";
//! let conv = hex_to_image(hex, &ConvertOptions::default()).unwrap();
//!
//! assert_eq!(conv.image.len(), 16);
//! assert_eq!((conv.range.start, conv.range.end), (0, 15));
//! ```

mod convert;
mod error;
pub mod ihex;
mod image;
mod literal;
mod record;
pub mod srec;

// Public APIs
pub use convert::{
    Conversion, ConvertOptions, DEFAULT_PAD_BYTE, DEFAULT_SIZE_LIMIT, SkippedLine, hex_to_bin,
    hex_to_image, mot_to_bin, srec_to_image, write_bin,
};
pub use error::{ImageError, RecordErrorKind};
pub use image::{AddressRange, SparseImage};
pub use literal::{LiteralError, parse_byte_count, parse_int_literal, parse_pad_byte};
pub use record::{Record, RecordType};
