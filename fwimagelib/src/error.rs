//! The `error` module defines the [`ImageError`] enum that describes the errors that
//! can occur when reading, parsing, or writing firmware images.
//! It carries up to three pieces of information:
//! 1. When the error occurs, e.g., while reading the input or parsing a record.
//! 2. What kind of record error was encountered (via [`RecordErrorKind`]).
//! 3. What the line number is (if applicable), i.e., at which line the parsing failed.

use crate::record::RecordType;
use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

#[derive(Debug, PartialEq, Eq)]
pub enum ImageError {
    /// Input file does not exist
    FileNotFound(PathBuf),
    /// Input file exists but could not be read
    ReadError(PathBuf, io::ErrorKind),
    /// Output file could not be created or written
    FileNotWritable(PathBuf, io::ErrorKind),
    /// Malformed record at the given (1-based) line
    ParseRecordError(RecordErrorKind, usize),
    /// Input holds no data records
    EmptyInput,
    /// Reconstructed image would exceed the configured size limit
    ImageTooLarge(usize),
}

impl ImageError {
    pub(crate) fn from_read(path: PathBuf, err: &io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            Self::FileNotFound(path)
        } else {
            Self::ReadError(path, err.kind())
        }
    }
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileNotFound(path) => {
                write!(f, "Input file {} not found.", path.display())
            }
            Self::ReadError(path, kind) => {
                write!(f, "Failed to read input file {}: {kind}", path.display())
            }
            Self::FileNotWritable(path, kind) => {
                write!(f, "Failed to write output file {}: {kind}", path.display())
            }
            Self::ParseRecordError(base_err, line) => {
                write!(
                    f,
                    "Error encountered during record parsing at line #{line}:\n{base_err}"
                )
            }
            Self::EmptyInput => {
                write!(f, "Input contains no data records")
            }
            Self::ImageTooLarge(len) => {
                write!(
                    f,
                    "Reconstructed image of {len} bytes exceeds the configured size limit"
                )
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum RecordErrorKind {
    /// Record contains non-hexadecimal characters
    ContainsInvalidCharacters,
    /// Record has an odd number of hex digits
    RecordNotEvenLength,
    /// Record is shorter than its header requires
    RecordTooShort,
    /// Payload size differs from the record's byte count
    RecordInvalidPayloadLength,
    /// Record's payload length does not match the record type
    RecordLengthInvalidForType(RecordType, usize, usize),
    /// Record checksum mismatch (expected, found)
    RecordChecksumMismatch(u8, u8),
}

impl fmt::Display for RecordErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContainsInvalidCharacters => {
                write!(f, "Record contains invalid character(s)")
            }
            Self::RecordNotEvenLength => {
                write!(f, "Record with uneven length")
            }
            Self::RecordTooShort => {
                write!(f, "Record too short")
            }
            Self::RecordInvalidPayloadLength => {
                write!(f, "Payload (data bytes) size differs from record's length")
            }
            Self::RecordLengthInvalidForType(rtype, expected, actual) => {
                write!(
                    f,
                    "For record type {rtype:?} expected data length is {expected} bytes, found {actual}"
                )
            }
            Self::RecordChecksumMismatch(expected, actual) => {
                write!(
                    f,
                    "Invalid record checksum - expected: 0x{expected:02X}, found: 0x{actual:02X}"
                )
            }
        }
    }
}

impl Error for ImageError {}
impl Error for RecordErrorKind {}
