//! The `convert` module drives a full conversion: read the record file, parse it
//! line by line, reconstruct the flat image and write it out as a raw binary.
//!
//! Lines failing their checksum are dropped and reported through
//! [`Conversion::skipped`]; any other malformed line aborts the conversion.

use crate::error::{ImageError, RecordErrorKind};
use crate::image::{AddressRange, SparseImage};
use crate::record::{Record, RecordType};
use crate::{ihex, srec};
use log::{debug, info, warn};
use std::io::Write;
use std::path::Path;

pub const DEFAULT_PAD_BYTE: u8 = 0xFF;
pub const DEFAULT_SIZE_LIMIT: usize = 512 * 1024 * 1024;

/// Knobs shared by both converters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Byte written to addresses inside the image span that no record covers
    pub pad: u8,
    /// Compare Intel HEX checksums (S-record checksums are always compared)
    pub verify_checksums: bool,
    /// Largest image (in bytes) that will be allocated, `None` for no limit
    pub size_limit: Option<usize>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ConvertOptions {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pad: DEFAULT_PAD_BYTE,
            verify_checksums: false,
            size_limit: Some(DEFAULT_SIZE_LIMIT),
        }
    }

    #[must_use]
    pub const fn with_pad(mut self, pad: u8) -> Self {
        self.pad = pad;
        self
    }

    #[must_use]
    pub const fn with_checksum_verification(mut self, verify: bool) -> Self {
        self.verify_checksums = verify;
        self
    }

    #[must_use]
    pub const fn with_size_limit(mut self, limit: Option<usize>) -> Self {
        self.size_limit = limit;
        self
    }

    fn check_size(&self, range: AddressRange) -> Result<(), ImageError> {
        match self.size_limit {
            Some(limit) if range.len() > limit => Err(ImageError::ImageTooLarge(range.len())),
            _ => Ok(()),
        }
    }
}

/// A line dropped because its checksum did not match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number in the input
    pub line_number: usize,
    /// Line text, trimmed
    pub line: String,
    pub expected: u8,
    pub found: u8,
}

/// Outcome of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// Address span covered by `image`
    pub range: AddressRange,
    /// Number of data records parsed (bad-checksum lines excluded)
    pub data_records: usize,
    pub skipped: Vec<SkippedLine>,
    /// Reconstructed flat image, `range.len()` bytes long
    pub image: Vec<u8>,
}

/// Split `raw` into lines and run `parse` on each, collecting records.
/// Checksum failures are logged and recorded, every other error aborts.
fn parse_records<F>(
    raw: &[u8],
    mut parse: F,
) -> Result<(Vec<Record>, Vec<SkippedLine>), ImageError>
where
    F: FnMut(&[u8]) -> Result<Option<Record>, RecordErrorKind>,
{
    let mut records = Vec::new();
    let mut skipped = Vec::new();

    for (idx, line) in raw.split(|&b| b == b'\n').enumerate() {
        let line_number = idx + 1;
        match parse(line) {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {}
            Err(RecordErrorKind::RecordChecksumMismatch(expected, found)) => {
                let text = String::from_utf8_lossy(line.trim_ascii()).into_owned();
                warn!("Checksum error in line: {text}");
                skipped.push(SkippedLine {
                    line_number,
                    line: text,
                    expected,
                    found,
                });
            }
            Err(kind) => return Err(ImageError::ParseRecordError(kind, line_number)),
        }
    }

    Ok((records, skipped))
}

fn count_data(records: &[Record]) -> usize {
    records
        .iter()
        .filter(|r| r.rtype == RecordType::Data)
        .count()
}

/// Reconstruct a flat image from Intel HEX text.
///
/// # Errors
/// - [`ImageError::ParseRecordError`] for a malformed line
/// - [`ImageError::EmptyInput`] if no data record carries bytes
/// - [`ImageError::ImageTooLarge`] if the span exceeds the size limit
///
/// # Example
/// ```
/// use fwimagelib::{ConvertOptions, hex_to_image};
///
/// let hex = b":0100000011EE\n:0100030044B8\n:00000001FF\n";
/// let conv = hex_to_image(hex, &ConvertOptions::default()).unwrap();
///
/// assert_eq!(conv.image, vec![0x11, 0xFF, 0xFF, 0x44]);
/// ```
pub fn hex_to_image(raw: &[u8], options: &ConvertOptions) -> Result<Conversion, ImageError> {
    let verify = options.verify_checksums;
    let (records, skipped) = parse_records(raw, |line| ihex::parse_line(line, verify))?;

    let range = ihex::scan_range(&records).ok_or(ImageError::EmptyInput)?;
    debug!(
        "address range 0x{:08X} - 0x{:08X} ({} bytes)",
        range.start,
        range.end,
        range.len()
    );
    options.check_size(range)?;

    let image = ihex::fill(&records, range, options.pad);

    Ok(Conversion {
        range,
        data_records: count_data(&records),
        skipped,
        image,
    })
}

/// Reconstruct a flat image from Motorola S-record text.
///
/// # Errors
/// Same as [`hex_to_image`]. Lines with a bad checksum are skipped, not errors.
///
/// # Example
/// ```
/// use fwimagelib::{ConvertOptions, srec_to_image};
///
/// let mot = b"S00600004844521B\nS1070010DEADBEEFB0\nS9030000FC\n";
/// let conv = srec_to_image(mot, &ConvertOptions::default()).unwrap();
///
/// assert_eq!(conv.range.start, 0x10);
/// assert_eq!(conv.image, vec![0xDE, 0xAD, 0xBE, 0xEF]);
/// ```
pub fn srec_to_image(raw: &[u8], options: &ConvertOptions) -> Result<Conversion, ImageError> {
    let (records, skipped) = parse_records(raw, srec::parse_line)?;

    let sparse = SparseImage::from_records(&records);
    let range = sparse.range().ok_or(ImageError::EmptyInput)?;
    debug!(
        "address range 0x{:08X} - 0x{:08X} ({} bytes)",
        range.start,
        range.end,
        range.len()
    );
    options.check_size(range)?;

    let image = sparse.materialize(range, options.pad);

    Ok(Conversion {
        range,
        data_records: count_data(&records),
        skipped,
        image,
    })
}

fn read_input(path: &Path) -> Result<Vec<u8>, ImageError> {
    std::fs::read(path).map_err(|e| ImageError::from_read(path.to_path_buf(), &e))
}

/// Write `data` to `filepath` as a raw binary, creating parent directories.
///
/// # Errors
/// Returns [`ImageError::FileNotWritable`] if the file cannot be created or written.
pub fn write_bin<P: AsRef<Path>>(filepath: P, data: &[u8]) -> Result<(), ImageError> {
    let path = filepath.as_ref();
    let not_writable = |e: std::io::Error| ImageError::FileNotWritable(path.to_path_buf(), e.kind());

    // Ensure the parent directory exists
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(not_writable)?;
    }

    let file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(not_writable)?;

    let mut writer = std::io::BufWriter::new(file);
    writer.write_all(data).map_err(not_writable)?;
    writer.flush().map_err(not_writable)?;

    Ok(())
}

fn convert_file<F>(
    in_path: &Path,
    out_path: &Path,
    options: &ConvertOptions,
    to_image: F,
) -> Result<Conversion, ImageError>
where
    F: FnOnce(&[u8], &ConvertOptions) -> Result<Conversion, ImageError>,
{
    let raw = read_input(in_path)?;
    let conversion = to_image(&raw, options)?;
    write_bin(out_path, &conversion.image)?;

    info!(
        "{} -> {}: {} data records, {} skipped, 0x{:08X} - 0x{:08X} ({} bytes)",
        in_path.display(),
        out_path.display(),
        conversion.data_records,
        conversion.skipped.len(),
        conversion.range.start,
        conversion.range.end,
        conversion.image.len()
    );
    Ok(conversion)
}

/// Convert an Intel HEX file into a raw binary file.
///
/// Nothing is written unless the input was read and reconstructed successfully.
///
/// # Errors
/// [`ImageError::FileNotFound`] if `hex_file` does not exist, otherwise see
/// [`hex_to_image`] and [`write_bin`].
pub fn hex_to_bin<P: AsRef<Path>, Q: AsRef<Path>>(
    hex_file: P,
    bin_file: Q,
    options: &ConvertOptions,
) -> Result<Conversion, ImageError> {
    convert_file(hex_file.as_ref(), bin_file.as_ref(), options, hex_to_image)
}

/// Convert a Motorola S-record file into a raw binary file.
///
/// # Errors
/// [`ImageError::FileNotFound`] if `mot_file` does not exist, otherwise see
/// [`srec_to_image`] and [`write_bin`].
pub fn mot_to_bin<P: AsRef<Path>, Q: AsRef<Path>>(
    mot_file: P,
    bin_file: Q,
    options: &ConvertOptions,
) -> Result<Conversion, ImageError> {
    convert_file(mot_file.as_ref(), bin_file.as_ref(), options, srec_to_image)
}
