//! The `ihex` module parses Intel HEX lines into [`Record`]s and reconstructs a flat
//! image from them in two passes: [`scan_range`] discovers the address span touched by
//! data records, [`fill`] writes the payloads into a pad-filled buffer of that span.

use crate::error::RecordErrorKind;
use crate::image::AddressRange;
use crate::record::{Record, RecordType, byte_sum, decode_hex};
use log::debug;

pub const START_CODE: u8 = b':';

mod sizes {
    pub const HEADER: usize = 1 + 2 + 1; // len + addr + rtype
    pub const CHECKSUM: usize = 1;
    pub const ELA_PAYLOAD: usize = 2;
}

/// Two's complement checksum over the record bytes (without the checksum byte).
#[must_use]
pub fn checksum(bytes: &[u8]) -> u8 {
    (!byte_sum(bytes)).wrapping_add(1)
}

/// Parse one Intel HEX line.
///
/// Returns `Ok(None)` for lines that are empty or do not start with ':'.
/// The checksum byte is only compared when `verify_checksum` is set; otherwise it
/// may also be left out.
///
/// # Errors
/// Returns a [`RecordErrorKind`] if the line is malformed or, with verification
/// enabled, if the checksum does not match.
///
/// # Example
/// ```
/// use fwimagelib::ihex;
/// use fwimagelib::RecordType;
///
/// let record = ihex::parse_line(b":0400100001020304E2", true).unwrap().unwrap();
///
/// assert_eq!(record.rtype, RecordType::Data);
/// assert_eq!(record.address, 0x0010);
/// assert_eq!(record.payload, vec![1, 2, 3, 4]);
/// ```
pub fn parse_line(line: &[u8], verify_checksum: bool) -> Result<Option<Record>, RecordErrorKind> {
    let line = line.trim_ascii();
    let Some(digits) = line.strip_prefix(&[START_CODE]) else {
        return Ok(None);
    };

    let bytes = decode_hex(digits)?;
    if bytes.len() < sizes::HEADER {
        return Err(RecordErrorKind::RecordTooShort);
    }

    // Without verification a missing trailing checksum byte is tolerated
    let body_len = sizes::HEADER + bytes[0] as usize;
    let has_checksum = match bytes.len() {
        n if n == body_len + sizes::CHECKSUM => true,
        n if n == body_len && !verify_checksum => false,
        _ => return Err(RecordErrorKind::RecordInvalidPayloadLength),
    };

    let (body, tail) = bytes.split_at(body_len);
    let found = has_checksum.then(|| tail[0]);
    if verify_checksum && let Some(found) = found {
        let expected = checksum(body);
        if expected != found {
            return Err(RecordErrorKind::RecordChecksumMismatch(expected, found));
        }
    }

    let rtype = match body[3] {
        0x00 => RecordType::Data,
        0x01 => RecordType::EndOfFile,
        0x04 => RecordType::ExtendedLinearAddress,
        other => RecordType::Other(other),
    };

    let payload = body[sizes::HEADER..].to_vec();
    if rtype == RecordType::ExtendedLinearAddress && payload.len() != sizes::ELA_PAYLOAD {
        return Err(RecordErrorKind::RecordLengthInvalidForType(
            rtype,
            sizes::ELA_PAYLOAD,
            payload.len(),
        ));
    }

    Ok(Some(Record {
        rtype,
        address: u32::from(u16::from_be_bytes([body[1], body[2]])),
        payload,
        checksum: found,
    }))
}

/// Base address selected by an Extended Linear Address record, `None` unless the
/// payload holds exactly two bytes.
fn linear_base(record: &Record) -> Option<usize> {
    match record.payload.as_slice() {
        &[hi, lo] => Some((usize::from(hi) << 24) | (usize::from(lo) << 16)),
        _ => None,
    }
}

/// Walk the records, tracking the bank base address, and yield every data payload
/// together with its absolute start address.
fn placed_payloads(records: &[Record]) -> impl Iterator<Item = (usize, &[u8])> {
    records
        .iter()
        .scan(0usize, |base_address, record| {
            match record.rtype {
                RecordType::ExtendedLinearAddress => match linear_base(record) {
                    Some(base) => {
                        *base_address = base;
                        debug!("bank switch, base address = 0x{base:08X}");
                    }
                    None => debug!(
                        "ignoring extended linear address record with {} byte payload",
                        record.payload.len()
                    ),
                },
                RecordType::Data => {
                    return Some(Some((
                        *base_address + record.address as usize,
                        record.payload.as_slice(),
                    )));
                }
                RecordType::EndOfFile | RecordType::Other(_) => {}
            }
            Some(None)
        })
        .flatten()
}

/// First pass: find the inclusive address span covered by non-empty data records.
/// Returns `None` if there are none.
#[must_use]
pub fn scan_range(records: &[Record]) -> Option<AddressRange> {
    let mut range: Option<AddressRange> = None;

    for (addr, payload) in placed_payloads(records) {
        if payload.is_empty() {
            continue;
        }
        let end = addr + payload.len() - 1;
        match range.as_mut() {
            Some(r) => r.include(addr, end),
            None => range = Some(AddressRange::new(addr, end)),
        }
    }

    range
}

/// Second pass: allocate `range.len()` pad bytes and copy every data payload into
/// place. Later records overwrite earlier ones.
#[must_use]
pub fn fill(records: &[Record], range: AddressRange, pad: u8) -> Vec<u8> {
    let mut memory = vec![pad; range.len()];

    for (addr, payload) in placed_payloads(records) {
        if payload.is_empty() {
            continue;
        }
        let end = addr + payload.len() - 1;
        if !range.contains(addr) || !range.contains(end) {
            continue;
        }
        let offset = addr - range.start;
        memory[offset..offset + payload.len()].copy_from_slice(payload);
    }

    memory
}
