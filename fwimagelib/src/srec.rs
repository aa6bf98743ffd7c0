//! The `srec` module parses Motorola S-record lines into [`Record`]s.
//!
//! Only the data records `S1`, `S2` and `S3` (16, 24 and 32-bit addresses) are
//! decoded. Header, count and termination records, as well as unknown type
//! characters, are skipped without being looked at.

use crate::error::RecordErrorKind;
use crate::record::{Record, RecordType, byte_sum, decode_hex};
use log::debug;

pub const START_CODE: u8 = b'S';

mod sizes {
    pub const COUNT: usize = 1;
    pub const CHECKSUM: usize = 1;
}

/// Ones' complement checksum over byte count, address and payload.
#[must_use]
pub fn checksum(bytes: &[u8]) -> u8 {
    !byte_sum(bytes)
}

/// Address field width in bytes for a data record type character.
const fn address_width(rtype: u8) -> Option<usize> {
    match rtype {
        b'1' => Some(2),
        b'2' => Some(3),
        b'3' => Some(4),
        _ => None,
    }
}

/// Parse one S-record line.
///
/// Returns `Ok(None)` for empty lines, lines not starting with 'S', and
/// every record type other than `S1`, `S2` and `S3`.
///
/// # Errors
/// Returns [`RecordErrorKind::RecordChecksumMismatch`] when the trailing checksum
/// disagrees with the computed one, or another [`RecordErrorKind`] for malformed lines.
///
/// # Example
/// ```
/// use fwimagelib::srec;
///
/// let record = srec::parse_line(b"S1070010DEADBEEFB0").unwrap().unwrap();
///
/// assert_eq!(record.address, 0x0010);
/// assert_eq!(record.payload, vec![0xDE, 0xAD, 0xBE, 0xEF]);
/// ```
pub fn parse_line(line: &[u8]) -> Result<Option<Record>, RecordErrorKind> {
    let line = line.trim_ascii();
    let Some(rest) = line.strip_prefix(&[START_CODE]) else {
        return Ok(None);
    };

    let Some((&rtype, digits)) = rest.split_first() else {
        return Err(RecordErrorKind::RecordTooShort);
    };
    let Some(addr_width) = address_width(rtype) else {
        debug!("skipping S{} record", char::from(rtype));
        return Ok(None);
    };

    let bytes = decode_hex(digits)?;
    if bytes.len() < sizes::COUNT + addr_width + sizes::CHECKSUM {
        return Err(RecordErrorKind::RecordTooShort);
    }

    let (body, tail) = bytes.split_at(bytes.len() - sizes::CHECKSUM);
    let found = tail[0];
    let expected = checksum(body);
    if expected != found {
        return Err(RecordErrorKind::RecordChecksumMismatch(expected, found));
    }

    if usize::from(body[0]) != bytes.len() - sizes::COUNT {
        return Err(RecordErrorKind::RecordInvalidPayloadLength);
    }

    let (addr_bytes, payload) = body[sizes::COUNT..].split_at(addr_width);
    let address = addr_bytes
        .iter()
        .fold(0u32, |acc, b| (acc << 8) | u32::from(*b));

    Ok(Some(Record {
        rtype: RecordType::Data,
        address,
        payload: payload.to_vec(),
        checksum: Some(found),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_checksum() {
        // Each tuple = (record line, expected checksum)
        let cases = [
            ("S1130000285F245F2212226A000424290008237C2A", 0x2A),
            ("S5030003F9", 0xF9),
            ("S9030000FC", 0xFC),
        ];

        for (line, expected_checksum) in cases {
            let bytes = decode_hex(&line.as_bytes()[2..line.len() - 2]).unwrap();
            assert_eq!(expected_checksum, checksum(&bytes));
        }
    }

    #[rstest]
    #[case("S1070010DEADBEEFB0", 0x0010)]
    #[case("S20801001001020304DC", 0x01_0010)]
    #[case("S30901001000AABBCCDDD7", 0x0100_1000)]
    fn test_parse_address_widths(#[case] line: &str, #[case] address: u32) {
        let record = parse_line(line.as_bytes()).unwrap().unwrap();

        assert_eq!(record.rtype, RecordType::Data);
        assert_eq!(record.address, address);
        assert_eq!(record.payload.len(), 4);
    }

    #[test]
    fn test_parse_s3_payload() {
        let record = parse_line(b"S30901001000AABBCCDDD7").unwrap().unwrap();

        assert_eq!(record.payload, vec![0xAA, 0xBB, 0xCC, 0xDD]);
        assert_eq!(record.checksum, Some(0xD7));
    }

    #[rstest]
    #[case("")]
    #[case("  \r")]
    #[case(":00000001FF")]
    #[case("S00F000068656C6C6F202020202000003C")]
    #[case("S5030003F9")]
    #[case("S70500000000FA")]
    #[case("S804000000FB")]
    #[case("S9030000FC")]
    // Unknown type characters are not data records either
    #[case("SX0300")]
    #[case("Sz0100")]
    fn test_parse_skipped_lines(#[case] line: &str) {
        assert_eq!(parse_line(line.as_bytes()), Ok(None));
    }

    #[test]
    fn test_parse_corrupted_checksum() {
        let res = parse_line(b"S1070010DEADBEEFB1");

        assert_eq!(res, Err(RecordErrorKind::RecordChecksumMismatch(0xB0, 0xB1)));
    }

    #[rstest]
    #[case("S", RecordErrorKind::RecordTooShort)]
    #[case("S10200FD", RecordErrorKind::RecordTooShort)]
    #[case("S1070010DEADBEEFB", RecordErrorKind::RecordNotEvenLength)]
    #[case("S1070010DEADBEEGB0", RecordErrorKind::ContainsInvalidCharacters)]
    // Byte count says 8, line carries 7 bytes (checksum still consistent)
    #[case("S1080010DEADBEEFAF", RecordErrorKind::RecordInvalidPayloadLength)]
    fn test_parse_invalid_records(#[case] line: &str, #[case] expected: RecordErrorKind) {
        assert_eq!(parse_line(line.as_bytes()), Err(expected));
    }
}
