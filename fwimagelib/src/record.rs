//! The `record` module defines the format-independent [`Record`] and [`RecordType`]
//! produced by the Intel HEX ([`crate::ihex`]) and Motorola S-record ([`crate::srec`])
//! line parsers, together with the hex digit decoding both formats share.

use crate::error::RecordErrorKind;

pub(crate) const BYTE_CHAR_LEN: usize = 2;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RecordType {
    /// Payload bytes placed at the record's address
    Data,
    /// Bank-select record, sets bits 16..32 of the base address
    ExtendedLinearAddress,
    /// End of file marker
    EndOfFile,
    /// Any other record type number. Recognised, but never touches the image.
    Other(u8),
}

/// One parsed line of a firmware record file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub rtype: RecordType,
    /// Address field as found in the record. For Intel HEX this is the 16-bit
    /// offset within the current bank, for S-record the absolute address.
    pub address: u32,
    pub payload: Vec<u8>,
    /// Trailing checksum byte, `None` if the line left it out
    pub checksum: Option<u8>,
}

impl Record {
    /// Returns `true` for data records carrying at least one byte.
    #[must_use]
    pub fn has_data(&self) -> bool {
        self.rtype == RecordType::Data && !self.payload.is_empty()
    }
}

#[allow(clippy::cast_possible_truncation)]
fn hex_value(digit: u8) -> u8 {
    // Digits are validated before decoding
    char::from(digit).to_digit(16).unwrap_or(0) as u8
}

/// Decode a run of ASCII hex digit pairs into bytes.
pub(crate) fn decode_hex(digits: &[u8]) -> Result<Vec<u8>, RecordErrorKind> {
    if !digits.iter().all(u8::is_ascii_hexdigit) {
        return Err(RecordErrorKind::ContainsInvalidCharacters);
    }
    if digits.len() % BYTE_CHAR_LEN != 0 {
        return Err(RecordErrorKind::RecordNotEvenLength);
    }

    Ok(digits
        .chunks_exact(BYTE_CHAR_LEN)
        .map(|pair| (hex_value(pair[0]) << 4) | hex_value(pair[1]))
        .collect())
}

/// Wrapping sum of all bytes.
pub(crate) fn byte_sum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |sum, b| sum.wrapping_add(*b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(b"", vec![])]
    #[case(b"00", vec![0x00])]
    #[case(b"FF10ab", vec![0xFF, 0x10, 0xAB])]
    #[case(b"7f7F", vec![0x7F, 0x7F])]
    fn test_decode_hex_valid(#[case] digits: &[u8], #[case] expected: Vec<u8>) {
        assert_eq!(decode_hex(digits), Ok(expected));
    }

    #[rstest]
    #[case(b"0Z", RecordErrorKind::ContainsInvalidCharacters)]
    #[case(b"00 11", RecordErrorKind::ContainsInvalidCharacters)]
    #[case(b"001", RecordErrorKind::RecordNotEvenLength)]
    fn test_decode_hex_invalid(#[case] digits: &[u8], #[case] expected: RecordErrorKind) {
        assert_eq!(decode_hex(digits), Err(expected));
    }

    #[test]
    fn test_byte_sum_wraps() {
        assert_eq!(byte_sum(&[0xFF, 0x02]), 0x01);
        assert_eq!(byte_sum(&[]), 0x00);
    }

    #[test]
    fn test_has_data() {
        let mut record = Record {
            rtype: RecordType::Data,
            address: 0,
            payload: vec![],
            checksum: None,
        };
        assert!(!record.has_data());

        record.payload.push(0xAA);
        assert!(record.has_data());

        record.rtype = RecordType::EndOfFile;
        assert!(!record.has_data());
    }
}
