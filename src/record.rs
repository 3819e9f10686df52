//! Intel HEX record decoder
//!
//! Decodes one record line (`:llaaaatt[dd...]cc`) into a `Record`.
//! The checksum is accepted but never validated.
//!
// Copyright (c) 2025 Tommy Olsen
// Licensed under the MIT License.

use crate::error::RecordError;

pub const RECORD_MARKER: char = ':';
pub const COMMENT_MARKER: char = ';';

pub const TYPE_DATA: u8 = 0x00;
pub const TYPE_END_OF_FILE: u8 = 0x01;
pub const TYPE_EXTENDED_LINEAR_ADDRESS: u8 = 0x04;
pub const TYPE_START_LINEAR_ADDRESS: u8 = 0x05;

/// Length + offset + type
const HEADER_LEN: usize = 8;
const CHECKSUM_LEN: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordKind {
    Data(Vec<u8>),
    EndOfFile,
    /// Upper 16 address bits; `None` when the record is malformed and must be ignored
    ExtendedLinearAddress(Option<u16>),
    /// Program entry point; `None` when the record is malformed
    StartLinearAddress(Option<u32>),
    Other(u8),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub byte_count: u8,
    pub offset: u16,
    pub kind: RecordKind,
}

impl Record {
    /// Decode the text following the ':' marker
    pub fn decode(body: &str) -> Result<Self, RecordError> {
        let raw = body.as_bytes();
        if raw.len() < HEADER_LEN {
            return Err(RecordError::Truncated { len: raw.len() });
        }

        let byte_count = hex_u8(&raw[0..2], "byte count")?;
        let offset = hex_u16(&raw[2..6], "address")?;
        let record_type = hex_u8(&raw[6..8], "record type")?;

        let kind = match record_type {
            TYPE_DATA => RecordKind::Data(decode_payload(raw, byte_count)?),
            TYPE_END_OF_FILE => RecordKind::EndOfFile,
            TYPE_EXTENDED_LINEAR_ADDRESS => {
                let high = if byte_count == 2 && raw.len() >= HEADER_LEN + 4 {
                    Some(hex_u16(&raw[8..12], "extended linear address")?)
                } else {
                    None
                };
                RecordKind::ExtendedLinearAddress(high)
            }
            TYPE_START_LINEAR_ADDRESS => {
                let start = if byte_count == 4 && raw.len() >= HEADER_LEN + 8 {
                    Some(hex_u32(&raw[8..16], "start linear address")?)
                } else {
                    None
                };
                RecordKind::StartLinearAddress(start)
            }
            other => RecordKind::Other(other),
        };

        Ok(Record {
            byte_count,
            offset,
            kind,
        })
    }
}

/// Read up to `byte_count` bytes, never touching the trailing checksum
fn decode_payload(raw: &[u8], byte_count: u8) -> Result<Vec<u8>, RecordError> {
    let limit = raw.len().saturating_sub(CHECKSUM_LEN);
    let mut data = Vec::with_capacity(byte_count as usize);

    for i in 0..byte_count as usize {
        let start = HEADER_LEN + i * 2;
        if start + 2 > limit {
            break;
        }
        data.push(hex_u8(&raw[start..start + 2], "data")?);
    }

    Ok(data)
}

/* ======================= Hex helpers ======================= */

fn hex_digits(digits: &[u8], field: &'static str) -> Result<u32, RecordError> {
    digits.iter().try_fold(0u32, |acc, &c| {
        let nibble = (c as char)
            .to_digit(16)
            .ok_or(RecordError::InvalidHex { field })?;
        Ok((acc << 4) | nibble)
    })
}

fn hex_u8(digits: &[u8], field: &'static str) -> Result<u8, RecordError> {
    hex_digits(digits, field).map(|v| v as u8)
}

fn hex_u16(digits: &[u8], field: &'static str) -> Result<u16, RecordError> {
    hex_digits(digits, field).map(|v| v as u16)
}

fn hex_u32(digits: &[u8], field: &'static str) -> Result<u32, RecordError> {
    hex_digits(digits, field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_data_record() {
        let rec = Record::decode("0300300002337A1E").unwrap();
        assert_eq!(rec.byte_count, 3);
        assert_eq!(rec.offset, 0x0030);
        assert_eq!(rec.kind, RecordKind::Data(vec![0x02, 0x33, 0x7A]));
    }

    #[test]
    fn test_checksum_never_read_as_data() {
        // Claims 4 bytes but only 2 plus the checksum are present
        let rec = Record::decode("040000001122CC").unwrap();
        assert_eq!(rec.kind, RecordKind::Data(vec![0x11, 0x22]));
    }

    #[test]
    fn test_lowercase_hex_accepted() {
        let rec = Record::decode("01ab1000ff45").unwrap();
        assert_eq!(rec.offset, 0xAB10);
        assert_eq!(rec.kind, RecordKind::Data(vec![0xFF]));
    }

    #[test]
    fn test_truncated() {
        assert_eq!(
            Record::decode("0200000"),
            Err(RecordError::Truncated { len: 7 })
        );
    }

    #[test]
    fn test_invalid_hex_in_header_and_data() {
        assert_eq!(
            Record::decode("0Z00000000"),
            Err(RecordError::InvalidHex { field: "byte count" })
        );
        assert_eq!(
            Record::decode("0200000011G2FF"),
            Err(RecordError::InvalidHex { field: "data" })
        );
        // A sign is not a hex digit
        assert!(Record::decode("+1000000AA55").is_err());
    }

    #[test]
    fn test_non_ascii_does_not_panic() {
        assert!(Record::decode("0100é000AA55").is_err());
    }

    #[test]
    fn test_extended_linear_address() {
        let rec = Record::decode("020000040800F2").unwrap();
        assert_eq!(rec.kind, RecordKind::ExtendedLinearAddress(Some(0x0800)));

        // Wrong byte count is malformed and carries no payload
        let rec = Record::decode("040000040800000000").unwrap();
        assert_eq!(rec.kind, RecordKind::ExtendedLinearAddress(None));

        // Too short to hold the payload
        let rec = Record::decode("0200000408").unwrap();
        assert_eq!(rec.kind, RecordKind::ExtendedLinearAddress(None));
    }

    #[test]
    fn test_start_linear_address() {
        let rec = Record::decode("0400000580000000F7").unwrap();
        assert_eq!(rec.kind, RecordKind::StartLinearAddress(Some(0x8000_0000)));

        let rec = Record::decode("02000005800077").unwrap();
        assert_eq!(rec.kind, RecordKind::StartLinearAddress(None));
    }

    #[test]
    fn test_end_of_file_and_other() {
        assert_eq!(Record::decode("00000001FF").unwrap().kind, RecordKind::EndOfFile);
        assert_eq!(
            Record::decode("0400000300003800C1").unwrap().kind,
            RecordKind::Other(0x03)
        );
    }
}
