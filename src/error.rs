//! Error types for the ELF to readmemh converter
//!
//! `ConvertError` is terminal for a conversion. `RecordError` describes a single
//! bad record line; the parser recovers from those and keeps going.
//!
// Copyright (c) 2025 Tommy Olsen
// Licensed under the MIT License.

use std::fmt;
use std::io;
use std::path::PathBuf;

#[derive(Debug)]
pub enum ConvertError {
    InputNotFound(PathBuf),
    TranslationFailed(String),
    EmptyImage,
    Io {
        path: Option<PathBuf>,
        source: io::Error,
    },
}

impl ConvertError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ConvertError::Io {
            path: Some(path.into()),
            source,
        }
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::InputNotFound(path) => {
                write!(f, "Input file not found: {}", path.display())
            }
            ConvertError::TranslationFailed(msg) => write!(f, "ELF translation failed: {}", msg),
            ConvertError::EmptyImage => write!(f, "No valid data records found"),
            ConvertError::Io { path: Some(path), source } => {
                write!(f, "I/O error on {}: {}", path.display(), source)
            }
            ConvertError::Io { path: None, source } => write!(f, "I/O error: {}", source),
        }
    }
}

impl std::error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConvertError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for ConvertError {
    fn from(e: io::Error) -> Self {
        ConvertError::Io { path: None, source: e }
    }
}

/// Why a single record line was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// Fewer than 8 characters after the ':' marker
    Truncated { len: usize },
    InvalidHex { field: &'static str },
    UnsupportedType(u8),
    AddressOverflow { base: u32, offset: u16 },
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::Truncated { len } => {
                write!(f, "record too short ({} characters, need at least 8)", len)
            }
            RecordError::InvalidHex { field } => write!(f, "invalid hex digits in {}", field),
            RecordError::UnsupportedType(t) => write!(f, "unsupported record type 0x{:02X}", t),
            RecordError::AddressOverflow { base, offset } => write!(
                f,
                "address overflows 32 bits (base 0x{:08X} + offset 0x{:04X})",
                base, offset
            ),
        }
    }
}

impl std::error::Error for RecordError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_names_path() {
        let err = ConvertError::io(
            "out/image.txt",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("out/image.txt"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_record_error_messages() {
        assert_eq!(
            RecordError::UnsupportedType(0x03).to_string(),
            "unsupported record type 0x03"
        );
        assert!(RecordError::Truncated { len: 5 }.to_string().contains("5 characters"));
    }
}
