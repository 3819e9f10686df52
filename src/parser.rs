//! Intel HEX parser
//!
//! Folds record lines into a sparse `MemoryImage`. Bad lines are skipped and
//! reported as warnings; only an image with no data at all is an error.
//!
// Copyright (c) 2025 Tommy Olsen
// Licensed under the MIT License.

use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{ConvertError, RecordError};
use crate::image::MemoryImage;
use crate::record::{Record, RecordKind, COMMENT_MARKER, RECORD_MARKER};

/// A record line that was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    /// 1-based
    pub line_number: usize,
    pub text: String,
    pub error: RecordError,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}: {}", self.line_number, self.error, self.text)
    }
}

/// Result of one successful pass
#[derive(Debug, Clone, Default)]
pub struct ParsedImage {
    pub image: MemoryImage,
    pub warnings: Vec<ParseWarning>,
    /// From a start linear address record, informational only
    pub start_address: Option<u32>,
}

/// State for exactly one parse pass
#[derive(Debug, Default)]
pub struct RecordParser {
    base_address: u32,
    parsed: ParsedImage,
}

impl RecordParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse_str(text: &str) -> Result<ParsedImage, ConvertError> {
        Self::parse_lines(text.lines())
    }

    pub fn parse_file(path: impl AsRef<Path>) -> Result<ParsedImage, ConvertError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ConvertError::io(path, e))?;
        Self::parse_str(&text)
    }

    pub fn parse_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Result<ParsedImage, ConvertError> {
        let mut parser = Self::new();
        for (index, line) in lines.into_iter().enumerate() {
            parser.feed_line(index + 1, line);
        }
        parser.finish()
    }

    /// Process a single line of input
    pub fn feed_line(&mut self, line_number: usize, line: &str) {
        let line = line.trim();
        if line.is_empty() || line.starts_with(COMMENT_MARKER) {
            return;
        }

        let Some(body) = line.strip_prefix(RECORD_MARKER) else {
            log::debug!(target: "records", "line {}: not a record, skipped", line_number);
            return;
        };

        if let Err(error) = Record::decode(body).and_then(|record| self.apply(record)) {
            let warning = ParseWarning {
                line_number,
                text: line.to_string(),
                error,
            };
            log::warn!("{}", warning);
            self.parsed.warnings.push(warning);
        }
    }

    pub fn finish(self) -> Result<ParsedImage, ConvertError> {
        if self.parsed.image.is_empty() {
            return Err(ConvertError::EmptyImage);
        }
        Ok(self.parsed)
    }

    fn apply(&mut self, record: Record) -> Result<(), RecordError> {
        match record.kind {
            RecordKind::Data(data) => {
                let last_index = data.len().saturating_sub(1) as u32;
                let start = self
                    .base_address
                    .checked_add(record.offset as u32)
                    .filter(|start| start.checked_add(last_index).is_some())
                    .ok_or(RecordError::AddressOverflow {
                        base: self.base_address,
                        offset: record.offset,
                    })?;

                log::debug!(
                    target: "records",
                    "data: {} bytes at 0x{:08X}",
                    data.len(),
                    start
                );

                for (i, value) in data.into_iter().enumerate() {
                    self.parsed.image.insert(start + i as u32, value);
                }
            }
            RecordKind::EndOfFile => {
                log::debug!(target: "records", "end of file record");
            }
            RecordKind::ExtendedLinearAddress(Some(high)) => {
                self.base_address = (high as u32) << 16;
                log::debug!(target: "records", "base address 0x{:08X}", self.base_address);
            }
            RecordKind::ExtendedLinearAddress(None) => {
                log::debug!(target: "records", "malformed extended linear address ignored");
            }
            RecordKind::StartLinearAddress(Some(start)) => {
                log::info!("Start address: 0x{:08X}", start);
                self.parsed.start_address = Some(start);
            }
            RecordKind::StartLinearAddress(None) => {
                log::debug!(target: "records", "malformed start linear address ignored");
            }
            RecordKind::Other(record_type) => return Err(RecordError::UnsupportedType(record_type)),
        }
        Ok(())
    }
}
