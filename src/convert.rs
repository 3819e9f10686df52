//! Conversion pipeline
//!
//! ELF -> Intel HEX (via objcopy) -> sparse image -> optional remap -> readmemh.
//!
// Copyright (c) 2025 Tommy Olsen
// Licensed under the MIT License.

use std::path::{Path, PathBuf};

use crate::config::{Config, Endianness, OutputOptions};
use crate::error::ConvertError;
use crate::image::ImageSummary;
use crate::objcopy::{Objcopy, TempFile};
use crate::parser::{ParseWarning, RecordParser};
use crate::readmemh::ReadmemhWriter;

/// What a finished conversion produced
#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub output_path: PathBuf,
    pub summary: ImageSummary,
    pub warnings: Vec<ParseWarning>,
    pub start_address: Option<u32>,
}

pub struct Converter {
    config: Config,
    options: OutputOptions,
}

impl Converter {
    /// Create a new converter with the given configuration
    pub fn new(config: Config, options: OutputOptions) -> Self {
        Self { config, options }
    }

    /// Convert a linked ELF file, going through a temporary Intel HEX file
    ///
    /// The temporary file is removed whether or not the conversion succeeds.
    pub fn convert_elf(&self, elf_path: &Path, output_path: Option<&Path>) -> Result<ConversionReport, ConvertError> {
        let output_path = self.resolve_output(elf_path, output_path);

        let temp_hex = TempFile::new(
            self.config
                .work_path
                .join(format!("temp_{}.hex", file_stem(elf_path))),
        );

        Objcopy::new(&self.config).elf_to_hex(elf_path, temp_hex.path())?;

        self.hex_to_readmemh(temp_hex.path(), &output_path)
    }

    /// Convert an existing Intel HEX file
    pub fn convert_hex(&self, hex_path: &Path, output_path: Option<&Path>) -> Result<ConversionReport, ConvertError> {
        let output_path = self.resolve_output(hex_path, output_path);
        self.hex_to_readmemh(hex_path, &output_path)
    }

    pub fn hex_to_readmemh(&self, hex_path: &Path, output_path: &Path) -> Result<ConversionReport, ConvertError> {
        log::info!(
            "Converting {} -> {} ({}{})",
            hex_path.display(),
            output_path.display(),
            self.options.endianness.file_tag(),
            if self.options.remap_to_zero { ", remapped to 0x00000000" } else { "" }
        );

        let parsed = RecordParser::parse_file(hex_path)?;

        let image = if self.options.remap_to_zero {
            parsed.image.remap_to_zero()?
        } else {
            parsed.image
        };

        let summary = ReadmemhWriter::new(self.options).write_file(&image, output_path)?;

        log::info!("Address range: 0x{:08X} - 0x{:08X}", summary.lowest, summary.highest);
        log::info!("Total bytes: {}", summary.byte_count);

        Ok(ConversionReport {
            output_path: output_path.to_path_buf(),
            summary,
            warnings: parsed.warnings,
            start_address: parsed.start_address,
        })
    }

    fn resolve_output(&self, input_path: &Path, output_path: Option<&Path>) -> PathBuf {
        output_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| default_output_name(input_path, self.options.endianness))
    }
}

/// `<stem>_<bigendian|littleendian>_readmemh.txt` in the current directory
pub fn default_output_name(input_path: &Path, endianness: Endianness) -> PathBuf {
    PathBuf::from(format!(
        "{}_{}_readmemh.txt",
        file_stem(input_path),
        endianness.file_tag()
    ))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string())
}
