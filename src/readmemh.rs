//! Verilog readmemh writer
//!
//! Emits an `@0xAAAAAAAA` header for every contiguous run followed by one
//! upper-case byte per line.
//!
// Copyright (c) 2025 Tommy Olsen
// Licensed under the MIT License.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::config::OutputOptions;
use crate::error::ConvertError;
use crate::image::{ImageSummary, MemoryImage, Run};

const WORD_SIZE: usize = 4;

pub struct ReadmemhWriter {
    options: OutputOptions,
}

impl ReadmemhWriter {
    pub fn new(options: OutputOptions) -> Self {
        Self { options }
    }

    /// Write the image to `sink`, returning the address range and byte count
    pub fn write<W: Write>(&self, image: &MemoryImage, mut sink: W) -> Result<ImageSummary, ConvertError> {
        let summary = image.summary()?;

        for run in image.runs() {
            writeln!(sink, "@0x{:08X}", run.start)?;
            for byte in self.ordered_bytes(&run) {
                writeln!(sink, "{:02X}", byte)?;
            }
        }
        sink.flush()?;

        Ok(summary)
    }

    pub fn render(&self, image: &MemoryImage) -> Result<String, ConvertError> {
        let mut out: Vec<u8> = Vec::new();
        self.write(image, &mut out)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    /// Create (or truncate) `path` and write the image into it
    pub fn write_file(&self, image: &MemoryImage, path: &Path) -> Result<ImageSummary, ConvertError> {
        // Refuse before touching the file system
        image.summary()?;

        let file = File::create(path).map_err(|e| ConvertError::io(path, e))?;
        self.write(image, BufWriter::new(file)).map_err(|e| match e {
            ConvertError::Io { path: None, source } => ConvertError::io(path, source),
            other => other,
        })
    }

    fn ordered_bytes(&self, run: &Run) -> Vec<u8> {
        if !self.options.swaps_words() {
            return run.bytes.clone();
        }

        run.bytes
            .chunks(WORD_SIZE)
            .flat_map(|chunk| {
                let mut word = chunk.to_vec();
                if word.len() == WORD_SIZE {
                    word.reverse();
                }
                word
            })
            .collect()
    }
}
