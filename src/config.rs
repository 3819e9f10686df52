//! Global configuration for the readmemh converter
//!
//! Manages paths for the working directory and the objcopy utility, and the
//! output options chosen on the command line.
//!
// Copyright (c) 2025 Tommy Olsen
// Licensed under the MIT License.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::ConvertError;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone)]
pub struct Config {
    pub work_path: PathBuf,
    pub util_path: PathBuf,
    /// Explicit objcopy executable, tried before any lookup
    pub objcopy_path: Option<PathBuf>,
}

impl Config {
    pub fn new(work_path: impl AsRef<Path>, util_path: impl AsRef<Path>) -> Self {
        Self {
            work_path: work_path.as_ref().to_path_buf(),
            util_path: util_path.as_ref().to_path_buf(),
            objcopy_path: None,
        }
    }

    pub fn with_objcopy(mut self, objcopy_path: impl AsRef<Path>) -> Self {
        self.objcopy_path = Some(objcopy_path.as_ref().to_path_buf());
        self
    }

    /// Create a Config with automatically determined paths
    ///
    /// - work_path: Creates a unique temp directory in the system temp folder
    /// - util_path: Uses the "util" directory next to the executable
    pub fn auto() -> Result<Self, ConvertError> {
        let work_path = Self::create_temp_work_dir()?;
        let util_path = Self::get_util_path()?;

        Ok(Self::new(work_path, util_path))
    }

    /// Create a unique temporary work directory
    fn create_temp_work_dir() -> Result<PathBuf, ConvertError> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();

        let work_dir = std::env::temp_dir()
            .join(format!("Elf2Readmemh.{}.{}", std::process::id(), timestamp));

        std::fs::create_dir_all(&work_dir).map_err(|e| ConvertError::io(&work_dir, e))?;

        Ok(work_dir)
    }

    /// Get the util directory path (next to executable)
    fn get_util_path() -> Result<PathBuf, ConvertError> {
        let exe_path = std::env::current_exe()?;

        let exe_dir = exe_path.parent().unwrap_or_else(|| Path::new("."));

        Ok(exe_dir.join("util"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::auto().unwrap_or_else(|_| {
            // Fallback to current directory if auto fails
            Self::new(
                std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
                PathBuf::from("util"),
            )
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Endianness {
    #[default]
    Big,
    Little,
}

impl Endianness {
    /// Tag used in default output file names
    pub fn file_tag(&self) -> &'static str {
        match self {
            Endianness::Big => "bigendian",
            Endianness::Little => "littleendian",
        }
    }
}

/// How little-endian output is laid out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LittleEndianLayout {
    /// One byte per line in address order, identical to big-endian output
    #[default]
    ByteStream,
    /// Reverse each complete 4-byte group within a run
    SwapWords,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputOptions {
    pub endianness: Endianness,
    pub little_endian_layout: LittleEndianLayout,
    pub remap_to_zero: bool,
}

impl OutputOptions {
    pub fn swaps_words(&self) -> bool {
        self.endianness == Endianness::Little
            && self.little_endian_layout == LittleEndianLayout::SwapWords
    }
}
