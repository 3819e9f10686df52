//! Sparse memory image
//!
//! Maps absolute 32-bit addresses to the bytes explicitly written by data
//! records. A missing address is unspecified, never an implicit zero.
//!
// Copyright (c) 2025 Tommy Olsen
// Licensed under the MIT License.

use std::collections::BTreeMap;

use crate::error::ConvertError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryImage {
    bytes: BTreeMap<u32, u8>,
}

/// A maximal block of consecutive addresses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub start: u32,
    pub bytes: Vec<u8>,
}

impl Run {
    /// Address of the last byte in the run
    pub fn end(&self) -> u32 {
        self.start + (self.bytes.len() as u32).saturating_sub(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSummary {
    pub lowest: u32,
    pub highest: u32,
    pub byte_count: usize,
}

impl MemoryImage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a byte, replacing any earlier value at the same address
    pub fn insert(&mut self, address: u32, value: u8) -> Option<u8> {
        self.bytes.insert(address, value)
    }

    pub fn get(&self, address: u32) -> Option<u8> {
        self.bytes.get(&address).copied()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Iterate in ascending address order
    pub fn iter(&self) -> impl Iterator<Item = (u32, u8)> + '_ {
        self.bytes.iter().map(|(&addr, &value)| (addr, value))
    }

    pub fn min_address(&self) -> Option<u32> {
        self.bytes.keys().next().copied()
    }

    pub fn max_address(&self) -> Option<u32> {
        self.bytes.keys().next_back().copied()
    }

    pub fn summary(&self) -> Result<ImageSummary, ConvertError> {
        match (self.min_address(), self.max_address()) {
            (Some(lowest), Some(highest)) => Ok(ImageSummary {
                lowest,
                highest,
                byte_count: self.len(),
            }),
            _ => Err(ConvertError::EmptyImage),
        }
    }

    /// Shift every address down so the lowest one becomes 0
    pub fn remap_to_zero(&self) -> Result<MemoryImage, ConvertError> {
        let min_address = self.min_address().ok_or(ConvertError::EmptyImage)?;

        log::info!("Address remap: 0x{:08X} -> 0x00000000", min_address);

        let bytes = self
            .bytes
            .iter()
            .map(|(&addr, &value)| (addr - min_address, value))
            .collect();

        Ok(MemoryImage { bytes })
    }

    /// Group addresses into maximal contiguous runs
    pub fn runs(&self) -> Vec<Run> {
        split_runs(self.iter())
    }
}

impl FromIterator<(u32, u8)> for MemoryImage {
    fn from_iter<I: IntoIterator<Item = (u32, u8)>>(iter: I) -> Self {
        let mut image = MemoryImage::new();
        for (addr, value) in iter {
            image.insert(addr, value);
        }
        image
    }
}

/// Single pass over (address, byte) pairs already sorted ascending
pub fn split_runs(sorted: impl IntoIterator<Item = (u32, u8)>) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();
    let mut previous: Option<u32> = None;

    for (addr, value) in sorted {
        let continues = previous.and_then(|p| p.checked_add(1)) == Some(addr);
        match runs.last_mut() {
            Some(run) if continues => run.bytes.push(value),
            _ => runs.push(Run {
                start: addr,
                bytes: vec![value],
            }),
        }
        previous = Some(addr);
    }

    runs
}
