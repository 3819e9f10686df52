//! ELF to readmemh Converter Library
//!
//! Rebuilds a sparse byte image from Intel HEX records and writes it as a
//! Verilog `$readmemh` file with one `@address` header per contiguous run.
//!
// Copyright (c) 2025 Tommy Olsen
// Licensed under the MIT License.

pub mod config;
pub mod convert;
pub mod error;
pub mod image;
pub mod logger;
pub mod objcopy;
pub mod parser;
pub mod readmemh;
pub mod record;
