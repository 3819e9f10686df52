//! Command-line interface for the ELF to readmemh converter
//!
//! Usage: elf2readmemh [--hex] <input> [output] [--little-endian] [--remap-to-zero]
//!
// Copyright (c) 2025 Tommy Olsen
// Licensed under the MIT License.

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use elf2readmemh::config::{Config, Endianness, LittleEndianLayout, OutputOptions, VERSION};
use elf2readmemh::convert::{ConversionReport, Converter};
use elf2readmemh::error::ConvertError;
use elf2readmemh::logger::{self, Logger};

#[derive(Parser, Debug)]
#[command(name = "elf2readmemh", version, long_about = None)]
/// Convert a RISC-V ELF (or Intel HEX) file into a Verilog readmemh image
struct Args {
    /// Input ELF file, or Intel HEX file with --hex
    input: PathBuf,

    /// Output file (default: <name>_<bigendian|littleendian>_readmemh.txt)
    output: Option<PathBuf>,

    /// Treat the input as Intel HEX and skip objcopy
    #[arg(long)]
    hex: bool,

    /// Generate little-endian output (default is big-endian)
    #[arg(long)]
    little_endian: bool,

    /// Reverse every 4-byte word in little-endian output
    #[arg(long, requires = "little_endian")]
    swap_words: bool,

    /// Remap addresses so the image starts at 0x00000000
    #[arg(long)]
    remap_to_zero: bool,

    /// Path to the objcopy executable
    #[arg(long, value_name = "PATH")]
    objcopy: Option<PathBuf>,

    /// Show debug output, including every decoded record
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn output_options(&self) -> OutputOptions {
        OutputOptions {
            endianness: if self.little_endian { Endianness::Little } else { Endianness::Big },
            little_endian_layout: if self.swap_words {
                LittleEndianLayout::SwapWords
            } else {
                LittleEndianLayout::ByteStream
            },
            remap_to_zero: self.remap_to_zero,
        }
    }
}

fn main() {
    let args = Args::parse();

    if let Err(e) = logger::init(Logger {
        verbose: args.verbose,
        quiet: args.quiet,
        log_records: args.verbose,
    }) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    if !args.quiet {
        println!("ELF to readmemh Converter v{}", VERSION);
        println!();
    }

    match run(&args) {
        Ok(report) => {
            if !args.quiet {
                print_report(&report);
            }
            process::exit(0);
        }
        Err(e) => {
            eprintln!();
            eprintln!("✗ Conversion failed:");
            eprintln!("  {}", e);
            eprintln!();
            process::exit(1);
        }
    }
}

fn run(args: &Args) -> Result<ConversionReport, ConvertError> {
    if !args.input.exists() {
        return Err(ConvertError::InputNotFound(args.input.clone()));
    }

    let mut config = Config::auto()?;
    if let Some(objcopy) = &args.objcopy {
        config = config.with_objcopy(objcopy);
    }

    let work_path = config.work_path.clone();
    let converter = Converter::new(config, args.output_options());

    let result = if args.hex {
        converter.convert_hex(&args.input, args.output.as_deref())
    } else {
        converter.convert_elf(&args.input, args.output.as_deref())
    };

    // Clean up work directory
    if let Err(e) = cleanup_work_dir(&work_path) {
        log::warn!("{}", e);
    }

    result
}

fn print_report(report: &ConversionReport) {
    println!();
    println!("✓ Success!");
    println!("  readmemh file written to: {}", report.output_path.display());
    println!(
        "  Address range: 0x{:08X} - 0x{:08X}",
        report.summary.lowest, report.summary.highest
    );
    println!("  Total bytes: {}", report.summary.byte_count);
    if !report.warnings.is_empty() {
        println!("  Skipped lines: {}", report.warnings.len());
    }
    println!();
}

/// Clean up the temporary work directory
fn cleanup_work_dir(work_path: &Path) -> Result<(), String> {
    if work_path.exists() {
        std::fs::remove_dir_all(work_path)
            .map_err(|e| format!("Failed to remove work directory {:?}: {}", work_path, e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_flags_map_to_options() {
        let args = Args::try_parse_from([
            "elf2readmemh",
            "--hex",
            "prog.hex",
            "out.txt",
            "--little-endian",
            "--swap-words",
            "--remap-to-zero",
        ])
        .unwrap();
        assert!(args.hex);
        assert_eq!(args.input, PathBuf::from("prog.hex"));
        assert_eq!(args.output, Some(PathBuf::from("out.txt")));
        assert_eq!(
            args.output_options(),
            OutputOptions {
                endianness: Endianness::Little,
                little_endian_layout: LittleEndianLayout::SwapWords,
                remap_to_zero: true,
            }
        );
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["elf2readmemh", "coremark.bare.riscv"]).unwrap();
        assert!(!args.hex);
        assert_eq!(args.output, None);
        assert_eq!(args.output_options(), OutputOptions::default());
    }

    #[test]
    fn test_swap_words_requires_little_endian() {
        assert!(Args::try_parse_from(["elf2readmemh", "a.elf", "--swap-words"]).is_err());
    }

    #[test]
    fn test_missing_input_reported() {
        let args = Args::try_parse_from(["elf2readmemh", "--hex", "/no/such/input.hex"]).unwrap();
        assert!(matches!(run(&args), Err(ConvertError::InputNotFound(_))));
    }
}
