//! External objcopy runner that turns an ELF file into Intel HEX
//!
//! Path resolution:
//! - objcopy executable is resolved by, in order:
//!   1) config.objcopy_path
//!   2) config.util_path directory
//!   3) environment variable `ELF2READMEMH_OBJCOPY`
//!   4) `PATH` environment variable
//!   5) current working directory
//!
// Copyright (c) 2025 Tommy Olsen
// Licensed under the MIT License.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

#[cfg(windows)]
use std::os::windows::process::CommandExt;

use crate::config::Config;
use crate::error::ConvertError;

#[cfg(windows)]
const EXE_NAME: &str = "riscv64-unknown-elf-objcopy.exe";

#[cfg(not(windows))]
const EXE_NAME: &str = "riscv64-unknown-elf-objcopy";

const OBJCOPY_ENV: &str = "ELF2READMEMH_OBJCOPY";

pub struct Objcopy {
    config: Config,
}

impl Objcopy {
    pub fn new(config: &Config) -> Self {
        Objcopy {
            config: config.clone(),
        }
    }

    /// Run `objcopy -O ihex <elf> <hex>`
    pub fn elf_to_hex(&self, elf_path: &Path, hex_path: &Path) -> Result<(), ConvertError> {
        let exe = resolve_objcopy_exe(&self.config)?;

        log::info!("Translating {} -> {}", elf_path.display(), hex_path.display());

        let mut command = Command::new(&exe);
        command
            .arg("-O")
            .arg("ihex")
            .arg(elf_path)
            .arg(hex_path);

        #[cfg(windows)]
        command.creation_flags(0x08000000); // CREATE_NO_WINDOW

        let output = command.output().map_err(|e| {
            ConvertError::TranslationFailed(format!("Failed to execute {}: {}", exe.display(), e))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);

            let mut msg = format!(
                "objcopy failed (exit code: {})",
                output.status.code().unwrap_or(-1)
            );

            if !stderr.trim().is_empty() {
                msg.push_str(&format!("\n{}", stderr.trim()));
            } else if !stdout.trim().is_empty() {
                msg.push_str(&format!("\n{}", stdout.trim()));
            }

            return Err(ConvertError::TranslationFailed(msg));
        }

        if !hex_path.exists() {
            return Err(ConvertError::TranslationFailed(
                "objcopy reported success but no output file was produced".into(),
            ));
        }

        Ok(())
    }
}

/// Removes the file it names when dropped
#[derive(Debug)]
pub struct TempFile {
    path: PathBuf,
}

impl TempFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TempFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if self.path.exists() {
            if let Err(e) = fs::remove_file(&self.path) {
                log::warn!("Failed to remove {}: {}", self.path.display(), e);
            }
        }
    }
}

/* ======================= Helper functions ======================= */

fn resolve_objcopy_exe(config: &Config) -> Result<PathBuf, ConvertError> {
    // 1) Explicit path
    if let Some(path) = &config.objcopy_path {
        if path.exists() {
            return Ok(path.clone());
        }
        return Err(ConvertError::TranslationFailed(format!(
            "objcopy not found at {}",
            path.display()
        )));
    }

    // 2) Config util_path
    let candidate = config.util_path.join(EXE_NAME);
    if candidate.exists() {
        return Ok(candidate);
    }

    // 3) Environment variable
    if let Ok(p) = std::env::var(OBJCOPY_ENV) {
        let candidate = PathBuf::from(p);
        if candidate.exists() {
            return Ok(candidate);
        }
    }

    // 4) PATH lookup
    if let Some(path_env) = std::env::var_os("PATH") {
        for dir in std::env::split_paths(&path_env) {
            let candidate = dir.join(EXE_NAME);
            if candidate.exists() {
                return Ok(candidate);
            }
        }
    }

    // 5) Current working directory
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let candidate = cwd.join(EXE_NAME);
    if candidate.exists() {
        return Ok(candidate);
    }

    Err(ConvertError::TranslationFailed(format!(
        "Could not locate {}. Use --objcopy, set {}, or add it to PATH.",
        EXE_NAME, OBJCOPY_ENV
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("elf2readmemh-objcopy-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_temp_file_removed_on_drop() {
        let dir = scratch_dir("drop");
        let path = dir.join("temp_test.hex");
        fs::write(&path, ":00000001FF\n").unwrap();
        {
            let guard = TempFile::new(&path);
            assert!(guard.path().exists());
        }
        assert!(!path.exists());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_temp_file_missing_is_fine() {
        let dir = scratch_dir("missing");
        drop(TempFile::new(dir.join("never_created.hex")));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_explicit_objcopy_is_translation_failure() {
        let dir = scratch_dir("explicit");
        let config = Config::new(&dir, &dir).with_objcopy(dir.join("no-such-objcopy"));
        let err = Objcopy::new(&config)
            .elf_to_hex(&dir.join("a.elf"), &dir.join("a.hex"))
            .unwrap_err();
        assert!(matches!(err, ConvertError::TranslationFailed(ref msg) if msg.contains("no-such-objcopy")));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_carries_diagnostics() {
        use std::os::unix::fs::PermissionsExt;

        let dir = scratch_dir("fail");
        let script = dir.join("fake-objcopy");
        fs::write(&script, "#!/bin/sh\necho 'bad elf' >&2\nexit 3\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let config = Config::new(&dir, &dir).with_objcopy(&script);
        let err = Objcopy::new(&config)
            .elf_to_hex(&dir.join("a.elf"), &dir.join("a.hex"))
            .unwrap_err();
        match err {
            ConvertError::TranslationFailed(msg) => {
                assert!(msg.contains("exit code: 3"));
                assert!(msg.contains("bad elf"));
            }
            other => panic!("unexpected error: {other}"),
        }
        fs::remove_dir_all(&dir).unwrap();
    }
}
