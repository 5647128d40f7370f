//! steamcmd binary discovery.
//!
//! Resolution order: explicit path, then the `STEAMCMD_PATH` environment
//! variable, then `PATH`, then a short list of well-known install
//! locations. An explicitly configured location that does not exist is an
//! error rather than a fallthrough, so misconfiguration surfaces instead of
//! silently running some other install.

use std::env;
use std::path::{Path, PathBuf};

use workshopdl_core::{DownloadError, DownloadResult};

/// Environment variable naming the steamcmd binary.
pub const STEAMCMD_ENV: &str = "STEAMCMD_PATH";

/// Resolve the steamcmd binary to invoke.
pub fn locate_steamcmd(explicit: Option<&Path>) -> DownloadResult<PathBuf> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        return Err(DownloadError::tool_not_found(format!(
            "steamcmd not found at {}",
            path.display()
        )));
    }

    if let Some(value) = env::var_os(STEAMCMD_ENV) {
        let path = PathBuf::from(value);
        if path.is_file() {
            return Ok(path);
        }
        return Err(DownloadError::tool_not_found(format!(
            "{STEAMCMD_ENV} points at {}, which does not exist",
            path.display()
        )));
    }

    if let Ok(path) = which::which("steamcmd") {
        tracing::debug!(path = %path.display(), "found steamcmd on PATH");
        return Ok(path);
    }

    for candidate in candidate_paths() {
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "found steamcmd at well-known location");
            return Ok(candidate);
        }
    }

    Err(DownloadError::tool_not_found(format!(
        "steamcmd not found: pass an explicit path, set {STEAMCMD_ENV}, or install steamcmd on PATH"
    )))
}

/// Well-known install locations, most specific first.
fn candidate_paths() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if cfg!(windows) {
        candidates.push(PathBuf::from(r"C:\SteamCMD\steamcmd.exe"));
    } else {
        candidates.push(PathBuf::from("/usr/games/steamcmd"));
        candidates.push(PathBuf::from("/usr/bin/steamcmd"));
    }
    if let Some(home) = dirs::home_dir() {
        if cfg!(windows) {
            candidates.push(home.join("SteamCMD").join("steamcmd.exe"));
        } else {
            candidates.push(home.join("steamcmd").join("steamcmd.sh"));
            candidates.push(home.join("Steam").join("steamcmd.sh"));
        }
    }
    candidates
}
