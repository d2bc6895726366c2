//! # pdfium-locate
//!
//! Find a [PDFium](https://pdfium.googlesource.com/pdfium/) shared library on
//! the local machine and bind `pdfium-render` to it, so callers never have to
//! juggle `DYLD_LIBRARY_PATH` / `LD_LIBRARY_PATH` by hand.
//!
//! ## Search order
//!
//! 1. `PDFIUM_LIB_PATH`: a library file, or a directory containing one.
//! 2. The cache directory ([`pdfium_cache_dir`]), where installers and other
//!    tools can drop a copy.
//! 3. The directory of the running executable.
//! 4. The current working directory.
//! 5. The operating system's library search path.
//!
//! The first candidate that exists on disk *and* binds successfully wins.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pdfium_locate::bind_pdfium;
//!
//! let pdfium = bind_pdfium().expect("PDFium unavailable");
//! ```
//!
//! ## Environment variable overrides
//!
//! - `PDFIUM_LIB_PATH`: path to an existing pdfium library (or its folder).
//! - `PDFIUM_CACHE_DIR`: override the default cache directory.

use std::path::{Path, PathBuf};

use pdfium_render::prelude::Pdfium;
use thiserror::Error;
use tracing::debug;

/// Environment variable naming an explicit library file or directory.
pub const LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Environment variable overriding [`pdfium_cache_dir`].
pub const CACHE_DIR_ENV: &str = "PDFIUM_CACHE_DIR";

// ── Error type ───────────────────────────────────────────────────────────────

/// Errors returned by pdfium-locate operations.
#[derive(Error, Debug)]
pub enum LocateError {
    /// `libloading` / `pdfium-render` could not load the library at `path`.
    #[error("Failed to bind PDFium from '{path}': {reason}")]
    Bind { path: PathBuf, reason: String },

    /// No candidate path held a library and the system search failed too.
    #[error(
        "PDFium library not found (looked for {lib_name} in {searched} location(s) and the system path): {reason}"
    )]
    NotFound {
        lib_name: String,
        searched: usize,
        reason: String,
    },
}

// ── Path resolution ──────────────────────────────────────────────────────────

/// Platform file name of the library, e.g. `libpdfium.so`.
pub fn pdfium_library_name() -> String {
    Pdfium::pdfium_platform_library_name()
        .to_string_lossy()
        .into_owned()
}

/// Returns the cache directory searched for a PDFium library.
///
/// Default locations:
/// - **macOS**: `~/Library/Caches/wordcloud/pdfium/`
/// - **Linux**: `~/.cache/wordcloud/pdfium/`
/// - **Windows**: `%LOCALAPPDATA%\wordcloud\pdfium\`
///
/// Override by setting `PDFIUM_CACHE_DIR`.
pub fn pdfium_cache_dir() -> PathBuf {
    if let Ok(override_dir) = std::env::var(CACHE_DIR_ENV) {
        return PathBuf::from(override_dir);
    }

    let base = dirs::cache_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".cache")))
        .unwrap_or_else(std::env::temp_dir);

    base.join("wordcloud").join("pdfium")
}

/// Expand an explicit override into a library path.
///
/// A directory is joined with the platform library name; anything else is
/// taken as the library file itself.
fn expand_override(raw: &str) -> PathBuf {
    let p = PathBuf::from(raw);
    if p.is_dir() {
        p.join(pdfium_library_name())
    } else {
        p
    }
}

/// All on-disk locations searched, in priority order. Entries need not exist.
pub fn candidate_paths() -> Vec<PathBuf> {
    let lib_name = pdfium_library_name();
    let mut candidates = Vec::with_capacity(4);

    if let Ok(raw) = std::env::var(LIB_PATH_ENV) {
        if !raw.trim().is_empty() {
            candidates.push(expand_override(raw.trim()));
        }
    }

    candidates.push(pdfium_cache_dir().join(&lib_name));

    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        candidates.push(exe_dir.join(&lib_name));
    }

    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd.join(&lib_name));
    }

    candidates.dedup();
    candidates
}

/// Returns the first candidate path that exists on disk.
pub fn locate_pdfium_library() -> Option<PathBuf> {
    candidate_paths().into_iter().find(|p| p.is_file())
}

// ── Binding ──────────────────────────────────────────────────────────────────

/// Binds to a PDFium library at an explicit `path`.
pub fn bind_pdfium_from_path(path: &Path) -> Result<Pdfium, LocateError> {
    Pdfium::bind_to_library(path)
        .map(Pdfium::new)
        .map_err(|e| LocateError::Bind {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

/// Binds to the first usable PDFium library, trying every candidate in
/// search order and finally the system library path.
pub fn bind_pdfium() -> Result<Pdfium, LocateError> {
    let candidates = candidate_paths();

    for path in candidates.iter().filter(|p| p.is_file()) {
        match bind_pdfium_from_path(path) {
            Ok(pdfium) => {
                debug!("Bound PDFium from {}", path.display());
                return Ok(pdfium);
            }
            Err(e) => debug!("{e}"),
        }
    }

    Pdfium::bind_to_system_library()
        .map(|bindings| {
            debug!("Bound PDFium from the system library path");
            Pdfium::new(bindings)
        })
        .map_err(|e| LocateError::NotFound {
            lib_name: pdfium_library_name(),
            searched: candidates.len(),
            reason: e.to_string(),
        })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
