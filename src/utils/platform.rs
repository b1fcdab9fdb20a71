//! Platform-specific utilities for Unidown
//!
//! Settings and downloads live next to the installed executable, the way a
//! portable bundle ships them:
//! - `<install dir>/config/params.json`
//! - `<install dir>/output/`

use std::path::{Path, PathBuf};

/// Directory containing the running executable, or `.` if it cannot be resolved.
pub fn install_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Fixed locations derived from one base directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    base: PathBuf,
}

impl AppPaths {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Paths rooted at [`install_dir`].
    pub fn from_install_dir() -> Self {
        Self::new(install_dir())
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn config_dir(&self) -> PathBuf {
        self.base.join("config")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.config_dir().join("params.json")
    }

    pub fn default_output_dir(&self) -> PathBuf {
        self.base.join("output")
    }
}

/// Platform-specific executable extension
pub fn exe_extension() -> &'static str {
    #[cfg(target_os = "windows")]
    {
        ".exe"
    }
    #[cfg(not(target_os = "windows"))]
    {
        ""
    }
}
