//! Utility modules for error handling, configuration and platform integration

pub mod config;
pub mod error;
pub mod platform;
pub mod reveal;

// Re-export for convenience
pub use config::{Postprocessor, SettingsRecord};
pub use error::{ConfigError, DownloadError, DownloadErrorKind, RevealError, ToolError};
pub use platform::AppPaths;
pub use reveal::{FileManager, Revealer};
