//! Opening directories in the desktop file manager
//!
//! The file manager is looked up once when the [`Revealer`] is built and the
//! choice is reused for every later call.

use crate::utils::error::RevealError;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::thread::{self, JoinHandle};
use tracing::{debug, info};

/// Candidate programs, in order of preference.
#[cfg(target_os = "windows")]
const CANDIDATES: &[&str] = &["explorer"];

#[cfg(target_os = "macos")]
const CANDIDATES: &[&str] = &["open"];

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const CANDIDATES: &[&str] = &["thunar", "nautilus", "dolphin", "nemo", "xdg-open"];

/// How directories get opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileManager {
    /// A specific program, called with the directory as its only argument
    Program(PathBuf),
    /// Whatever handler the desktop registers for directories
    SystemDefault,
}

#[derive(Debug, Clone)]
pub struct Revealer {
    manager: FileManager,
}

impl Revealer {
    /// Walk the candidate list and cache the first program found on `PATH`.
    pub fn detect() -> Self {
        Self::detect_from(CANDIDATES)
    }

    pub fn detect_from(candidates: &[&str]) -> Self {
        for name in candidates {
            if let Ok(path) = which::which(name) {
                info!("Using file manager: {}", path.display());
                return Self::with_manager(FileManager::Program(path));
            }
        }
        info!("No file manager found, falling back to the system default handler");
        Self::with_manager(FileManager::SystemDefault)
    }

    pub fn with_manager(manager: FileManager) -> Self {
        Self { manager }
    }

    pub fn manager(&self) -> &FileManager {
        &self.manager
    }

    /// Open `dir` without waiting for the file manager to exit.
    pub fn reveal(&self, dir: &Path) -> Result<(), RevealError> {
        debug!("Revealing {}", dir.display());
        match &self.manager {
            FileManager::Program(program) => spawn_reaped(program, dir)
                .map(|_| ())
                .map_err(|source| RevealError::Launch {
                    program: program.display().to_string(),
                    source,
                }),
            FileManager::SystemDefault => open::that(dir).map_err(|source| RevealError::Open {
                dir: dir.to_path_buf(),
                source,
            }),
        }
    }
}

/// Start `program dir` and wait for it on a detached thread so the exited
/// child is reaped.
fn spawn_reaped(program: &Path, dir: &Path) -> io::Result<JoinHandle<io::Result<ExitStatus>>> {
    let mut child = Command::new(program).arg(dir).spawn()?;
    Ok(thread::spawn(move || child.wait()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_candidates_fall_back_to_system_default() {
        let revealer = Revealer::detect_from(&["unidown-no-such-file-manager"]);
        assert_eq!(revealer.manager(), &FileManager::SystemDefault);
    }

    #[test]
    fn test_missing_program_is_a_launch_error() {
        let revealer = Revealer::with_manager(FileManager::Program(PathBuf::from(
            "/nonexistent/unidown-file-manager",
        )));
        let err = revealer.reveal(Path::new(".")).unwrap_err();
        assert!(matches!(err, RevealError::Launch { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_spawned_file_manager_is_waited_for() {
        let program = which::which("true").unwrap();
        let status = spawn_reaped(&program, Path::new("."))
            .unwrap()
            .join()
            .unwrap()
            .unwrap();
        assert!(status.success());

        let revealer = Revealer::with_manager(FileManager::Program(program));
        assert!(revealer.reveal(Path::new(".")).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_detect_prefers_first_available() {
        // `sh` exists on every unix test host.
        let revealer = Revealer::detect_from(&["unidown-no-such-file-manager", "sh"]);
        match revealer.manager() {
            FileManager::Program(path) => assert!(path.ends_with("sh")),
            other => panic!("expected a program, got {:?}", other),
        }
    }
}
