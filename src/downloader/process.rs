//! Running an external downloader to completion

use crate::utils::error::ToolError;
use std::ffi::OsStr;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command as AsyncCommand;
use tracing::{debug, error};

/// How much of stderr is kept in error messages.
const STDERR_TAIL: usize = 2048;

/// Run `program args...` and wait for it.
///
/// The child is killed if the returned future is dropped, which is how a
/// cancelled download stops the tool. Stdout is discarded; stderr is captured
/// for the error message.
pub async fn run_tool<I, S>(program: &Path, args: I) -> Result<(), ToolError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let program_name = program.display().to_string();
    let mut command = AsyncCommand::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    debug!("Running {:?}", command.as_std());

    let output = command.output().await.map_err(|source| ToolError::Launch {
        program: program_name.clone(),
        source,
    })?;

    if output.status.success() {
        return Ok(());
    }

    let stderr = stderr_tail(&output.stderr);
    error!("{} failed: {}", program_name, stderr);
    Err(ToolError::Exited {
        program: program_name,
        code: output.status.code(),
        stderr,
    })
}

fn stderr_tail(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    let trimmed = text.trim();
    if trimmed.len() <= STDERR_TAIL {
        return trimmed.to_string();
    }
    let mut start = trimmed.len() - STDERR_TAIL;
    while !trimmed.is_char_boundary(start) {
        start += 1;
    }
    trimmed[start..].to_string()
}
