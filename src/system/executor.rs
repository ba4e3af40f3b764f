// src/system/executor.rs

use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command as StdCommand, Stdio};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Command could not be parsed: {0}")]
    CommandParse(String),
    #[error("Command '{0}' could not be executed: {1}")]
    CommandFailed(String, std::io::Error),
    #[error("Command '{0}' exited with a non-zero error code.")]
    NonZeroExitStatus(String),
}

/// Executes a system command and waits for it to finish.
///
/// Stdout/stderr are inherited; a non-zero exit status is an error. This is
/// the wizard's executor. The panel's terminal sessions never report exit
/// codes and live in `system::terminal` instead.
pub fn execute_command(command_line: &str, cwd: &Path) -> Result<(), ExecutionError> {
    let trimmed = command_line.trim();
    if trimmed.is_empty() {
        return Ok(()); // An empty command is a success, not an error.
    }

    let parts =
        shlex::split(trimmed).ok_or_else(|| ExecutionError::CommandParse(trimmed.to_string()))?;
    let Some((program, args)) = parts.split_first() else {
        return Ok(());
    };

    let clean_cwd = dunce::simplified(cwd);

    let mut command = StdCommand::new(program);
    command
        .args(args)
        .current_dir(clean_cwd)
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    // Fallback for Windows built-ins like `echo`: spawn directly first, and
    // only reroute through `cmd /C` when the program is not found.
    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) if e.kind() == ErrorKind::NotFound && cfg!(target_os = "windows") => {
            log::debug!("Command '{}' not found. Retrying with cmd /C.", program);
            StdCommand::new("cmd")
                .arg("/C")
                .arg(trimmed)
                .current_dir(clean_cwd)
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .spawn()
                .map_err(|e| ExecutionError::CommandFailed(trimmed.to_string(), e))?
        }
        Err(e) => return Err(ExecutionError::CommandFailed(trimmed.to_string(), e)),
    };

    let status = child
        .wait()
        .map_err(|e| ExecutionError::CommandFailed(trimmed.to_string(), e))?;
    if !status.success() {
        return Err(ExecutionError::NonZeroExitStatus(trimmed.to_string()));
    }
    Ok(())
}

/// Runs a command, retrying up to `attempts` times.
///
/// Only the wizard's network steps (fetch, dependency install) go through
/// this; everything else fails on the first error.
pub fn execute_with_retries(
    command_line: &str,
    cwd: &Path,
    attempts: u32,
) -> Result<(), ExecutionError> {
    let mut last_error = None;
    for attempt in 1..=attempts.max(1) {
        match execute_command(command_line, cwd) {
            Ok(()) => return Ok(()),
            Err(e) => {
                log::warn!(
                    "Command '{}' failed (attempt {}/{}): {}",
                    command_line,
                    attempt,
                    attempts,
                    e
                );
                last_error = Some(e);
            }
        }
    }
    Err(last_error.unwrap_or_else(|| ExecutionError::CommandParse(command_line.to_string())))
}
