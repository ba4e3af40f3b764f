// src/core/editor.rs

//! The edit-in-source action: resolve a node's position in the manifest and
//! hand it to the user's editor.

use crate::core::locator::{self, Position};
use crate::core::settings::Settings;
use crate::models::CommandNode;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Locates `node` in the manifest, prints the position as
/// `file:line:column` (one-based for humans) and launches the configured
/// editor command, if any. Returns the zero-based position.
pub fn edit_in_source(
    settings: &Settings,
    manifest_path: &Path,
    node: &CommandNode,
) -> Result<Position> {
    let source = fs::read_to_string(manifest_path)
        .with_context(|| format!("could not read '{}'", manifest_path.display()))?;
    let position = locator::locate(&source, node);
    println!(
        "{}:{}:{}",
        manifest_path.display(),
        position.line + 1,
        position.column + 1
    );
    if let Some(template) = &settings.editor_cmd {
        launch_editor(template, manifest_path, position);
    }
    Ok(position)
}

/// Launch-and-forget: the panel never waits for an editor.
fn launch_editor(template: &str, file: &Path, position: Position) {
    let command_line = template
        .replace("{file}", &file.to_string_lossy())
        .replace("{line}", &(position.line + 1).to_string())
        .replace("{column}", &(position.column + 1).to_string());
    let command_line = shellexpand::full(&command_line)
        .map(|expanded| expanded.into_owned())
        .unwrap_or(command_line);

    let Some(parts) = shlex::split(&command_line) else {
        log::warn!("editor_cmd could not be parsed: {}", command_line);
        return;
    };
    let Some((program, args)) = parts.split_first() else {
        return;
    };
    if let Err(e) = std::process::Command::new(program).args(args).spawn() {
        log::warn!("Failed to launch editor '{}': {}", command_line, e);
    }
}
