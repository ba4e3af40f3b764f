// src/cli/handlers/commons.rs

//! Helpers shared by the one-shot handlers (`tree`, `run`, `edit`): bind the
//! workspace, load the manifest, resolve a node path.

use crate::constants::PROJECT_FILENAME;
use crate::core::projection::{self, ItemId, TreeArena};
use crate::core::workspace;
use crate::models::{ProjectManifest, Section};
use anyhow::{anyhow, Result};
use std::path::PathBuf;

pub struct Workspace {
    pub root: PathBuf,
    pub manifest_path: PathBuf,
}

/// Binds the working directory (or the nearest ancestor) to a workspace.
///
/// One-shot handlers are direct user requests, so unlike the watch loop
/// they fail loudly when nothing qualifies.
pub fn bind_workspace() -> Result<Workspace> {
    let folders = workspace::default_folders();
    let root = workspace::find_project_root(&folders)
        .ok_or_else(|| anyhow!(format!(t!("common.error.no_manifest"), file = PROJECT_FILENAME)))?;
    let manifest_path = workspace::manifest_path(&root);
    Ok(Workspace {
        root,
        manifest_path,
    })
}

/// Splits `<section>/<label>/...` into the section and the remaining label
/// path. A bare section key addresses the section root.
pub fn parse_node_path(path: &str) -> Result<(Section, String)> {
    let (section_key, rest) = match path.split_once('/') {
        Some((section_key, rest)) => (section_key, rest),
        None => (path, ""),
    };
    let section = Section::from_key(section_key).ok_or_else(|| {
        anyhow!(format!(
            t!("common.error.unknown_section"),
            section = section_key
        ))
    })?;
    Ok((section, rest.to_string()))
}

/// Projects a section and resolves a label path inside it.
pub fn resolve_item(
    manifest: &ProjectManifest,
    section: Section,
    label_path: &str,
) -> Result<(TreeArena, ItemId)> {
    let root = manifest.section(section).ok_or_else(|| {
        anyhow!(format!(
            t!("run.error.section_missing"),
            section = section,
            file = PROJECT_FILENAME
        ))
    })?;
    let arena = projection::project(root);
    let id = arena
        .find_path(label_path)
        .map(|item| item.id)
        .ok_or_else(|| {
            anyhow!(format!(
                t!("run.error.node_not_found"),
                path = label_path,
                section = section
            ))
        })?;
    Ok((arena, id))
}
