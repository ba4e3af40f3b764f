// src/cli/handlers/edit.rs

use crate::cli::args::EditArgs;
use crate::cli::handlers::commons;
use crate::core::{editor, manifest, settings};
use anyhow::{anyhow, Result};
use clap::Parser;

/// `tinypanel edit <node>`: print the node's manifest position and hand it
/// to the configured editor.
pub fn handle(args: Vec<String>) -> Result<()> {
    let edit_args = EditArgs::try_parse_from(&args)?;
    let workspace = commons::bind_workspace()?;
    let parsed = manifest::load(&workspace.manifest_path)?;
    let (section, label_path) = commons::parse_node_path(&edit_args.node)?;
    let (arena, id) = commons::resolve_item(&parsed, section, &label_path)?;
    let item = arena
        .item(id)
        .ok_or_else(|| anyhow!("projected item vanished"))?;

    let user_settings = settings::load()?;
    editor::edit_in_source(&user_settings, &workspace.manifest_path, &item.node)?;
    Ok(())
}
