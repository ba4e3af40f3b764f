// src/cli/handlers/tree.rs

use crate::cli::args::TreeArgs;
use crate::cli::handlers::commons;
use crate::core::{manifest, projection, tree_display};
use crate::models::Section;
use anyhow::{anyhow, Result};
use clap::Parser;
use colored::Colorize;

/// One-shot render of the section trees.
pub fn handle(args: Vec<String>) -> Result<()> {
    let tree_args = TreeArgs::try_parse_from(&args)?;

    let sections: Vec<Section> = match &tree_args.section {
        Some(key) => {
            let section = Section::from_key(key).ok_or_else(|| {
                anyhow!(format!(t!("common.error.unknown_section"), section = key))
            })?;
            vec![section]
        }
        None => Section::ALL.to_vec(),
    };

    let workspace = commons::bind_workspace()?;
    let parsed = manifest::load(&workspace.manifest_path)?;

    println!(
        "{}",
        format!(t!("tree.header"), root = workspace.root.display()).cyan()
    );
    for section in sections {
        let tree = parsed.section(section).map(projection::project);
        tree_display::render_section(section, tree.as_ref());
    }
    Ok(())
}
