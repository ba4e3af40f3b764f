// src/cli/handlers/run.rs

use crate::cli::args::RunArgs;
use crate::cli::handlers::commons;
use crate::core::service::InvokeKind;
use crate::core::{manifest, settings};
use crate::models::Runnable;
use crate::system::terminal::TerminalManager;
use anyhow::{anyhow, Result};
use clap::Parser;
use colored::Colorize;

/// `tinypanel run <node>`: the context-menu action. The terminal title is
/// the node's `title`, falling back to its `name`.
pub fn handle(args: Vec<String>) -> Result<()> {
    run_with_kind(args, InvokeKind::RunFromContext)
}

/// The bare `tinypanel <section>/<node>` shortcut: the default click
/// action. The terminal title is the node's display label.
pub fn handle_click(args: Vec<String>) -> Result<()> {
    run_with_kind(args, InvokeKind::RunFromClick)
}

fn run_with_kind(args: Vec<String>, kind: InvokeKind) -> Result<()> {
    let run_args = RunArgs::try_parse_from(&args)?;
    let workspace = commons::bind_workspace()?;
    let parsed = manifest::load(&workspace.manifest_path)?;
    let (section, label_path) = commons::parse_node_path(&run_args.node)?;
    let (arena, id) = commons::resolve_item(&parsed, section, &label_path)?;

    let item = arena
        .item(id)
        .ok_or_else(|| anyhow!("projected item vanished"))?;
    let command = item.node.command.as_ref().ok_or_else(|| {
        let children: Vec<&str> = arena
            .children(id)
            .into_iter()
            .map(|child| child.label.as_str())
            .collect();
        anyhow!(format!(
            t!("run.error.not_runnable"),
            path = item.label,
            children = if children.is_empty() {
                "(none)".to_string()
            } else {
                children.join(", ")
            }
        ))
    })?;

    let title = match kind {
        InvokeKind::RunFromContext => item
            .node
            .title
            .clone()
            .unwrap_or_else(|| item.node.name.clone()),
        _ => item.label.clone(),
    };

    let user_settings = settings::load()?;
    let terminals = TerminalManager::native(user_settings.shell.clone(), workspace.root.clone());
    dispatch_and_wait(&terminals, command, &title)
}

/// Submits the command lines, then keeps the process alive until the
/// session's shell exits so its output stays visible.
fn dispatch_and_wait(
    terminals: &TerminalManager,
    command: &Runnable,
    title: &str,
) -> Result<()> {
    terminals.run(command, title)?;
    println!(
        "{}",
        format!(
            t!("run.dispatched"),
            count = command.lines().len(),
            title = title
        )
        .dimmed()
    );
    terminals.finish(title);
    Ok(())
}
