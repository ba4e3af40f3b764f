// src/core/tree_display.rs

use crate::core::projection::{ItemKind, TreeArena, TreeItem};
use crate::models::Section;
use colored::Colorize;

/// Prints one section panel as an ASCII tree.
///
/// The section root is shown as the panel's top entry; children hang off it
/// with box-drawing connectors.
pub fn render_section(section: Section, tree: Option<&TreeArena>) {
    println!("\n{}", format!("[{}]", section.key()).cyan().bold());
    let root = tree.and_then(TreeArena::root);
    let (Some(arena), Some(root)) = (tree, root) else {
        println!("  {}", t!("tree.empty_section").dimmed());
        return;
    };

    println!("{} {}", styled_label(root), styled_description(root));
    let children = arena.children(root.id);
    for (index, child) in children.iter().enumerate() {
        print_item(arena, child, "", index == children.len() - 1);
    }
}

fn print_item(arena: &TreeArena, item: &TreeItem, prefix: &str, is_last: bool) {
    let connector = if is_last { "└─" } else { "├─" };
    println!(
        "{}{} {} {}",
        prefix,
        connector,
        styled_label(item),
        styled_description(item)
    );

    let child_prefix = format!("{}{}", prefix, if is_last { "   " } else { "│  " });
    let children = arena.children(item.id);
    for (index, child) in children.iter().enumerate() {
        print_item(arena, child, &child_prefix, index == children.len() - 1);
    }
}

fn styled_label(item: &TreeItem) -> colored::ColoredString {
    match item.kind {
        ItemKind::Runnable => item.label.green(),
        ItemKind::Group => item.label.bold(),
    }
}

fn styled_description(item: &TreeItem) -> colored::ColoredString {
    item.description.as_deref().unwrap_or_default().dimmed()
}
