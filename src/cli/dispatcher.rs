// src/cli/dispatcher.rs

use crate::cli::handlers;
use anyhow::Result;
use clap::crate_version;

/// Defines a command, its aliases and its handler.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(Vec<String>) -> Result<()>,
}

/// The single source of truth for all commands. To add a command, add an
/// entry here.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "create",
        aliases: &["new"],
        handler: handlers::create::handle,
    },
    CommandDefinition {
        name: "edit",
        aliases: &[],
        handler: handlers::edit::handle,
    },
    CommandDefinition {
        name: "run",
        aliases: &[],
        handler: handlers::run::handle,
    },
    CommandDefinition {
        name: "tree",
        aliases: &["ls"],
        handler: handlers::tree::handle,
    },
    CommandDefinition {
        name: "watch",
        aliases: &["panel"],
        handler: handlers::watch::handle,
    },
];

fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|command| command.name == name || command.aliases.contains(&name))
}

/// The main dispatcher.
///
/// `tinypanel <command> [args...]` routes through the registry; anything
/// else is treated as a node path, the shortcut for the default click
/// action (`tinypanel develop/Build`).
pub fn dispatch(all_args: Vec<String>) -> Result<()> {
    log::debug!("Dispatching args: {:?}", all_args);

    let Some(first) = all_args.first() else {
        print_usage();
        return Ok(());
    };

    match first.as_str() {
        "-h" | "--help" | "help" => {
            print_usage();
            Ok(())
        }
        "-V" | "--version" => {
            println!("tinypanel {}", crate_version!());
            Ok(())
        }
        name => {
            if let Some(command) = find_command(name) {
                (command.handler)(all_args.iter().skip(1).cloned().collect())
            } else {
                handlers::run::handle_click(all_args)
            }
        }
    }
}

fn print_usage() {
    println!("{}", t!("usage"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_resolve_to_their_commands() {
        assert_eq!(find_command("ls").map(|c| c.name), Some("tree"));
        assert_eq!(find_command("new").map(|c| c.name), Some("create"));
        assert_eq!(find_command("panel").map(|c| c.name), Some("watch"));
        assert!(find_command("develop/Build").is_none());
    }
}
