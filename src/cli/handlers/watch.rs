// src/cli/handlers/watch.rs

use crate::cli::args::WatchArgs;
use crate::cli::handlers::commons;
use crate::constants::PROJECT_FILENAME;
use crate::core::service::{DiagnosticSink, Invocation, InvokeKind, PanelEvent, PanelService};
use crate::core::{settings, workspace};
use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::io::BufRead;
use std::sync::mpsc::{self, Sender};
use std::thread;

/// `tinypanel watch`: the long-running panel loop.
///
/// Binds the workspace, renders the trees, then processes file-change and
/// command events in arrival order until `quit` or end of input. A missing
/// manifest keeps the command inert, mirroring the panel host that simply
/// never activates.
pub fn handle(args: Vec<String>) -> Result<()> {
    let _watch_args = WatchArgs::try_parse_from(&args)?;

    let user_settings = settings::load()?;
    let folders = workspace::default_folders();
    let Some(mut service) = PanelService::bind(&folders, DiagnosticSink::stderr(), user_settings)
    else {
        log::info!(
            "No folder in scope directly contains {}; staying inert.",
            PROJECT_FILENAME
        );
        return Ok(());
    };

    println!(
        "{}",
        format!(
            t!("watch.header"),
            file = service.manifest_path().display()
        )
        .cyan()
    );

    let (tx, rx) = mpsc::channel();
    let _watcher = service.spawn_watcher(tx.clone())?;
    spawn_stdin_reader(tx);

    service.run_loop(&rx);
    println!("{}", t!("watch.goodbye").dimmed());
    Ok(())
}

/// Reads interactive commands from stdin and forwards them as events. The
/// thread owns its channel end; the loop ends on `quit` or EOF.
fn spawn_stdin_reader(tx: Sender<PanelEvent>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let Some(event) = parse_line(&line) else {
                continue;
            };
            let stop = event == PanelEvent::Shutdown;
            if tx.send(event).is_err() || stop {
                return;
            }
        }
        let _ = tx.send(PanelEvent::Shutdown);
    });
}

/// One interactive line. `run`/`edit` take a node path; a bare node path is
/// the default click action; `refresh`, `help` and `quit` stand alone.
fn parse_line(line: &str) -> Option<PanelEvent> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    let (verb, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (trimmed, ""),
    };
    match verb {
        "quit" | "exit" | "q" => Some(PanelEvent::Shutdown),
        "refresh" | "r" => Some(PanelEvent::FileChanged),
        "run" => invocation(InvokeKind::RunFromContext, rest),
        "edit" => invocation(InvokeKind::EditInSource, rest),
        "help" | "?" => {
            println!("{}", t!("watch.help"));
            None
        }
        _ => invocation(InvokeKind::RunFromClick, trimmed),
    }
}

fn invocation(kind: InvokeKind, path: &str) -> Option<PanelEvent> {
    match commons::parse_node_path(path) {
        Ok((section, label_path)) => Some(PanelEvent::Invoke(Invocation {
            kind,
            section,
            path: label_path,
        })),
        Err(error) => {
            eprintln!("{}: {:#}", "Error".red().bold(), error);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Section;

    #[test]
    fn bare_node_path_is_the_click_action() {
        let event = parse_line("develop/Build").unwrap();
        assert_eq!(
            event,
            PanelEvent::Invoke(Invocation {
                kind: InvokeKind::RunFromClick,
                section: Section::Develop,
                path: "Build".to_string(),
            })
        );
    }

    #[test]
    fn run_verb_is_the_context_action() {
        let event = parse_line("run tools/Clean").unwrap();
        assert_eq!(
            event,
            PanelEvent::Invoke(Invocation {
                kind: InvokeKind::RunFromContext,
                section: Section::Tools,
                path: "Clean".to_string(),
            })
        );
    }

    #[test]
    fn control_verbs_map_to_their_events() {
        assert_eq!(parse_line("quit"), Some(PanelEvent::Shutdown));
        assert_eq!(parse_line("refresh"), Some(PanelEvent::FileChanged));
        assert_eq!(parse_line("   "), None);
    }

    #[test]
    fn unknown_sections_do_not_become_events() {
        assert_eq!(parse_line("deploy/Build"), None);
    }
}
