// src/core/service.rs

//! The panel service: binds a workspace, keeps the three section trees in
//! sync with the manifest and processes events one at a time.
//!
//! All shared state follows a replace-wholesale discipline: a refresh parses
//! the manifest into a brand-new tree per section and swaps it in, so no
//! locking is needed and a half-applied refresh cannot be observed. Events
//! (file changes, node invocations) queue on one channel and are handled to
//! completion in arrival order; a refresh in progress is never interrupted.

use crate::constants::PROJECT_FILENAME;
use crate::core::projection::{self, TreeArena};
use crate::core::settings::Settings;
use crate::core::{editor, manifest, tree_display, workspace};
use crate::models::Section;
use crate::system::terminal::TerminalManager;
use anyhow::{anyhow, Result};
use colored::Colorize;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, Sender};

/// Events delivered to the service loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEvent {
    FileChanged,
    Invoke(Invocation),
    Shutdown,
}

/// A node action, addressed by section plus label path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub kind: InvokeKind,
    pub section: Section,
    pub path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvokeKind {
    /// Terminal title resolves to the node's `title`, falling back to its
    /// `name`.
    RunFromContext,
    /// Terminal title resolves to the node's display label.
    RunFromClick,
    EditInSource,
}

/// Write-only, append-only sink for refresh diagnostics. Never read back.
pub struct DiagnosticSink {
    out: Box<dyn Write + Send>,
}

impl DiagnosticSink {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self { out }
    }

    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Appends one line. Embedded newlines are flattened so one failure is
    /// one line.
    pub fn append_line(&mut self, message: &str) {
        let flat = message.replace('\n', " ");
        let _ = writeln!(self.out, "{flat}");
        let _ = self.out.flush();
    }
}

/// One section's view state: the projected tree from the last successful
/// refresh, if any.
pub struct SectionPanel {
    pub section: Section,
    pub tree: Option<TreeArena>,
}

/// Owns the refresh state machine and every panel-facing resource: the
/// diagnostic sink, the three panels and the terminal registry. Dropping the
/// service tears all of them down.
pub struct PanelService {
    root: PathBuf,
    manifest_path: PathBuf,
    panels: [SectionPanel; 3],
    diagnostics: DiagnosticSink,
    terminals: TerminalManager,
    settings: Settings,
}

impl PanelService {
    /// Binds to the first folder directly containing the manifest.
    ///
    /// `None` means no folder qualifies: the caller stays inert, registers
    /// nothing and watches nothing.
    pub fn bind(
        folders: &[PathBuf],
        diagnostics: DiagnosticSink,
        settings: Settings,
    ) -> Option<Self> {
        let root = workspace::find_project_root(folders)?;
        let terminals = TerminalManager::native(settings.shell.clone(), root.clone());
        Some(Self::bound(root, diagnostics, terminals, settings))
    }

    pub(crate) fn bound(
        root: PathBuf,
        diagnostics: DiagnosticSink,
        terminals: TerminalManager,
        settings: Settings,
    ) -> Self {
        let manifest_path = workspace::manifest_path(&root);
        Self {
            root,
            manifest_path,
            panels: Section::ALL.map(|section| SectionPanel { section, tree: None }),
            diagnostics,
            terminals,
            settings,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    pub fn panel(&self, section: Section) -> &SectionPanel {
        self.panels
            .iter()
            .find(|panel| panel.section == section)
            .unwrap_or(&self.panels[0])
    }

    /// One refresh cycle. Every failure is contained here: on error the
    /// previous trees stay in place, one diagnostic line is appended and
    /// `false` comes back.
    pub fn refresh(&mut self) -> bool {
        let parsed = match manifest::load(&self.manifest_path) {
            Ok(parsed) => parsed,
            Err(error) => {
                self.diagnostics.append_line(&format!(
                    t!("service.refresh_failed"),
                    file = PROJECT_FILENAME,
                    error = error
                ));
                return false;
            }
        };
        for panel in &mut self.panels {
            panel.tree = parsed.section(panel.section).map(projection::project);
        }
        true
    }

    /// The tree-changed notification: a full reset, every section redrawn.
    pub fn render(&self) {
        for panel in &self.panels {
            tree_display::render_section(panel.section, panel.tree.as_ref());
        }
    }

    /// Processes one event to completion. Returns `false` when the loop
    /// should stop.
    pub fn handle(&mut self, event: PanelEvent) -> bool {
        match event {
            PanelEvent::FileChanged => {
                if self.refresh() {
                    self.render();
                }
                true
            }
            PanelEvent::Invoke(invocation) => {
                if let Err(error) = self.invoke(&invocation) {
                    eprintln!("{}: {:#}", "Error".red().bold(), error);
                }
                true
            }
            PanelEvent::Shutdown => false,
        }
    }

    fn invoke(&self, invocation: &Invocation) -> Result<()> {
        let panel = self.panel(invocation.section);
        let tree = panel.tree.as_ref().ok_or_else(|| {
            anyhow!(format!(
                t!("run.error.section_missing"),
                section = invocation.section,
                file = PROJECT_FILENAME
            ))
        })?;
        let item = tree.find_path(&invocation.path).ok_or_else(|| {
            anyhow!(format!(
                t!("run.error.node_not_found"),
                path = invocation.path,
                section = invocation.section
            ))
        })?;

        match invocation.kind {
            InvokeKind::RunFromContext | InvokeKind::RunFromClick => {
                let command = item.node.command.as_ref().ok_or_else(|| {
                    let children: Vec<&str> = tree
                        .children(item.id)
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
                let title = match invocation.kind {
                    InvokeKind::RunFromContext => item
                        .node
                        .title
                        .clone()
                        .unwrap_or_else(|| item.node.name.clone()),
                    _ => item.label.clone(),
                };
                self.terminals.run(command, &title)?;
                println!(
                    "{}",
                    format!(
                        t!("run.dispatched"),
                        count = command.lines().len(),
                        title = title
                    )
                    .dimmed()
                );
            }
            InvokeKind::EditInSource => {
                editor::edit_in_source(&self.settings, &self.manifest_path, &item.node)?;
            }
        }
        Ok(())
    }

    /// Runs the event loop: an initial refresh plus render, then one event
    /// at a time until shutdown. Live terminal sessions are disposed on the
    /// way out.
    pub fn run_loop(&mut self, events: &Receiver<PanelEvent>) {
        if self.refresh() {
            self.render();
        }
        while let Ok(event) = events.recv() {
            if !self.handle(event) {
                break;
            }
        }
        self.terminals.dispose_all();
    }

    /// Starts the manifest watcher. Change notifications forward into `tx`;
    /// the watcher lives as long as the returned handle.
    pub fn spawn_watcher(&self, tx: Sender<PanelEvent>) -> notify::Result<RecommendedWatcher> {
        let mut watcher = RecommendedWatcher::new(
            move |result: notify::Result<notify::Event>| {
                let Ok(event) = result else { return };
                let touches_manifest = event
                    .paths
                    .iter()
                    .any(|path| path.file_name() == Some(OsStr::new(PROJECT_FILENAME)));
                let is_change = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );
                if touches_manifest && is_change {
                    let _ = tx.send(PanelEvent::FileChanged);
                }
            },
            notify::Config::default(),
        )?;
        watcher.watch(&self.root, RecursiveMode::NonRecursive)?;
        Ok(watcher)
    }
}
