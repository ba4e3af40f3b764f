// src/system/terminal.rs

//! Titled interactive terminal sessions.
//!
//! The manager owns the per-title registry and the at-most-one-per-title
//! rule; a backend supplies concrete sessions. The production backend runs a
//! real PTY with the configured shell and mirrors the foreground session's
//! output to stdout. Command failures inside a session are invisible here:
//! sessions are interactive surfaces, not pipelines.

use crate::models::Runnable;
use parking_lot::Mutex;
use portable_pty::{native_pty_system, Child, CommandBuilder, MasterPty, PtySize};
use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TerminalError {
    #[error("Could not open a terminal session titled '{title}': {reason}")]
    Open { title: String, reason: String },
    #[error("Could not submit a command line to terminal '{title}': {source}")]
    Submit {
        title: String,
        #[source]
        source: std::io::Error,
    },
}

/// One live terminal session. Dropping the handle disposes the session.
pub trait TerminalSession: Send {
    /// Submits one command line, as if typed followed by enter. Does not
    /// wait for the line to finish.
    fn submit(&mut self, line: &str) -> Result<(), std::io::Error>;
    /// Brings the session to the foreground.
    fn show(&mut self);
    /// Pushes the session to the background.
    fn hide(&mut self);
    /// Blocks until the session's process ends. No-op for sessions without
    /// a real process behind them.
    fn wait(&mut self) {}
}

/// Creates sessions. The production implementation is [`PtyBackend`]; tests
/// substitute a scripted double.
pub trait TerminalBackend: Send {
    fn open(&self, title: &str) -> Result<Box<dyn TerminalSession>, TerminalError>;
}

pub struct TerminalManager {
    backend: Box<dyn TerminalBackend>,
    sessions: Mutex<HashMap<String, Box<dyn TerminalSession>>>,
}

impl TerminalManager {
    pub fn new(backend: Box<dyn TerminalBackend>) -> Self {
        Self {
            backend,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// A manager backed by real PTY sessions started in `cwd`.
    pub fn native(shell: Option<String>, cwd: PathBuf) -> Self {
        Self::new(Box::new(PtyBackend { shell, cwd }))
    }

    /// Runs a command spec inside the terminal titled `title`.
    ///
    /// An existing session under the same title is disposed first, so at no
    /// point do two live sessions share a title. Lines are submitted in
    /// order without waiting in between, then the session takes the
    /// foreground. Returns once submission is complete.
    pub fn run(&self, spec: &Runnable, title: &str) -> Result<(), TerminalError> {
        let mut sessions = self.sessions.lock();
        if let Some(previous) = sessions.remove(title) {
            log::debug!("Recycling terminal session '{}'.", title);
            drop(previous);
        }

        let mut session = self.backend.open(title)?;
        for line in spec.lines() {
            session.submit(line).map_err(|source| TerminalError::Submit {
                title: title.to_string(),
                source,
            })?;
        }

        for background in sessions.values_mut() {
            background.hide();
        }
        session.show();
        sessions.insert(title.to_string(), session);
        Ok(())
    }

    /// Titles of all live sessions, unordered.
    pub fn live_titles(&self) -> Vec<String> {
        self.sessions.lock().keys().cloned().collect()
    }

    /// Asks the titled session's shell to exit once its queued lines finish,
    /// then blocks until it does. One-shot invocations use this so the
    /// process does not outlive its only session.
    pub fn finish(&self, title: &str) {
        let mut sessions = self.sessions.lock();
        if let Some(session) = sessions.get_mut(title) {
            let _ = session.submit("exit");
            session.wait();
        }
        sessions.remove(title);
    }

    /// Disposes every live session.
    pub fn dispose_all(&self) {
        self.sessions.lock().clear();
    }
}

impl Drop for TerminalManager {
    fn drop(&mut self) {
        self.dispose_all();
    }
}

// ─── PTY backend ───

struct PtyBackend {
    shell: Option<String>,
    cwd: PathBuf,
}

impl PtyBackend {
    fn shell_program(&self) -> String {
        self.shell
            .clone()
            .unwrap_or_else(|| default_shell_program().to_string())
    }
}

fn default_shell_program() -> &'static str {
    if cfg!(target_os = "windows") {
        "cmd.exe"
    } else {
        "bash"
    }
}

fn open_error(title: &str, reason: impl std::fmt::Display) -> TerminalError {
    TerminalError::Open {
        title: title.to_string(),
        reason: reason.to_string(),
    }
}

impl TerminalBackend for PtyBackend {
    fn open(&self, title: &str) -> Result<Box<dyn TerminalSession>, TerminalError> {
        let pty_system = native_pty_system();
        let pair = pty_system
            .openpty(PtySize {
                rows: 32,
                cols: 120,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| open_error(title, e))?;

        let mut builder = CommandBuilder::new(self.shell_program());
        builder.cwd(&self.cwd);
        builder.env("TERM", "xterm-256color");

        let child = pair
            .slave
            .spawn_command(builder)
            .map_err(|e| open_error(title, e))?;
        let mut reader = pair
            .master
            .try_clone_reader()
            .map_err(|e| open_error(title, e))?;
        let writer = pair.master.take_writer().map_err(|e| open_error(title, e))?;

        let foreground = Arc::new(AtomicBool::new(false));
        let mirror_flag = Arc::clone(&foreground);
        // The reader thread drains the PTY for the session's whole life;
        // only the foreground session's bytes reach stdout.
        thread::spawn(move || {
            let mut buf = [0u8; 4096];
            loop {
                match reader.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        if mirror_flag.load(Ordering::Relaxed) {
                            let mut out = std::io::stdout().lock();
                            let _ = out.write_all(&buf[..n]);
                            let _ = out.flush();
                        }
                    }
                }
            }
        });

        log::debug!("Opened terminal session '{}'.", title);
        Ok(Box::new(PtySession {
            _master: pair.master,
            writer,
            child,
            foreground,
        }))
    }
}

struct PtySession {
    _master: Box<dyn MasterPty + Send>,
    writer: Box<dyn Write + Send>,
    child: Box<dyn Child + Send>,
    foreground: Arc<AtomicBool>,
}

impl TerminalSession for PtySession {
    fn submit(&mut self, line: &str) -> Result<(), std::io::Error> {
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }

    fn show(&mut self) {
        self.foreground.store(true, Ordering::Relaxed);
    }

    fn hide(&mut self) {
        self.foreground.store(false, Ordering::Relaxed);
    }

    fn wait(&mut self) {
        let _ = self.child.wait();
    }
}

impl Drop for PtySession {
    fn drop(&mut self) {
        self.foreground.store(false, Ordering::Relaxed);
        let _ = self.child.kill();
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! A recording backend shared by this module's tests and the panel
    //! service tests.

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) enum SessionEvent {
        Opened(String),
        Submitted(String, String),
        Shown(String),
        Hidden(String),
        Disposed(String),
    }

    pub(crate) type EventLog = Arc<Mutex<Vec<SessionEvent>>>;

    pub(crate) struct ScriptedBackend {
        log: EventLog,
    }

    struct ScriptedSession {
        title: String,
        log: EventLog,
    }

    impl TerminalBackend for ScriptedBackend {
        fn open(&self, title: &str) -> Result<Box<dyn TerminalSession>, TerminalError> {
            self.log
                .lock()
                .push(SessionEvent::Opened(title.to_string()));
            Ok(Box::new(ScriptedSession {
                title: title.to_string(),
                log: Arc::clone(&self.log),
            }))
        }
    }

    impl TerminalSession for ScriptedSession {
        fn submit(&mut self, line: &str) -> Result<(), std::io::Error> {
            self.log
                .lock()
                .push(SessionEvent::Submitted(self.title.clone(), line.to_string()));
            Ok(())
        }

        fn show(&mut self) {
            self.log.lock().push(SessionEvent::Shown(self.title.clone()));
        }

        fn hide(&mut self) {
            self.log.lock().push(SessionEvent::Hidden(self.title.clone()));
        }
    }

    impl Drop for ScriptedSession {
        fn drop(&mut self) {
            self.log
                .lock()
                .push(SessionEvent::Disposed(self.title.clone()));
        }
    }

    pub(crate) fn scripted_manager() -> (TerminalManager, EventLog) {
        let log: EventLog = Arc::new(Mutex::new(Vec::new()));
        let manager = TerminalManager::new(Box::new(ScriptedBackend {
            log: Arc::clone(&log),
        }));
        (manager, log)
    }
}
