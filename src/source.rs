//! Candidate line sources
//!
//! Lines come from piped stdin, a directory scan, or the stdout of a shell
//! command. Directory and command sources are capped; the command source also
//! runs under a deadline, after which the child is killed and whatever it
//! printed so far is used.

use crate::error::{FilterError, Result};
use ignore::WalkBuilder;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Where candidate lines come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineSource {
    Stdin,
    Directory(PathBuf),
    Command(String),
}

impl LineSource {
    /// Pick a source from the CLI inputs.
    ///
    /// An explicit command or directory wins. Otherwise piped stdin is used
    /// and every positional is a query token. With an interactive stdin the
    /// first positional names the directory to scan.
    pub fn resolve(
        command: Option<String>,
        dir: Option<PathBuf>,
        stdin_is_terminal: bool,
        tokens: &mut Vec<String>,
    ) -> Result<Self> {
        if let Some(command) = command {
            return Ok(LineSource::Command(command));
        }
        if let Some(dir) = dir {
            return Ok(LineSource::Directory(dir));
        }
        if !stdin_is_terminal {
            return Ok(LineSource::Stdin);
        }
        if tokens.is_empty() {
            return Err(FilterError::MissingInput);
        }
        Ok(LineSource::Directory(PathBuf::from(tokens.remove(0))))
    }
}

/// Limits applied while reading a source
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Cap for directory and command sources
    pub max_lines: usize,
    /// Apply `max_lines` to stdin as well
    pub cap_stdin: bool,
    pub timeout: Duration,
    pub respect_gitignore: bool,
}

pub fn read_lines(source: &LineSource, options: &ReadOptions) -> Result<Vec<String>> {
    let lines = match source {
        LineSource::Stdin => {
            let limit = options.cap_stdin.then_some(options.max_lines);
            read_from(io::stdin().lock(), limit)?
        }
        LineSource::Directory(root) => {
            scan_directory(root, options.max_lines, options.respect_gitignore)?
        }
        LineSource::Command(command) => run_command(command, options.max_lines, options.timeout)?,
    };

    debug!(target: "fzr::source", ?source, lines = lines.len(), "read candidate lines");
    Ok(lines)
}

/// Read newline-delimited records, dropping the line terminator
pub fn read_from<R: BufRead>(mut reader: R, limit: Option<usize>) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    let mut buf = Vec::new();

    while limit.is_none_or(|max| lines.len() < max) {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        lines.push(decode_line(&buf));
    }

    Ok(lines)
}

fn decode_line(buf: &[u8]) -> String {
    let line = buf.strip_suffix(b"\n").unwrap_or(buf);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}

/// Regular files under `root`, in file-name order
pub fn scan_directory(root: &Path, limit: usize, respect_gitignore: bool) -> Result<Vec<String>> {
    if !root.is_dir() {
        return Err(FilterError::NotADirectory(root.to_path_buf()));
    }

    let walker = WalkBuilder::new(root)
        .hidden(false)
        .ignore(respect_gitignore)
        .parents(respect_gitignore)
        .git_ignore(respect_gitignore)
        .git_global(respect_gitignore)
        .git_exclude(respect_gitignore)
        .filter_entry(|entry| entry.file_name() != ".git")
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let files = walker
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!(target: "fzr::source", error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
        .map(|entry| entry.path().to_string_lossy().into_owned())
        .take(limit)
        .collect();

    Ok(files)
}

#[cfg(unix)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(windows)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

/// Run `command` through the shell and collect its stdout lines.
///
/// Stops at `limit` lines or when `timeout` expires, killing the child in
/// either case. A killed child is a normal end of input.
pub fn run_command(command: &str, limit: usize, timeout: Duration) -> Result<Vec<String>> {
    let mut child = shell(command)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| FilterError::Spawn {
            command: command.to_string(),
            source,
        })?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::other("child stdout was not captured"))?;

    let (tx, rx) = mpsc::channel();
    let reader = thread::spawn(move || {
        let mut reader = BufReader::new(stdout);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) | Err(_) => break,
                Ok(_) => {
                    if tx.send(decode_line(&buf)).is_err() {
                        break;
                    }
                }
            }
        }
    });

    let deadline = Instant::now() + timeout;
    let mut lines = Vec::new();
    let mut cut_short = false;

    while lines.len() < limit {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok(line) => lines.push(line),
            Err(RecvTimeoutError::Timeout) => {
                cut_short = true;
                debug!(target: "fzr::source", command, ?timeout, "command deadline reached");
                break;
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    if lines.len() >= limit {
        cut_short = true;
    }
    drop(rx);

    // Stdout may close long before the child exits
    let exited = if cut_short {
        None
    } else {
        wait_until(&mut child, deadline)?
    };

    match exited {
        Some(status) => {
            let _ = reader.join();
            if !status.success() {
                warn!(target: "fzr::source", command, %status, "command exited unsuccessfully");
            }
        }
        None => {
            // Already exited is fine
            let _ = child.kill();
            child.wait()?;
            debug!(target: "fzr::source", command, lines = lines.len(), "command stopped early");
            // The reader may still be blocked on a pipe held open by a grandchild
            drop(reader);
        }
    }

    Ok(lines)
}

/// Poll `child` until it exits or `deadline` passes
fn wait_until(child: &mut Child, deadline: Instant) -> io::Result<Option<ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Ok(None);
        }
        thread::sleep(remaining.min(EXIT_POLL_INTERVAL));
    }
}
