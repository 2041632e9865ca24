//! Launching external programs.
//!
//! Launches are fire-and-forget: the event loop never waits for a child. Each
//! child is reaped on its own detached thread so finished programs do not
//! linger as zombies.

use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::config::env::keys;

/// Starts external command lines.
pub trait Launcher {
    /// Starts `command_line` without waiting for it. Failures are logged, never returned.
    fn launch(&mut self, command_line: &str);
}

/// [`Launcher`] that spawns real processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    fn launch(&mut self, command_line: &str) {
        let Some((binary, args)) = split_command_line(command_line) else {
            tracing::warn!("launch: empty command line");
            return;
        };

        let binary_path = match resolve_binary(binary) {
            Ok(path) => path,
            Err(err) => {
                tracing::warn!(command = command_line, "launch: {err}");
                return;
            }
        };

        match Command::new(&binary_path).args(&args).stdin(Stdio::null()).spawn() {
            Ok(mut child) => {
                let pid = child.id();
                tracing::info!(command = command_line, pid, "launch: started");
                std::thread::spawn(move || match child.wait() {
                    Ok(status) => tracing::debug!(pid, %status, "launch: child exited"),
                    Err(err) => tracing::debug!(pid, "launch: failed to reap child: {err}"),
                });
            }
            Err(err) => {
                tracing::warn!(
                    command = command_line,
                    path = %binary_path.display(),
                    "launch: failed to spawn: {err}"
                );
            }
        }
    }
}

/// Splits a command line into the program and its arguments on whitespace.
#[must_use]
pub fn split_command_line(command_line: &str) -> Option<(&str, Vec<&str>)> {
    let mut parts = command_line.split_whitespace();
    let binary = parts.next()?;
    Some((binary, parts.collect()))
}

/// Resolve the absolute path to an executable binary.
///
/// Absolute paths are checked as-is. Otherwise the binary is searched for in:
/// 1. Any directory listed in `STACKWM_EXTRA_PATHS` (colon-separated).
/// 2. The current process `PATH`.
/// 3. `~/.local/bin` and `~/.cargo/bin`.
///
/// # Errors
///
/// Returns a descriptive message when no executable file is found.
pub fn resolve_binary(binary: &str) -> Result<PathBuf, String> {
    if binary.is_empty() {
        return Err("Binary name cannot be empty".to_string());
    }

    let candidate = Path::new(binary);
    if candidate.is_absolute() {
        return if is_executable(candidate) {
            Ok(candidate.to_path_buf())
        } else {
            Err(format!("Binary at {} is not executable", candidate.display()))
        };
    }

    let mut search_paths = Vec::new();

    if let Ok(extra) = env::var(keys::EXTRA_PATHS) {
        search_paths.extend(extra.split(':').map(PathBuf::from));
    }

    if let Some(path_var) = env::var_os("PATH") {
        search_paths.extend(env::split_paths(&path_var));
    }

    if let Some(home) = dirs::home_dir() {
        search_paths.push(home.join(".local/bin"));
        search_paths.push(home.join(".cargo/bin"));
    }

    search_paths
        .into_iter()
        .filter(|directory| !directory.as_os_str().is_empty())
        .map(|directory| directory.join(binary))
        .find(|path| is_executable(path))
        .ok_or_else(|| format!("Unable to locate executable '{binary}' in known search paths"))
}

fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .is_ok_and(|metadata| metadata.is_file() && metadata.permissions().mode() & 0o111 != 0)
}
