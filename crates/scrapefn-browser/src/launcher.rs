//! Environment-specific browser launchers.
//!
//! Two variants of one capability: the constrained launcher requires the
//! pre-resolved packaged binary, the local launcher falls back to scanning
//! system install locations. Selected once per invocation via
//! [`launcher_for`].

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::{Child, Command};
use tracing::{debug, info};

use crate::config::LaunchConfig;
use crate::env::ExecutionEnvironment;
use crate::session::BrowserError;

/// Flags every launch starts from, trimmed by `ignored_default_args`.
const DEFAULT_ARGS: &[&str] = &[
    "--no-first-run",
    "--no-default-browser-check",
    "--disable-background-networking",
    "--disable-sync",
    "--disable-translate",
    "--metrics-recording-only",
    "--disable-extensions",
];

/// A freshly spawned browser with its scratch profile directory.
pub struct LaunchedBrowser {
    pub child: Child,
    /// Removed from disk when the session ends.
    pub profile_dir: tempfile::TempDir,
}

/// Browser-launching capability, selected once per invocation.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    /// Resolve the binary this launcher will start.
    fn resolve_executable(&self, config: &LaunchConfig) -> Result<PathBuf, BrowserError>;

    /// Spawn the browser process with remote debugging enabled.
    async fn launch(&self, config: &LaunchConfig) -> Result<LaunchedBrowser, BrowserError> {
        let executable = self.resolve_executable(config)?;
        spawn_browser(&executable, config)
    }
}

/// Launcher for the constrained host: the binary must already be resolved.
pub struct ConstrainedLauncher;

#[async_trait]
impl BrowserLauncher for ConstrainedLauncher {
    fn resolve_executable(&self, config: &LaunchConfig) -> Result<PathBuf, BrowserError> {
        config
            .executable_path
            .clone()
            .ok_or(BrowserError::ExecutableNotConfigured)
    }
}

/// Launcher for local runs: scans system install locations when the config
/// does not name a binary.
pub struct LocalLauncher;

#[async_trait]
impl BrowserLauncher for LocalLauncher {
    fn resolve_executable(&self, config: &LaunchConfig) -> Result<PathBuf, BrowserError> {
        config
            .executable_path
            .clone()
            .or_else(find_browser)
            .ok_or(BrowserError::BrowserNotFound)
    }
}

/// Select the launcher variant for the environment.
pub fn launcher_for(environment: &ExecutionEnvironment) -> Box<dyn BrowserLauncher> {
    match environment {
        ExecutionEnvironment::Constrained => Box::new(ConstrainedLauncher),
        ExecutionEnvironment::Local => Box::new(LocalLauncher),
    }
}

/// Find a local browser installation.
pub fn find_browser() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        let paths = [
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
        ];
        for path in &paths {
            let p = PathBuf::from(path);
            if p.exists() {
                return Some(p);
            }
        }
    }

    #[cfg(target_os = "linux")]
    {
        let paths = [
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
        ];
        for path in &paths {
            let p = PathBuf::from(path);
            if p.exists() {
                return Some(p);
            }
        }
    }

    #[cfg(target_os = "windows")]
    {
        let paths = [
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
        ];
        for path in &paths {
            let p = PathBuf::from(path);
            if p.exists() {
                return Some(p);
            }
        }
    }

    None
}

/// Assemble the final argument list for a launch.
pub(crate) fn build_args(config: &LaunchConfig, profile_dir: &Path) -> Vec<String> {
    let mut args: Vec<String> = DEFAULT_ARGS
        .iter()
        .filter(|arg| !config.ignored_default_args.iter().any(|ignored| ignored == *arg))
        .map(|s| s.to_string())
        .collect();

    args.push(format!("--remote-debugging-port={}", config.debug_port));
    args.push(format!("--user-data-dir={}", profile_dir.display()));

    if config.headless {
        args.push("--headless=new".to_string());
    }
    if config.ignore_certificate_errors {
        args.push("--ignore-certificate-errors".to_string());
    }
    if let Some(viewport) = config.viewport {
        args.push(format!("--window-size={},{}", viewport.width, viewport.height));
    }

    args.extend(config.execution_args.iter().cloned());
    args
}

fn spawn_browser(executable: &Path, config: &LaunchConfig) -> Result<LaunchedBrowser, BrowserError> {
    let profile_dir = tempfile::Builder::new()
        .prefix("scrapefn-profile-")
        .tempdir()
        .map_err(|e| BrowserError::LaunchFailed(format!("profile dir: {e}")))?;

    let args = build_args(config, profile_dir.path());
    info!("Launching browser: {}", executable.display());
    debug!(?args, "Browser arguments");

    // kill_on_drop is the last-resort backstop: no exit path may leave the
    // process orphaned even if release() itself never runs.
    let child = Command::new(executable)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

    info!("Browser launched with PID: {:?}", child.id());
    Ok(LaunchedBrowser { child, profile_dir })
}

#[cfg(test)]
#[path = "launcher_tests.rs"]
mod tests;
