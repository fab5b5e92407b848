//! Launch configuration resolution.
//!
//! The environment resolver picks one [`LaunchConfig`] per invocation. Only
//! the constrained branch probes the filesystem for an executable; a failed
//! probe there is fatal to the invocation.

use std::collections::HashMap;
use std::path::PathBuf;

use thiserror::Error;

use crate::env::ExecutionEnvironment;

/// Environment variable overriding the constrained browser binary location.
pub const EXECUTABLE_OVERRIDE: &str = "CHROMIUM_EXECUTABLE_PATH";

/// Well-known locations of the pre-packaged constrained binary.
const CONSTRAINED_CANDIDATES: &[&str] = &[
    "/opt/chromium/chrome",
    "/opt/chrome/chrome",
    "/tmp/chromium/chrome",
];

/// Default DevTools debugging port.
const DEFAULT_DEBUG_PORT: u16 = 9222;

/// Configuration resolution errors. Fatal to the invocation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "No browser executable found; set CHROMIUM_EXECUTABLE_PATH or install the packaged binary"
    )]
    ExecutableNotFound,
}

/// Viewport dimensions applied at launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Resolved set of flags and paths used to start a browser process.
///
/// Chosen once per invocation by [`resolve_launch_config`]; immutable
/// thereafter.
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    /// Browser binary. Required when running constrained; resolved at
    /// launch time by the local launcher otherwise.
    pub executable_path: Option<PathBuf>,
    /// Extra flags appended after the launcher defaults.
    pub execution_args: Vec<String>,
    pub headless: bool,
    /// Window size; `None` inherits the browser default.
    pub viewport: Option<Viewport>,
    pub ignore_certificate_errors: bool,
    /// Launcher default flags to drop before spawning.
    pub ignored_default_args: Vec<String>,
    /// DevTools debugging port.
    pub debug_port: u16,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            executable_path: None,
            execution_args: Vec::new(),
            headless: true,
            viewport: None,
            ignore_certificate_errors: false,
            ignored_default_args: Vec::new(),
            debug_port: DEFAULT_DEBUG_PORT,
        }
    }
}

/// Resolve the launch configuration for the detected environment.
pub fn resolve_launch_config(
    environment: &ExecutionEnvironment,
    vars: &HashMap<String, String>,
) -> Result<LaunchConfig, ConfigError> {
    match environment {
        ExecutionEnvironment::Constrained => {
            let executable = resolve_constrained_executable(vars)?;
            Ok(LaunchConfig {
                executable_path: Some(executable),
                execution_args: args(&[
                    "--disable-gpu",
                    "--disable-dev-shm-usage",
                    "--disable-setuid-sandbox",
                    "--no-first-run",
                    "--no-sandbox",
                    "--no-zygote",
                    "--single-process",
                    "--disable-extensions",
                ]),
                headless: true,
                viewport: None,
                ignore_certificate_errors: true,
                // The execution args carry their own copy of this flag.
                ignored_default_args: args(&["--disable-extensions"]),
                debug_port: DEFAULT_DEBUG_PORT,
            })
        }
        ExecutionEnvironment::Local => Ok(LaunchConfig {
            executable_path: None,
            execution_args: args(&[
                "--no-sandbox",
                "--disable-setuid-sandbox",
                "--disable-dev-shm-usage",
            ]),
            headless: false,
            viewport: None,
            ignore_certificate_errors: true,
            ignored_default_args: Vec::new(),
            debug_port: DEFAULT_DEBUG_PORT,
        }),
    }
}

/// Probe for the pre-packaged browser binary of the constrained host.
fn resolve_constrained_executable(
    vars: &HashMap<String, String>,
) -> Result<PathBuf, ConfigError> {
    if let Some(path) = vars.get(EXECUTABLE_OVERRIDE) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Ok(path);
        }
    }

    for candidate in CONSTRAINED_CANDIDATES {
        let path = PathBuf::from(candidate);
        if path.exists() {
            return Ok(path);
        }
    }

    Err(ConfigError::ExecutableNotFound)
}

fn args(flags: &[&str]) -> Vec<String> {
    flags.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
