//! Browser session layer for the scrapefn worker.
//!
//! Resolves a launch configuration from the execution environment, launches
//! Chromium with remote debugging enabled, drives it over the Chrome
//! DevTools Protocol, and guarantees teardown within a bounded release
//! deadline:
//!
//! ```text
//! ┌──────────────────┐    WebSocket     ┌──────────────────┐
//! │  SessionManager  │ ◄──────────────► │  Chromium (one   │
//! │  (this crate)    │       CDP        │  process, one    │
//! └──────────────────┘                  │  page)           │
//!                                       └──────────────────┘
//! ```
//!
//! The manager owns the browser for exactly one invocation. `release`
//! races the graceful close sequence against a fixed deadline and escalates
//! to forced process termination when it loses.

pub mod cdp;
pub mod config;
pub mod env;
pub mod launcher;
pub mod process;
pub mod session;

pub use cdp::{CdpClient, CdpError, CdpPage};
pub use config::{resolve_launch_config, ConfigError, LaunchConfig, Viewport};
pub use env::ExecutionEnvironment;
pub use launcher::{
    launcher_for, BrowserLauncher, ConstrainedLauncher, LaunchedBrowser, LocalLauncher,
};
pub use process::{BrowserProcess, ProcessControl};
pub use session::{BrowserError, SessionManager, SessionProvider};
