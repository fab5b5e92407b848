//! Session lifecycle management with escalating teardown.
//!
//! One invocation owns at most one session. `acquire` launches the browser
//! and opens a single page; `release` must succeed no matter what state the
//! browser is in, so it races the graceful close sequence against a fixed
//! deadline and falls back to killing the OS process. Browser processes can
//! hang on close under resource pressure, and a handler with a hard
//! wall-clock ceiling cannot wait out a hung shutdown.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use scrapefn_protocols::Page;

use crate::cdp::{CdpClient, CdpError};
use crate::config::LaunchConfig;
use crate::launcher::BrowserLauncher;
use crate::process::{BrowserProcess, ProcessControl};

/// Deadline for the graceful close sequence.
pub const RELEASE_DEADLINE: Duration = Duration::from_secs(5);
/// Default per-command timeout applied to the page.
pub const ACTION_TIMEOUT: Duration = Duration::from_secs(30);
/// Navigation timeout applied to the page.
pub const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);

/// DevTools endpoint readiness polling after spawn.
const READY_ATTEMPTS: u32 = 30;
const READY_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Browser and session errors. Fatal to the invocation when surfaced.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    #[error("Browser did not become ready within the startup timeout")]
    StartupTimeout,

    #[error("No browser executable configured for the constrained environment")]
    ExecutableNotConfigured,

    #[error("No local browser installation found")]
    BrowserNotFound,

    #[error("A session is already active for this invocation")]
    SessionActive,

    #[error("CDP error: {0}")]
    Cdp(#[from] CdpError),
}

/// Graceful half of teardown, decoupled from forced termination so either
/// can be exercised independently with fakes.
#[async_trait]
pub(crate) trait GracefulShutdown: Send + Sync {
    async fn close_page(&self) -> Result<(), CdpError>;
    async fn close_browser(&self) -> Result<(), CdpError>;
}

/// CDP-backed graceful shutdown.
struct CdpShutdown {
    client: Arc<CdpClient>,
    /// Absent while the session is only connected, before a page exists.
    target_id: Option<String>,
}

#[async_trait]
impl GracefulShutdown for CdpShutdown {
    async fn close_page(&self) -> Result<(), CdpError> {
        match &self.target_id {
            Some(target_id) => self.client.close_page(target_id).await,
            None => Ok(()),
        }
    }

    async fn close_browser(&self) -> Result<(), CdpError> {
        self.client.close_browser().await
    }
}

/// Live session state held between acquire and release.
pub(crate) struct LiveSession {
    /// `None` while the acquisition is still partial (process spawned but
    /// no CDP connection yet).
    pub(crate) shutdown: Option<Box<dyn GracefulShutdown>>,
    pub(crate) process: Box<dyn ProcessControl>,
}

/// Session acquisition seam used by the invocation handler.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Launch a browser and open one page configured with bounded timeouts.
    async fn acquire(&self, config: &LaunchConfig) -> Result<Arc<dyn Page>, BrowserError>;

    /// Tear the session down. Idempotent; never fails.
    async fn release(&self);
}

/// Owns the browser process and page handle for the lifetime of one request.
pub struct SessionManager {
    launcher: Box<dyn BrowserLauncher>,
    active: Mutex<Option<LiveSession>>,
    release_deadline: Duration,
}

impl SessionManager {
    pub fn new(launcher: Box<dyn BrowserLauncher>) -> Self {
        Self {
            launcher,
            active: Mutex::new(None),
            release_deadline: RELEASE_DEADLINE,
        }
    }

    /// Override the release deadline. Tests exercise the escalation path
    /// with a short deadline.
    pub fn with_release_deadline(mut self, deadline: Duration) -> Self {
        self.release_deadline = deadline;
        self
    }

    /// Poll the DevTools endpoint until the browser answers.
    async fn wait_until_ready(endpoint: &str) -> Result<(), BrowserError> {
        for _ in 0..READY_ATTEMPTS {
            sleep(READY_POLL_INTERVAL).await;
            if reqwest::get(format!("{endpoint}/json/version")).await.is_ok() {
                return Ok(());
            }
        }
        Err(BrowserError::StartupTimeout)
    }

    /// Connect to the spawned browser and open the invocation's page.
    ///
    /// Updates `live.shutdown` as soon as each close capability becomes
    /// available, so release() can always clean up what exists so far.
    async fn open_page(
        live: &mut LiveSession,
        config: &LaunchConfig,
    ) -> Result<Arc<dyn Page>, BrowserError> {
        let endpoint = format!("http://localhost:{}", config.debug_port);
        Self::wait_until_ready(&endpoint).await?;

        let client = Arc::new(CdpClient::connect(&endpoint).await?);
        live.shutdown = Some(Box::new(CdpShutdown {
            client: client.clone(),
            target_id: None,
        }));

        let page = client.new_page(ACTION_TIMEOUT, NAVIGATION_TIMEOUT).await?;
        live.shutdown = Some(Box::new(CdpShutdown {
            client,
            target_id: Some(page.target_id().to_string()),
        }));

        Ok(Arc::new(page))
    }

    async fn force_kill(process: &mut dyn ProcessControl) {
        let pid = process.pid();
        match process.terminate().await {
            Ok(()) => info!(?pid, "Browser process force killed"),
            Err(e) => warn!("Error force killing browser: {}", e),
        }
    }
}

#[async_trait]
impl SessionProvider for SessionManager {
    async fn acquire(&self, config: &LaunchConfig) -> Result<Arc<dyn Page>, BrowserError> {
        let mut active = self.active.lock().await;
        if active.is_some() {
            return Err(BrowserError::SessionActive);
        }

        info!("Initializing browser");
        let launched = self.launcher.launch(config).await?;
        let mut live = LiveSession {
            shutdown: None,
            process: Box::new(BrowserProcess::new(launched.child, launched.profile_dir)),
        };

        // The session is recorded whether or not the page opens, so a
        // partial acquisition is still killable from release().
        let result = Self::open_page(&mut live, config).await;
        *active = Some(live);

        if result.is_ok() {
            info!("Browser initialized");
        }
        result
    }

    async fn release(&self) {
        let Some(mut live) = self.active.lock().await.take() else {
            debug!("Release called with no active session");
            return;
        };

        info!("Starting resource cleanup");
        match live.shutdown.take() {
            None => {
                warn!("Session was only partially acquired, force killing browser");
                Self::force_kill(live.process.as_mut()).await;
            }
            Some(shutdown) => {
                let graceful = async {
                    debug!("Closing page");
                    shutdown.close_page().await?;
                    debug!("Closing browser");
                    shutdown.close_browser().await
                };

                match timeout(self.release_deadline, graceful).await {
                    Ok(Ok(())) => info!("Browser cleanup completed"),
                    Ok(Err(e)) => {
                        warn!("Cleanup error, force killing browser: {}", e);
                        Self::force_kill(live.process.as_mut()).await;
                    }
                    Err(_) => {
                        warn!(
                            "Cleanup timed out after {:?}, force killing browser",
                            self.release_deadline
                        );
                        Self::force_kill(live.process.as_mut()).await;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
