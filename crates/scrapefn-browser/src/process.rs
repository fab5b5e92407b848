//! Process-level control of the launched browser.

use async_trait::async_trait;
use tokio::process::Child;
use tracing::debug;

/// Handle allowing forced termination of the browser OS process.
///
/// Decoupled from the graceful-close path so escalation can be exercised
/// against a fake process in tests.
#[async_trait]
pub trait ProcessControl: Send {
    /// OS process id, if the process is still attached.
    fn pid(&self) -> Option<u32>;

    /// Send an unconditional kill and reap the process.
    async fn terminate(&mut self) -> std::io::Result<()>;
}

/// The real browser child process.
pub struct BrowserProcess {
    child: Child,
    /// Keeps the scratch profile on disk until the session ends.
    _profile_dir: tempfile::TempDir,
}

impl BrowserProcess {
    pub fn new(child: Child, profile_dir: tempfile::TempDir) -> Self {
        Self {
            child,
            _profile_dir: profile_dir,
        }
    }
}

#[async_trait]
impl ProcessControl for BrowserProcess {
    fn pid(&self) -> Option<u32> {
        self.child.id()
    }

    async fn terminate(&mut self) -> std::io::Result<()> {
        debug!(pid = ?self.child.id(), "Sending kill to browser process");
        self.child.kill().await
    }
}
