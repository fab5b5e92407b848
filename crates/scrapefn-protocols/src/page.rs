//! Page capability exposed to automation routines.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::PageError;

/// Live browser page handle.
///
/// Implementations carry bounded action and navigation timeouts set by the
/// session manager. Routines may navigate and evaluate freely but must not
/// close the page or the browser; ownership stays with the session manager.
#[async_trait]
pub trait Page: Send + Sync {
    /// Navigate to a URL and wait for the document to load.
    async fn goto(&self, url: &str) -> Result<(), PageError>;

    /// Evaluate a JavaScript expression in the page and return its value.
    async fn evaluate(&self, expression: &str) -> Result<Value, PageError>;
}
