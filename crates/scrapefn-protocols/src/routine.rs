//! Automation routine contract.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::RoutineError;
use crate::page::Page;

/// Successful routine outcome as placed in the response body.
#[derive(Debug, Clone, Serialize)]
pub struct RoutineResult {
    pub success: bool,
    pub data: Value,
}

impl RoutineResult {
    pub fn new(data: Value) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// A pluggable unit performing the page interaction for one route.
#[async_trait]
pub trait Routine: Send + Sync {
    /// Routine name, used in logs and the completion message.
    fn name(&self) -> &str;

    /// Run the routine against the live page with the request payload.
    ///
    /// May perform arbitrary navigation and evaluation and may fail; must
    /// not close the page or the browser.
    async fn run(
        &self,
        page: Arc<dyn Page>,
        payload: &Map<String, Value>,
    ) -> Result<Value, RoutineError>;
}
