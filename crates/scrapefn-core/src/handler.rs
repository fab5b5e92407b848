//! Invocation handler.
//!
//! One guarded region spans config resolution through dispatch; any error
//! inside is caught once, logged, and mapped to a uniform error envelope.
//! Session release runs unconditionally after the region, on success and on
//! every failure path alike, and cannot itself fail.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;
use thiserror::Error;
use tracing::{debug, error, info};
use uuid::Uuid;

use scrapefn_browser::{
    resolve_launch_config, BrowserError, ConfigError, ExecutionEnvironment, SessionProvider,
};
use scrapefn_protocols::{normalize, NormalizedRequest, ResponseEnvelope, RoutineError, Trigger};

use crate::registry::RoutineRegistry;

/// Invocation-level failure, mapped to a response status code.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Launch(#[from] BrowserError),

    #[error(transparent)]
    Routine(#[from] RoutineError),
}

impl HandlerError {
    /// Status code per the error taxonomy; authorization failures map to 401.
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerError::Routine(e) if e.is_unauthorized() => 401,
            _ => 500,
        }
    }
}

/// Drives one invocation from trigger to response envelope.
pub struct Handler {
    registry: RoutineRegistry,
    sessions: Arc<dyn SessionProvider>,
    environment: ExecutionEnvironment,
    /// Environment snapshot taken at startup; injected so tests can drive
    /// both resolver branches.
    env_vars: HashMap<String, String>,
}

impl Handler {
    pub fn new(
        registry: RoutineRegistry,
        sessions: Arc<dyn SessionProvider>,
        environment: ExecutionEnvironment,
        env_vars: HashMap<String, String>,
    ) -> Self {
        Self {
            registry,
            sessions,
            environment,
            env_vars,
        }
    }

    /// Handle one trigger, returning the terminal response envelope.
    ///
    /// The session, if one was acquired even partially, is always released
    /// before this returns, regardless of how dispatch went.
    pub async fn handle(&self, trigger: &Trigger) -> ResponseEnvelope {
        let invocation_id = Uuid::new_v4();
        debug!(%invocation_id, ?trigger, "Received trigger");

        let request = normalize(trigger);
        info!(
            %invocation_id,
            method = %request.method,
            path = %request.path_segment,
            "Handling request"
        );

        if request.method == "options" {
            debug!(%invocation_id, "Preflight request, returning before session acquisition");
            return ResponseEnvelope::preflight();
        }

        let outcome = self.run(&request).await;

        // Guaranteed cleanup: runs on success, routine failure, dispatch
        // failure, and unknown routes alike.
        self.sessions.release().await;

        match outcome {
            Ok(envelope) => envelope,
            Err(e) => {
                error!(%invocation_id, "Invocation failed: {}", e);
                ResponseEnvelope::error(e.status_code(), e.to_string())
            }
        }
    }

    /// The guarded region: resolve config, acquire, dispatch, compose.
    async fn run(&self, request: &NormalizedRequest) -> Result<ResponseEnvelope, HandlerError> {
        let config = resolve_launch_config(&self.environment, &self.env_vars)?;
        let page = self.sessions.acquire(&config).await?;

        match self
            .registry
            .dispatch(&request.path_segment, page, &request.payload)
            .await
        {
            None => {
                info!("No routine registered for {}", request.path_segment);
                Ok(ResponseEnvelope::unknown_endpoint(&request.path_segment))
            }
            Some(Err(e)) => Err(HandlerError::Routine(e)),
            Some(Ok(result)) => {
                let message = match self.registry.get(&request.path_segment) {
                    Some(routine) => format!("{} completed", routine.name()),
                    None => "Request completed".to_string(),
                };
                Ok(ResponseEnvelope::ok(&json!({
                    "message": message,
                    "status": "ok",
                    "data": result,
                })))
            }
        }
    }
}

#[cfg(test)]
#[path = "handler_tests.rs"]
mod tests;
