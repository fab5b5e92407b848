//! Route registry mapping path segments to automation routines.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use scrapefn_protocols::{Page, Routine, RoutineError, RoutineResult};

/// Static mapping from path segment to registered routine.
///
/// Populated once at startup. An unknown segment is not an error at this
/// layer; the handler maps "no match" to a 404 response.
#[derive(Default)]
pub struct RoutineRegistry {
    routes: HashMap<String, Arc<dyn Routine>>,
}

impl RoutineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a routine under a `/`-prefixed path segment.
    pub fn register(&mut self, path_segment: impl Into<String>, routine: Arc<dyn Routine>) {
        self.routes.insert(path_segment.into(), routine);
    }

    /// Look up the routine for a path segment.
    pub fn get(&self, path_segment: &str) -> Option<Arc<dyn Routine>> {
        self.routes.get(path_segment).cloned()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Route and invoke.
    ///
    /// `None` when no routine matches. Routine failures propagate unchanged;
    /// this layer adds routing only, no recovery semantics.
    pub async fn dispatch(
        &self,
        path_segment: &str,
        page: Arc<dyn Page>,
        payload: &Map<String, Value>,
    ) -> Option<Result<RoutineResult, RoutineError>> {
        let routine = self.get(path_segment)?;
        debug!("Dispatching {} to routine {}", path_segment, routine.name());
        Some(routine.run(page, payload).await.map(RoutineResult::new))
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
