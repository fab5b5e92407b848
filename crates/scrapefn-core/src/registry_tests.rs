use super::*;

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use scrapefn_protocols::PageError;
use scrapefn_routine_scrape::{ScrapePost, SCRAPE_POST_PATH};

/// Page that records navigations and answers evaluations with fixed data.
struct FakePage {
    visited: Mutex<Vec<String>>,
}

impl FakePage {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            visited: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl Page for FakePage {
    async fn goto(&self, url: &str) -> Result<(), PageError> {
        self.visited.lock().unwrap().push(url.to_string());
        Ok(())
    }

    async fn evaluate(&self, _expression: &str) -> Result<serde_json::Value, PageError> {
        Ok(json!({
            "title": "Example Domain",
            "url": "https://example.com/",
            "timestamp": "2026-08-07T12:00:00.000Z"
        }))
    }
}

struct FailingRoutine;

#[async_trait]
impl Routine for FailingRoutine {
    fn name(&self) -> &str {
        "failing"
    }

    async fn run(
        &self,
        _page: Arc<dyn Page>,
        _payload: &Map<String, Value>,
    ) -> Result<Value, RoutineError> {
        Err(RoutineError::failed("page exploded"))
    }
}

fn payload(url: &str) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("url".to_string(), json!(url));
    map
}

#[test]
fn test_register_and_get() {
    let mut registry = RoutineRegistry::new();
    assert!(registry.is_empty());

    registry.register(SCRAPE_POST_PATH, Arc::new(ScrapePost));
    assert_eq!(registry.len(), 1);
    assert!(registry.get(SCRAPE_POST_PATH).is_some());
    assert!(registry.get("/unknown").is_none());
}

#[tokio::test]
async fn test_dispatch_unknown_segment_returns_none() {
    let registry = RoutineRegistry::new();
    let outcome = registry
        .dispatch("/unknown", FakePage::new(), &Map::new())
        .await;
    assert!(outcome.is_none());
}

#[tokio::test]
async fn test_dispatch_invokes_scrape_post_with_payload_url() {
    let mut registry = RoutineRegistry::new();
    registry.register(SCRAPE_POST_PATH, Arc::new(ScrapePost));

    let page = FakePage::new();
    let outcome = registry
        .dispatch(
            SCRAPE_POST_PATH,
            page.clone(),
            &payload("https://example.com"),
        )
        .await
        .expect("route is registered")
        .expect("fake page cannot fail");

    assert!(outcome.success);
    assert_eq!(outcome.data["title"], "Example Domain");
    assert_eq!(outcome.data["url"], "https://example.com/");
    assert!(outcome.data["timestamp"].is_string());
    assert_eq!(
        *page.visited.lock().unwrap(),
        vec!["https://example.com".to_string()]
    );
}

#[tokio::test]
async fn test_dispatch_propagates_routine_error() {
    let mut registry = RoutineRegistry::new();
    registry.register("/failing", Arc::new(FailingRoutine));

    let outcome = registry
        .dispatch("/failing", FakePage::new(), &Map::new())
        .await
        .expect("route is registered");

    let err = outcome.unwrap_err();
    assert_eq!(err.to_string(), "page exploded");
}
