//! Reference automation routine for the `/scrape_post` route.
//!
//! Navigates to the payload's `url` (or a default), lets the page settle,
//! and evaluates one in-page expression returning the page's identity
//! fields. The timestamp is produced by the page clock so it reflects when
//! the page was actually observed.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::time::sleep;
use tracing::{debug, info};

use scrapefn_protocols::{Page, Routine, RoutineError};

/// Path segment this routine is registered under.
pub const SCRAPE_POST_PATH: &str = "/scrape_post";

const DEFAULT_URL: &str = "https://example.com";

/// Delay after navigation for late-settling pages.
const SETTLE_DELAY: Duration = Duration::from_secs(1);

const PAGE_DATA_EXPRESSION: &str =
    "({ title: document.title, url: window.location.href, timestamp: new Date().toISOString() })";

/// Scrapes the target page's title, URL, and observation timestamp.
pub struct ScrapePost;

#[async_trait]
impl Routine for ScrapePost {
    fn name(&self) -> &str {
        "scrape_post"
    }

    async fn run(
        &self,
        page: Arc<dyn Page>,
        payload: &Map<String, Value>,
    ) -> Result<Value, RoutineError> {
        let url = payload
            .get("url")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_URL);

        info!("Navigating to: {}", url);
        page.goto(url).await?;
        sleep(SETTLE_DELAY).await;

        let data = page.evaluate(PAGE_DATA_EXPRESSION).await?;
        debug!("Scraped data: {}", data);
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use serde_json::json;

    use scrapefn_protocols::PageError;

    struct FakePage {
        visited: Mutex<Vec<String>>,
        fail_navigation: bool,
    }

    impl FakePage {
        fn new(fail_navigation: bool) -> Arc<Self> {
            Arc::new(Self {
                visited: Mutex::new(Vec::new()),
                fail_navigation,
            })
        }
    }

    #[async_trait]
    impl Page for FakePage {
        async fn goto(&self, url: &str) -> Result<(), PageError> {
            if self.fail_navigation {
                return Err(PageError::Navigation("net::ERR_NAME_NOT_RESOLVED".into()));
            }
            self.visited.lock().unwrap().push(url.to_string());
            Ok(())
        }

        async fn evaluate(&self, _expression: &str) -> Result<Value, PageError> {
            Ok(json!({
                "title": "Example Domain",
                "url": "https://example.com/",
                "timestamp": "2026-08-07T12:00:00.000Z"
            }))
        }
    }

    fn payload(url: &str) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("url".to_string(), json!(url));
        map
    }

    #[tokio::test]
    async fn test_navigates_to_payload_url() {
        let page = FakePage::new(false);
        let data = ScrapePost
            .run(page.clone(), &payload("https://rust-lang.org"))
            .await
            .unwrap();

        assert_eq!(
            *page.visited.lock().unwrap(),
            vec!["https://rust-lang.org".to_string()]
        );
        assert_eq!(data["title"], "Example Domain");
        assert!(data["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_falls_back_to_default_url() {
        let page = FakePage::new(false);
        ScrapePost.run(page.clone(), &Map::new()).await.unwrap();

        assert_eq!(
            *page.visited.lock().unwrap(),
            vec![DEFAULT_URL.to_string()]
        );
    }

    #[tokio::test]
    async fn test_non_string_url_uses_default() {
        let page = FakePage::new(false);
        let mut map = Map::new();
        map.insert("url".to_string(), json!(42));
        ScrapePost.run(page.clone(), &map).await.unwrap();

        assert_eq!(
            *page.visited.lock().unwrap(),
            vec![DEFAULT_URL.to_string()]
        );
    }

    #[tokio::test]
    async fn test_navigation_failure_propagates() {
        let page = FakePage::new(true);
        let err = ScrapePost
            .run(page, &payload("https://unreachable.invalid"))
            .await
            .unwrap_err();

        assert!(err.message.contains("ERR_NAME_NOT_RESOLVED"));
    }
}
