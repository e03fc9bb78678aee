//! Paged action history of one unit.

use crate::api::{Backend, LogQuery};
use crate::error::Result;
use crate::model::{ActionLogEntry, LogPage};
use log::debug;
use std::sync::Arc;

/// One loaded page and its navigation bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct LogPageView {
    /// Zero-based.
    pub page: u32,
    pub size: u32,
    pub entries: Vec<ActionLogEntry>,
    pub total_pages: Option<u32>,
    pub has_prev: bool,
    pub has_next: bool,
}

impl LogPageView {
    /// With a page envelope the bounds are exact. A bare array carries no
    /// total, so a next page is assumed only when this one came back full.
    pub fn new(page: u32, size: u32, response: LogPage) -> Self {
        let total_pages = response.total_pages();
        let entries = match response {
            LogPage::Entries(entries) => entries,
            LogPage::Envelope { content, .. } => content,
        };
        let has_next = match total_pages {
            Some(total) => page.saturating_add(1) < total,
            None => entries.len() == size as usize,
        };

        Self {
            page,
            size,
            entries,
            total_pages,
            has_prev: page > 0,
            has_next,
        }
    }
}

pub struct ActionLogPager {
    backend: Arc<dyn Backend>,
    code: String,
    size: u32,
    current: Option<LogPageView>,
}

impl ActionLogPager {
    pub fn new(backend: Arc<dyn Backend>, code: impl Into<String>, size: u32) -> Self {
        Self {
            backend,
            code: code.into(),
            size: size.max(1),
            current: None,
        }
    }

    pub fn current(&self) -> Option<&LogPageView> {
        self.current.as_ref()
    }

    /// Fetch page `page`. On failure the previously loaded page is kept.
    pub async fn load(&mut self, page: u32) -> Result<&LogPageView> {
        debug!("[Pager] Loading {} page {} (size {})", self.code, page, self.size);
        let response = self
            .backend
            .action_logs(
                &self.code,
                LogQuery::Page {
                    page,
                    size: self.size,
                },
            )
            .await?;

        let view = LogPageView::new(page, self.size, response);
        debug!(
            "[Pager] {} page {}: {} entries, next={}",
            self.code,
            page,
            view.entries.len(),
            view.has_next
        );
        Ok(&*self.current.insert(view))
    }

    /// Load the following page. Starts at page 0 when nothing is loaded;
    /// returns `None` when the current page is the last.
    pub async fn next(&mut self) -> Result<Option<&LogPageView>> {
        let page = match &self.current {
            None => 0,
            Some(view) if view.has_next => view.page + 1,
            Some(_) => return Ok(None),
        };
        self.load(page).await.map(Some)
    }

    pub async fn prev(&mut self) -> Result<Option<&LogPageView>> {
        let Some(page) = self
            .current
            .as_ref()
            .filter(|view| view.has_prev)
            .map(|view| view.page - 1)
        else {
            return Ok(None);
        };
        self.load(page).await.map(Some)
    }

    /// The most recent `limit` entries, outside page navigation.
    pub async fn recent(&self, limit: u32) -> Result<Vec<ActionLogEntry>> {
        let response = self
            .backend
            .action_logs(&self.code, LogQuery::Limit(limit))
            .await?;
        Ok(response.entries().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBackend;
    use tokio_test::{assert_err, assert_ok};

    fn entries(n: usize) -> Vec<ActionLogEntry> {
        (0..n)
            .map(|i| ActionLogEntry {
                greenhouse_code: Some("GH-1".into()),
                timestamp: None,
                action: "VENT_OPEN".into(),
                reason: Some(format!("rule-{}", i)),
            })
            .collect()
    }

    fn pager(backend: &Arc<FakeBackend>, size: u32) -> ActionLogPager {
        ActionLogPager::new(backend.clone(), "GH-1", size)
    }

    #[test]
    fn test_plain_array_full_page_enables_next() {
        let view = LogPageView::new(0, 5, LogPage::Entries(entries(5)));
        assert!(view.has_next);
        assert!(!view.has_prev);
    }

    #[test]
    fn test_plain_array_short_page_is_last() {
        let view = LogPageView::new(2, 5, LogPage::Entries(entries(4)));
        assert!(!view.has_next);
        assert!(view.has_prev);
    }

    #[test]
    fn test_envelope_bounds_are_exact() {
        let page = || LogPage::Envelope {
            content: entries(5),
            total_pages: Some(3),
        };
        assert!(LogPageView::new(1, 5, page()).has_next);
        assert!(!LogPageView::new(2, 5, page()).has_next);
    }

    #[test]
    fn test_envelope_without_total_uses_page_size() {
        let response = LogPage::Envelope {
            content: entries(3),
            total_pages: None,
        };
        assert!(!LogPageView::new(0, 5, response).has_next);
    }

    #[tokio::test]
    async fn test_next_and_prev_walk_pages() {
        let backend = Arc::new(FakeBackend::default());
        backend.set_log_page(LogPage::Entries(entries(2)));
        let mut pager = pager(&backend, 2);

        assert_eq!(assert_ok!(pager.next().await).map(|v| v.page), Some(0));
        assert_eq!(assert_ok!(pager.next().await).map(|v| v.page), Some(1));
        assert_eq!(assert_ok!(pager.prev().await).map(|v| v.page), Some(0));
        assert_eq!(assert_ok!(pager.prev().await), None);

        assert_eq!(
            backend.calls(),
            vec![
                "action_logs GH-1 page=0 size=2",
                "action_logs GH-1 page=1 size=2",
                "action_logs GH-1 page=0 size=2",
            ]
        );
    }

    #[tokio::test]
    async fn test_next_stops_at_last_page() {
        let backend = Arc::new(FakeBackend::default());
        backend.set_log_page(LogPage::Entries(entries(1)));
        let mut pager = pager(&backend, 20);

        assert_ok!(pager.load(0).await);
        assert_eq!(assert_ok!(pager.next().await), None);
        assert_eq!(backend.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_load_keeps_current_page() {
        let backend = Arc::new(FakeBackend::default());
        backend.set_log_page(LogPage::Entries(entries(3)));
        let mut pager = pager(&backend, 3);
        assert_ok!(pager.load(0).await);

        backend.fail("action_logs");
        assert_err!(pager.next().await);
        assert_eq!(pager.current().map(|v| v.page), Some(0));
    }

    #[tokio::test]
    async fn test_recent_uses_limit_query() {
        let backend = Arc::new(FakeBackend::default());
        backend.set_log_page(LogPage::Envelope {
            content: entries(4),
            total_pages: Some(1),
        });
        let pager = pager(&backend, 20);

        let recent = assert_ok!(pager.recent(10).await);
        assert_eq!(recent.len(), 4);
        assert_eq!(backend.calls(), vec!["action_logs GH-1 limit=10"]);
    }

    #[test]
    fn test_zero_size_is_clamped() {
        let backend = Arc::new(FakeBackend::default());
        assert_eq!(pager(&backend, 0).size, 1);
    }
}
