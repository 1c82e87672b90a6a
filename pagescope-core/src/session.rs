use crate::model::{Pagination, ScrapeResult, Summary, UrlRecord};
use serde::{Deserialize, Serialize};

/// Client-held view of one scrape request, built from its first page and
/// grown by merging later pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub request_id: String,
    pub summary: Summary,
    pub accumulated_urls: Vec<UrlRecord>,
    pub loaded_page_count: u64,
    pub cumulative_inaccessible_count: u64,
    pub latest_pagination: Pagination,
}

impl SessionState {
    pub fn from_first_page(first: ScrapeResult) -> Self {
        let ScrapeResult {
            request_id,
            pagination,
            mut summary,
        } = first;
        let page = std::mem::take(&mut summary.paginated);

        Self {
            request_id,
            summary,
            accumulated_urls: page.urls,
            loaded_page_count: 1,
            cumulative_inaccessible_count: page.inaccessible_count,
            latest_pagination: pagination,
        }
    }

    pub fn has_more(&self) -> bool {
        self.latest_pagination.has_next()
    }

    pub fn progress(&self) -> Progress {
        Progress::compute(
            self.loaded_page_count,
            self.latest_pagination.page_size,
            self.summary.total_urls,
        )
    }
}

/// Appends `new_page` to `existing`. Total: no validation that both pages
/// belong to the same request, and the summary of `new_page` is ignored.
pub fn merge(existing: SessionState, new_page: ScrapeResult) -> SessionState {
    let SessionState {
        request_id,
        summary,
        mut accumulated_urls,
        loaded_page_count,
        cumulative_inaccessible_count,
        latest_pagination: _,
    } = existing;
    let ScrapeResult {
        pagination,
        summary: new_summary,
        ..
    } = new_page;
    let page = new_summary.paginated;

    accumulated_urls.extend(page.urls);

    SessionState {
        request_id,
        summary,
        accumulated_urls,
        loaded_page_count: loaded_page_count + 1,
        cumulative_inaccessible_count: cumulative_inaccessible_count + page.inaccessible_count,
        latest_pagination: pagination,
    }
}

/// Counters derived from the session, shown in the progress readout and the
/// load-more label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub accessed: u64,
    pub remaining: u64,
    pub next_batch: u64,
    pub total: u64,
}

impl Progress {
    pub fn compute(loaded_page_count: u64, page_size: u64, total_urls: u64) -> Self {
        let accessed = loaded_page_count
            .saturating_mul(page_size)
            .min(total_urls);
        let remaining = total_urls - accessed;
        let next_batch = page_size.min(remaining);

        Self {
            accessed,
            remaining,
            next_batch,
            total: total_urls,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PageOfUrls;
    use std::collections::BTreeMap;

    fn record(i: usize, ok: bool) -> UrlRecord {
        UrlRecord {
            url: format!("http://example.com/{}", i),
            http_status: if ok { 200 } else { 500 },
            error: (!ok).then(|| "Internal Server Error".to_string()),
        }
    }

    fn page(request_id: &str, start: usize, len: usize, bad: u64, next: Option<&str>) -> ScrapeResult {
        ScrapeResult {
            request_id: request_id.to_string(),
            pagination: Pagination {
                page_size: 50,
                current_page: 1,
                total_pages: 3,
                next_page: next.map(str::to_string),
            },
            summary: Summary {
                title: "Ex".to_string(),
                html_version: "HTML5".to_string(),
                headings: BTreeMap::from([("h1".to_string(), 2)]),
                contains_login_form: false,
                total_urls: 120,
                internal_urls: 80,
                external_urls: 40,
                paginated: PageOfUrls {
                    urls: (start..start + len).map(|i| record(i, true)).collect(),
                    inaccessible_count: bad,
                },
            },
        }
    }

    #[test]
    fn test_first_page_initialises_counters() {
        let state = SessionState::from_first_page(page("r1", 0, 50, 3, Some("/p2")));

        assert_eq!(state.loaded_page_count, 1);
        assert_eq!(state.cumulative_inaccessible_count, 3);
        assert_eq!(state.accumulated_urls.len(), 50);
        assert!(state.summary.paginated.urls.is_empty());
        assert!(state.has_more());
    }

    #[test]
    fn test_merge_appends_in_fetch_order() {
        let state = SessionState::from_first_page(page("r1", 0, 50, 3, Some("/p2")));
        let state = merge(state, page("r1", 50, 50, 2, Some("/p3")));
        let state = merge(state, page("r1", 100, 20, 0, None));

        assert_eq!(state.accumulated_urls.len(), 120);
        for (i, rec) in state.accumulated_urls.iter().enumerate() {
            assert_eq!(rec.url, format!("http://example.com/{}", i));
        }
        assert_eq!(state.loaded_page_count, 3);
        assert_eq!(state.cumulative_inaccessible_count, 5);
        assert!(!state.has_more());
    }

    #[test]
    fn test_merge_does_not_dedup() {
        let state = SessionState::from_first_page(page("r1", 0, 2, 0, Some("/p2")));
        let state = merge(state, page("r1", 0, 2, 0, None));

        assert_eq!(state.accumulated_urls.len(), 4);
        assert_eq!(state.accumulated_urls[0], state.accumulated_urls[2]);
    }

    #[test]
    fn test_merge_keeps_first_summary_and_replaces_pagination() {
        let state = SessionState::from_first_page(page("r1", 0, 1, 0, Some("/p2")));
        let mut next = page("r2", 1, 1, 0, None);
        next.summary.title = "Other".to_string();
        next.pagination.current_page = 2;

        let state = merge(state, next);
        assert_eq!(state.summary.title, "Ex");
        assert_eq!(state.request_id, "r1");
        assert_eq!(state.latest_pagination.current_page, 2);
        assert_eq!(state.latest_pagination.next_page, None);
    }

    #[test]
    fn test_progress_first_page() {
        let p = Progress::compute(1, 50, 120);
        assert_eq!(p.accessed, 50);
        assert_eq!(p.remaining, 70);
        assert_eq!(p.next_batch, 50);
    }

    #[test]
    fn test_progress_last_partial_batch() {
        let p = Progress::compute(2, 50, 120);
        assert_eq!(p.accessed, 100);
        assert_eq!(p.remaining, 20);
        assert_eq!(p.next_batch, 20);
    }

    #[test]
    fn test_progress_never_exceeds_total() {
        for pages in 0..20u64 {
            for size in [0u64, 1, 7, 50, u64::MAX] {
                let p = Progress::compute(pages, size, 120);
                assert!(p.accessed <= 120);
                assert_eq!(p.accessed + p.remaining, 120);
                assert!(p.next_batch <= p.remaining);
            }
        }
    }
}
