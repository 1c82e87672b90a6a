// Tests for pagination accumulation

use pagescope_core::display::progress_line;
use pagescope_core::{PageOfUrls, Pagination, ScrapeResult, SessionState, Summary, UrlRecord, merge};
use std::collections::BTreeMap;

fn scrape_page(page_no: u64, sizes: &[usize], inaccessible: u64, page_size: u64, total: u64) -> ScrapeResult {
    let offset: usize = sizes[..(page_no - 1) as usize].iter().sum();
    let len = sizes[(page_no - 1) as usize];
    let last = page_no as usize == sizes.len();

    ScrapeResult {
        request_id: "session".to_string(),
        pagination: Pagination {
            page_size,
            current_page: page_no,
            total_pages: sizes.len() as u64,
            next_page: (!last).then(|| format!("/scrape?url=x&page={}", page_no + 1)),
        },
        summary: Summary {
            title: "Title".to_string(),
            html_version: "HTML 4.01".to_string(),
            headings: BTreeMap::new(),
            contains_login_form: true,
            total_urls: total,
            internal_urls: total,
            external_urls: 0,
            paginated: PageOfUrls {
                urls: (offset..offset + len)
                    .map(|i| UrlRecord {
                        url: format!("http://site/{}", i),
                        http_status: 200,
                        error: None,
                    })
                    .collect(),
                inaccessible_count: inaccessible,
            },
        },
    }
}

fn accumulate(sizes: &[usize], inaccessible: &[u64], page_size: u64, total: u64) -> SessionState {
    let mut state = SessionState::from_first_page(scrape_page(1, sizes, inaccessible[0], page_size, total));
    for page_no in 2..=sizes.len() as u64 {
        let page = scrape_page(page_no, sizes, inaccessible[(page_no - 1) as usize], page_size, total);
        state = merge(state, page);
    }
    state
}

// ============================================================================
// Accumulation properties
// ============================================================================

#[test]
fn test_length_is_sum_of_pages_in_order() {
    let cases: &[&[usize]] = &[&[1], &[10, 10, 3], &[50, 50, 50, 50, 7], &[0, 5], &[3, 0, 3]];

    for sizes in cases {
        let inaccessible = vec![0; sizes.len()];
        let state = accumulate(sizes, &inaccessible, 50, 1000);

        assert_eq!(state.accumulated_urls.len(), sizes.iter().sum::<usize>());
        for (i, rec) in state.accumulated_urls.iter().enumerate() {
            assert_eq!(rec.url, format!("http://site/{}", i));
        }
    }
}

#[test]
fn test_inaccessible_is_sum_of_page_counts() {
    let sizes = [10, 10, 10, 10];
    let inaccessible = [4, 0, 7, 1];
    let state = accumulate(&sizes, &inaccessible, 10, 40);

    assert_eq!(state.cumulative_inaccessible_count, 12);
}

#[test]
fn test_loaded_page_count_is_one_plus_merges() {
    for n in 1..=6usize {
        let sizes = vec![5; n];
        let inaccessible = vec![0; n];
        let state = accumulate(&sizes, &inaccessible, 5, 100);
        assert_eq!(state.loaded_page_count, n as u64);
    }
}

#[test]
fn test_latest_pagination_is_replaced() {
    let state = accumulate(&[5, 5, 2], &[0, 0, 0], 5, 12);

    assert_eq!(state.latest_pagination.current_page, 3);
    assert!(state.latest_pagination.next_page.is_none());
    assert!(!state.has_more());
}

// ============================================================================
// Derived readout
// ============================================================================

#[test]
fn test_accessed_capped_at_total() {
    let state = accumulate(&[50, 50, 20], &[3, 2, 0], 50, 120);
    let progress = state.progress();

    assert_eq!(progress.accessed, 120);
    assert_eq!(progress.remaining, 0);
    assert_eq!(progress.next_batch, 0);
    assert_eq!(
        progress_line(&state),
        "120 of 120 URL(s) accessed and 5 are inaccessible."
    );
}

#[test]
fn test_readout_after_second_page() {
    let state = accumulate(&[50, 50], &[3, 2], 50, 120);

    assert_eq!(state.accumulated_urls.len(), 100);
    assert_eq!(
        progress_line(&state),
        "100 of 120 URL(s) accessed and 5 are inaccessible."
    );
}
