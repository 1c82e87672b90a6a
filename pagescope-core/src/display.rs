// Text shared by the terminal viewer and the reports

use crate::model::{Summary, UrlRecord};
use crate::session::{Progress, SessionState};

const MAX_URL_CHARS: usize = 150;
const TRUNCATED_URL_CHARS: usize = 147;

/// Shortens URLs longer than 150 characters to 147 plus `...`.
pub fn truncate_url(url: &str) -> String {
    if url.chars().count() > MAX_URL_CHARS {
        let head: String = url.chars().take(TRUNCATED_URL_CHARS).collect();
        format!("{}...", head)
    } else {
        url.to_string()
    }
}

pub fn status_label(record: &UrlRecord) -> String {
    if record.is_success() {
        format!("Success ({})", record.http_status)
    } else {
        format!("Error ({})", record.http_status)
    }
}

pub fn error_label(record: &UrlRecord) -> &str {
    record.error.as_deref().unwrap_or("None")
}

pub fn heading_label(level: &str) -> String {
    format!("{} Headings", level.to_uppercase())
}

pub fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

pub fn url_counts_line(summary: &Summary) -> String {
    format!(
        "{} URLs detected with {} external URLs and {} internal URLs.",
        summary.total_urls, summary.external_urls, summary.internal_urls
    )
}

pub fn progress_line(session: &SessionState) -> String {
    let progress = session.progress();
    format!(
        "{} of {} URL(s) accessed and {} are inaccessible.",
        progress.accessed, progress.total, session.cumulative_inaccessible_count
    )
}

pub fn load_more_label(progress: &Progress) -> String {
    format!(
        "Access next {} of remaining {} URL(s)",
        progress.next_batch, progress.remaining
    )
}
