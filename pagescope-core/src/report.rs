// Report generation from a scrape session

use crate::display::{
    error_label, heading_label, load_more_label, progress_line, status_label, truncate_url,
    url_counts_line, yes_no,
};
use crate::session::SessionState;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Markdown,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            _ => None,
        }
    }
}

pub fn generate_report(
    session: &SessionState,
    target: &str,
    format: ReportFormat,
) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(session, target)),
        ReportFormat::Json => generate_json_report(session, target),
        ReportFormat::Markdown => Ok(generate_markdown_report(session, target)),
    }
}

pub fn generate_text_report(session: &SessionState, target: &str) -> String {
    let summary = &session.summary;
    let mut report = String::new();

    report.push_str(RULE);
    report.push('\n');
    report.push_str("                           PAGESCOPE SCRAPE REPORT\n");
    report.push_str(RULE);
    report.push_str("\n\n");

    report.push_str(&format!("Target:       {}\n", target));
    report.push_str(&format!("Request ID:   {}\n", session.request_id));
    report.push_str(&format!(
        "Pages:        {} of {} loaded\n\n",
        session.loaded_page_count, session.latest_pagination.total_pages
    ));

    report.push_str(RULE);
    report.push_str("\nPAGE INFORMATION\n");
    report.push_str(RULE);
    report.push_str("\n\n");

    report.push_str(&format!("  {:<22}{}\n", "HTML Version:", summary.html_version));
    report.push_str(&format!("  {:<22}{}\n", "Title:", summary.title));
    for (level, count) in &summary.headings {
        report.push_str(&format!("  {:<22}{}\n", format!("{}:", heading_label(level)), count));
    }
    report.push_str(&format!(
        "  {:<22}{}\n\n",
        "Contains Login Form:",
        yes_no(summary.contains_login_form)
    ));

    report.push_str(RULE);
    report.push_str("\nURL INSIGHTS\n");
    report.push_str(RULE);
    report.push_str("\n\n");

    report.push_str(&format!("  {}\n", url_counts_line(summary)));
    report.push_str(&format!("  {}\n", progress_line(session)));
    if session.has_more() {
        report.push_str(&format!("  {}\n", load_more_label(&session.progress())));
    }
    report.push('\n');

    report.push_str(RULE);
    report.push_str("\nURLS\n");
    report.push_str(RULE);
    report.push_str("\n\n");

    if session.accumulated_urls.is_empty() {
        report.push_str("  (none)\n");
    }
    for (idx, record) in session.accumulated_urls.iter().enumerate() {
        let marker = if record.is_success() { "✓" } else { "✗" };
        report.push_str(&format!(
            "{:>5}  {} {:<14} {}\n",
            idx + 1,
            marker,
            status_label(record),
            truncate_url(&record.url)
        ));
        if let Some(ref error) = record.error {
            report.push_str(&format!("{:>7}  {}\n", "", error));
        }
    }

    report.push('\n');
    report.push_str(RULE);
    report.push_str("\n                               End of Report\n");
    report.push_str(RULE);
    report.push('\n');

    report
}

pub fn generate_json_report(
    session: &SessionState,
    target: &str,
) -> Result<String, serde_json::Error> {
    let progress = session.progress();
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "pagescope",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json"
            },
            "target": target,
            "request_id": session.request_id,
            "pagination": session.latest_pagination,
            "page": {
                "title": session.summary.title,
                "html_version": session.summary.html_version,
                "headings": session.summary.headings,
                "contains_login_form": session.summary.contains_login_form
            },
            "urls": {
                "total": session.summary.total_urls,
                "internal": session.summary.internal_urls,
                "external": session.summary.external_urls,
                "loaded_pages": session.loaded_page_count,
                "accessed": progress.accessed,
                "remaining": progress.remaining,
                "inaccessible": session.cumulative_inaccessible_count,
                "records": session.accumulated_urls
            }
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn generate_markdown_report(session: &SessionState, target: &str) -> String {
    let summary = &session.summary;
    let mut report = String::new();

    report.push_str(&format!("# Scrape report: {}\n\n", target));
    report.push_str(&format!("Request ID: `{}`\n\n", session.request_id));

    report.push_str("## Page Information\n\n");
    report.push_str("| Field | Value |\n|---|---|\n");
    report.push_str(&format!("| HTML Version | {} |\n", escape_cell(&summary.html_version)));
    report.push_str(&format!("| Title | {} |\n", escape_cell(&summary.title)));
    for (level, count) in &summary.headings {
        report.push_str(&format!("| {} | {} |\n", heading_label(level), count));
    }
    report.push_str(&format!(
        "| Contains Login Form | {} |\n\n",
        yes_no(summary.contains_login_form)
    ));

    report.push_str("## URL Insights\n\n");
    report.push_str(&format!("{}\n\n", url_counts_line(summary)));
    report.push_str(&format!("{}\n\n", progress_line(session)));

    report.push_str("## URLs\n\n");
    report.push_str("| # | URL | Status | Error |\n|---|---|---|---|\n");
    for (idx, record) in session.accumulated_urls.iter().enumerate() {
        report.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            idx + 1,
            escape_cell(&truncate_url(&record.url)),
            status_label(record),
            escape_cell(error_label(record))
        ));
    }

    report
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
