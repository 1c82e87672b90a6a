use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// One response of the scraping API, either the initial scrape or a
/// follow-up page of the same request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeResult {
    pub request_id: String,
    pub pagination: Pagination,
    #[serde(rename = "scraped")]
    pub summary: Summary,
}

impl ScrapeResult {
    /// The per-page part of the response.
    pub fn page(&self) -> &PageOfUrls {
        &self.summary.paginated
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page_size: u64,
    pub current_page: u64,
    pub total_pages: u64,
    /// Relative path of the next page. `None` (or absent) on the last page.
    #[serde(default)]
    pub next_page: Option<String>,
}

impl Pagination {
    pub fn has_next(&self) -> bool {
        self.next_page.as_deref().is_some_and(|p| !p.is_empty())
    }
}

/// Page analysis; identical across all pages of one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub html_version: String,
    /// Heading level ("h1".."h6") to count.
    #[serde(default, deserialize_with = "null_as_default")]
    pub headings: BTreeMap<String, u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contains_login_form: bool,
    pub total_urls: u64,
    pub internal_urls: u64,
    pub external_urls: u64,
    pub paginated: PageOfUrls,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageOfUrls {
    #[serde(default, deserialize_with = "null_as_default")]
    pub urls: Vec<UrlRecord>,
    #[serde(default, rename = "inaccessible_urls", deserialize_with = "null_as_default")]
    pub inaccessible_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRecord {
    pub url: String,
    /// 0 when the upstream request never completed.
    #[serde(default, deserialize_with = "null_as_default")]
    pub http_status: u16,
    #[serde(default)]
    pub error: Option<String>,
}

impl UrlRecord {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.http_status)
    }

    pub fn is_inaccessible(&self) -> bool {
        self.error.is_some()
    }
}

/// Treats an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
