// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

pub use handlers::{ScrapeOptions, scrape_options, scrape_report, write_report};
