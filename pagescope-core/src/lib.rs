pub mod config;
pub mod display;
pub mod error;
pub mod fetch;
pub mod model;
pub mod report;
pub mod session;

pub use config::Config;
pub use error::{ConfigError, FetchError};
pub use fetch::{Completion, FetchState, FetchStatus, Ticket};
pub use model::{PageOfUrls, Pagination, ScrapeResult, Summary, UrlRecord};
pub use session::{Progress, SessionState, merge};
