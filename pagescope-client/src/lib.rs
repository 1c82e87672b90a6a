pub mod client;
pub mod controller;
pub mod error;

pub use client::ScrapeClient;
pub use controller::FetchController;
pub use error::ClientError;
