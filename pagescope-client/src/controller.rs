use crate::client::ScrapeClient;
use pagescope_core::{Completion, FetchState, FetchStatus, SessionState};
use tracing::{debug, info};

/// Drives [`FetchState`] with real requests, one at a time. Each operation
/// awaits its response before returning, so callers holding `&mut self`
/// can never have two requests in flight.
pub struct FetchController {
    client: ScrapeClient,
    state: FetchState,
}

impl FetchController {
    pub fn new(client: ScrapeClient) -> Self {
        Self {
            client,
            state: FetchState::new(),
        }
    }

    pub fn client(&self) -> &ScrapeClient {
        &self.client
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    pub fn session(&self) -> Option<&SessionState> {
        self.state.session()
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error()
    }

    pub fn status(&self) -> FetchStatus {
        self.state.status()
    }

    /// Scrapes `url`. Returns `None` without issuing a request when `url` is
    /// blank.
    pub async fn submit(&mut self, url: &str) -> Option<Completion> {
        let url = url.trim();
        let ticket = self.state.begin_submit(url)?;
        let result = self.client.scrape(url).await;
        Some(self.state.complete_submit(ticket, result))
    }

    /// Loads the next page. Returns `None` without issuing a request when
    /// there is no next page.
    pub async fn load_more(&mut self) -> Option<Completion> {
        let (ticket, next_page) = self.state.begin_load_more()?;
        let result = self.client.fetch_page(&next_page).await;
        Some(self.state.complete_load_more(ticket, result))
    }

    /// Keeps loading pages until the last one, a failure, or `limit`
    /// additional pages. Returns how many pages were merged.
    pub async fn load_pages(&mut self, limit: Option<usize>) -> usize {
        let mut loaded = 0;
        while limit.is_none_or(|max| loaded < max) {
            match self.load_more().await {
                Some(Completion::Applied) => loaded += 1,
                Some(outcome) => {
                    debug!("Stopping pagination after {:?}", outcome);
                    break;
                }
                None => break,
            }
        }
        info!("Loaded {} additional page(s)", loaded);
        loaded
    }

    pub fn into_state(self) -> FetchState {
        self.state
    }
}
