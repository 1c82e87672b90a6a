use crate::error::FetchError;
use crate::model::ScrapeResult;
use crate::session::{SessionState, merge};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Idle,
    LoadingInitial,
    LoadingMore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Submit,
    LoadMore,
}

/// Handle for one issued request. A completion is only applied if its ticket
/// still belongs to the current generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    kind: RequestKind,
}

impl Ticket {
    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What happened when a completion was handed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Failed,
    /// Superseded by a later submission and dropped.
    Stale,
}

/// Session slot, request status and error banner, driven by explicit
/// begin/complete transitions around each network call.
#[derive(Debug, Default)]
pub struct FetchState {
    session: Option<SessionState>,
    status: Option<RequestKind>,
    error: Option<String>,
    generation: u64,
}

impl FetchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&SessionState> {
        self.session.as_ref()
    }

    pub fn status(&self) -> FetchStatus {
        match self.status {
            None => FetchStatus::Idle,
            Some(RequestKind::Submit) => FetchStatus::LoadingInitial,
            Some(RequestKind::LoadMore) => FetchStatus::LoadingMore,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Whether the load-more action should be offered right now.
    pub fn can_load_more(&self) -> bool {
        self.status.is_none() && self.session.as_ref().is_some_and(SessionState::has_more)
    }

    /// Starts a submission. Returns `None` for a blank URL. Any request still
    /// in flight becomes stale.
    pub fn begin_submit(&mut self, url: &str) -> Option<Ticket> {
        if url.trim().is_empty() {
            return None;
        }

        self.generation += 1;
        self.error = None;
        self.status = Some(RequestKind::Submit);
        debug!("Submit #{} for {}", self.generation, url.trim());

        Some(Ticket {
            generation: self.generation,
            kind: RequestKind::Submit,
        })
    }

    pub fn complete_submit(
        &mut self,
        ticket: Ticket,
        result: Result<ScrapeResult, FetchError>,
    ) -> Completion {
        if self.is_stale(ticket) {
            return Completion::Stale;
        }
        self.status = None;

        match result {
            Ok(first) => {
                debug!(
                    "Session {} started with {} URLs",
                    first.request_id,
                    first.page().urls.len()
                );
                self.session = Some(SessionState::from_first_page(first));
                Completion::Applied
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Completion::Failed
            }
        }
    }

    /// Starts a load-more. Returns the ticket and the relative path to fetch,
    /// or `None` when there is nothing to load or a request is in flight.
    pub fn begin_load_more(&mut self) -> Option<(Ticket, String)> {
        if self.status.is_some() {
            return None;
        }
        let next_page = self
            .session
            .as_ref()?
            .latest_pagination
            .next_page
            .clone()
            .filter(|p| !p.is_empty())?;

        self.status = Some(RequestKind::LoadMore);
        Some((
            Ticket {
                generation: self.generation,
                kind: RequestKind::LoadMore,
            },
            next_page,
        ))
    }

    pub fn complete_load_more(
        &mut self,
        ticket: Ticket,
        result: Result<ScrapeResult, FetchError>,
    ) -> Completion {
        if self.is_stale(ticket) {
            return Completion::Stale;
        }
        self.status = None;

        match result {
            Ok(page) => {
                let Some(existing) = self.session.take() else {
                    return Completion::Stale;
                };
                if existing.request_id != page.request_id {
                    warn!(
                        "Merging page of request {} into session {}",
                        page.request_id, existing.request_id
                    );
                }
                self.session = Some(merge(existing, page));
                Completion::Applied
            }
            Err(e) => {
                self.error = Some(format!("Error fetching more data: [{}]", e.detail()));
                Completion::Failed
            }
        }
    }

    fn is_stale(&self, ticket: Ticket) -> bool {
        let stale = ticket.generation != self.generation
            || self.status != Some(ticket.kind);
        if stale {
            debug!(
                "Dropping stale {:?} completion (generation {} vs {})",
                ticket.kind, ticket.generation, self.generation
            );
        }
        stale
    }
}
