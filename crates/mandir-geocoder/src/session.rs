//! Last-write-wins holder for a shell's current search results.
//!
//! Every submission takes a new generation. A finished search publishes only
//! if no newer submission has started since; otherwise its result is dropped
//! and the caller gets [`Completion::Superseded`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use mandir_core::{RawSearchRequest, SearchError, Temple};
use tokio::sync::watch;

use crate::geocoder::Geocoder;
use crate::pipeline::{search_temples, SearchOutcome};
use crate::provider::GeocodingProvider;

/// What subscribers currently see.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    Searching {
        generation: u64,
    },
    Ready {
        generation: u64,
        outcome: Arc<SearchOutcome>,
    },
    Failed {
        generation: u64,
        error: SearchError,
    },
}

impl SessionState {
    #[must_use]
    pub fn generation(&self) -> u64 {
        match self {
            Self::Idle => 0,
            Self::Searching { generation }
            | Self::Ready { generation, .. }
            | Self::Failed { generation, .. } => *generation,
        }
    }
}

/// Whether a finished search reached subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Published,
    Superseded,
}

/// Handle for one in-flight search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl Ticket {
    #[must_use]
    pub fn generation(self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
pub struct SearchSession {
    latest: AtomicU64,
    state: watch::Sender<SessionState>,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchSession {
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(SessionState::Idle);
        Self {
            latest: AtomicU64::new(0),
            state,
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn current(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Start a new search, superseding any still in flight.
    pub fn begin(&self) -> Ticket {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_replace(SessionState::Searching { generation });
        Ticket(generation)
    }

    /// Publish `result` if `ticket` is still the newest submission.
    pub fn finish(
        &self,
        ticket: Ticket,
        result: Result<SearchOutcome, SearchError>,
    ) -> Completion {
        let generation = ticket.generation();
        let published = self.state.send_if_modified(|state| {
            if generation != self.latest.load(Ordering::SeqCst)
                || generation < state.generation()
            {
                return false;
            }
            *state = match result {
                Ok(outcome) => SessionState::Ready {
                    generation,
                    outcome: Arc::new(outcome),
                },
                Err(error) => SessionState::Failed { generation, error },
            };
            true
        });

        if published {
            Completion::Published
        } else {
            tracing::debug!(generation, "discarding superseded search result");
            Completion::Superseded
        }
    }

    /// Run one search through the pipeline and publish it unless superseded.
    pub async fn submit<P: GeocodingProvider>(
        &self,
        geocoder: &Geocoder<P>,
        temples: &[Temple],
        raw: &RawSearchRequest,
    ) -> Completion {
        let ticket = self.begin();
        let result = search_temples(geocoder, temples, raw).await;
        self.finish(ticket, result)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use mandir_core::{Coordinates, SortKey};

    use super::*;
    use crate::error::GeocodeError;
    use crate::provider::GeocodeQuery;

    /// Answers every city with a fixed point; `"slow"` takes a while.
    struct DelayProvider;

    impl GeocodingProvider for DelayProvider {
        async fn lookup(&self, query: &GeocodeQuery) -> Result<Option<Coordinates>, GeocodeError> {
            if query.value() == "slow" {
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
            Ok(Some(Coordinates::new(40.0, -74.0)))
        }
    }

    fn city(name: &str) -> RawSearchRequest {
        RawSearchRequest {
            city: Some(name.to_string()),
            ..RawSearchRequest::default()
        }
    }

    fn outcome() -> SearchOutcome {
        SearchOutcome {
            origin: Coordinates::new(0.0, 0.0),
            sort: SortKey::Distance,
            temples: Vec::new(),
        }
    }

    #[test]
    fn stale_ticket_is_superseded() {
        let session = SearchSession::new();
        let first = session.begin();
        let second = session.begin();

        assert_eq!(session.finish(first, Ok(outcome())), Completion::Superseded);
        assert_eq!(session.current(), SessionState::Searching { generation: 2 });

        assert_eq!(
            session.finish(second, Err(SearchError::GeocodingFailure)),
            Completion::Published
        );
        assert_eq!(
            session.current(),
            SessionState::Failed {
                generation: 2,
                error: SearchError::GeocodingFailure
            }
        );
    }

    #[test]
    fn begin_marks_searching() {
        let session = SearchSession::new();
        assert_eq!(session.current(), SessionState::Idle);
        let ticket = session.begin();
        assert_eq!(ticket.generation(), 1);
        assert_eq!(session.current(), SessionState::Searching { generation: 1 });
    }

    #[tokio::test]
    async fn slower_older_search_never_overwrites_newer() {
        let session = SearchSession::new();
        let geocoder = Geocoder::new(DelayProvider);
        let mut rx = session.subscribe();

        let slow_req = city("slow");
        let fast_req = city("fast");
        let (slow, fast) = tokio::join!(
            session.submit(&geocoder, &[], &slow_req),
            session.submit(&geocoder, &[], &fast_req),
        );

        assert_eq!(slow, Completion::Superseded);
        assert_eq!(fast, Completion::Published);
        assert!(rx.has_changed().unwrap());
        assert!(matches!(
            &*rx.borrow_and_update(),
            SessionState::Ready { generation: 2, .. }
        ));
    }

    #[tokio::test]
    async fn invalid_input_is_published_as_failure() {
        let session = SearchSession::new();
        let geocoder = Geocoder::new(DelayProvider);
        let completion = session
            .submit(&geocoder, &[], &RawSearchRequest::default())
            .await;
        assert_eq!(completion, Completion::Published);
        assert!(matches!(
            session.current(),
            SessionState::Failed {
                error: SearchError::InvalidInput(_),
                ..
            }
        ));
    }
}
