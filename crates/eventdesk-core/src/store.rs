// ── Event list store ──
//
// The list view's event collection. It is only ever replaced wholesale by
// a completed fetch, never patched, so readers holding an older snapshot
// are unaffected by a refresh.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::CoreError;
use crate::listing::{self, EventFilter, ListView};
use crate::model::Event;

/// Where the most recent fetch stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded { at: DateTime<Utc> },
    /// The last fetch failed; the previous collection is still held.
    Failed { message: String },
}

/// Owner of the organiser's event collection.
#[derive(Debug, Clone)]
pub struct EventStore {
    events: Arc<Vec<Arc<Event>>>,
    state: LoadState,
}

impl Default for EventStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Vec::new()),
            state: LoadState::Idle,
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    /// Message of the last failed fetch, for the retry banner.
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            LoadState::Failed { message } => Some(message),
            _ => None,
        }
    }

    pub fn begin_load(&mut self) {
        self.state = LoadState::Loading;
    }

    /// Replace the whole collection with a fresh fetch.
    pub fn apply_snapshot(&mut self, events: Vec<Event>, at: DateTime<Utc>) {
        self.events = Arc::new(events.into_iter().map(Arc::new).collect());
        self.state = LoadState::Loaded { at };
    }

    pub fn apply_error(&mut self, error: &CoreError) {
        self.state = LoadState::Failed {
            message: error.to_string(),
        };
    }

    /// Fold a fetch result in.
    pub fn apply(&mut self, result: Result<Vec<Event>, CoreError>, at: DateTime<Utc>) {
        match result {
            Ok(events) => self.apply_snapshot(events, at),
            Err(e) => self.apply_error(&e),
        }
    }

    pub fn snapshot(&self) -> Arc<Vec<Arc<Event>>> {
        Arc::clone(&self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<Arc<Event>> {
        self.events.iter().find(|e| e.id == id).cloned()
    }

    /// Filtered, sorted view with the empty-state policy applied.
    pub fn view(&self, filter: &EventFilter, now: DateTime<Utc>) -> ListView<Arc<Event>> {
        listing::view(self.events.as_slice(), filter, now)
    }
}
