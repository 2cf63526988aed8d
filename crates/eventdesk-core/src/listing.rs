// ── Event list: filtering, ordering, empty states ──
//
// Pure functions over whatever the list view currently holds. Generic over
// `Borrow<Event>` so they work on `Arc<Event>` snapshots and plain slices.

use std::borrow::Borrow;

use chrono::{DateTime, Utc};

use crate::model::{Event, EventStatus, EventType, derive_status};

/// Client-side list filter. `None` means "any".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventFilter {
    pub event_type: Option<EventType>,
    pub status: Option<EventStatus>,
}

impl EventFilter {
    pub fn is_empty(&self) -> bool {
        self.event_type.is_none() && self.status.is_none()
    }

    pub fn matches(&self, event: &Event, now: DateTime<Utc>) -> bool {
        self.event_type.is_none_or(|kind| event.has_type(kind))
            && self.status.is_none_or(|s| derive_status(event, now) == s)
    }
}

/// Keep the events matching `filter`, preserving order.
pub fn filter<E>(events: &[E], filter: &EventFilter, now: DateTime<Utc>) -> Vec<E>
where
    E: Borrow<Event> + Clone,
{
    events
        .iter()
        .filter(|e| filter.matches(Borrow::<Event>::borrow(*e), now))
        .cloned()
        .collect()
}

/// Stable sort by status priority, then start time ascending.
pub fn sort<E: Borrow<Event>>(mut events: Vec<E>, now: DateTime<Utc>) -> Vec<E> {
    events.sort_by_key(|e| {
        let e: &Event = e.borrow();
        (derive_status(e, now).rank(), e.schedule_start)
    });
    events
}

/// Why the visible list is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// The organiser has no events at all.
    NoEvents,
    /// Events exist but the filters removed all of them.
    NoMatches,
}

impl EmptyState {
    pub fn message(self) -> &'static str {
        match self {
            Self::NoEvents => "No events yet. Create your first event to get started.",
            Self::NoMatches => "No events match the current filters.",
        }
    }
}

/// What the list view renders.
#[derive(Debug, Clone, PartialEq)]
pub enum ListView<E> {
    Empty(EmptyState),
    Events(Vec<E>),
}

impl<E> ListView<E> {
    pub fn events(&self) -> &[E] {
        match self {
            Self::Empty(_) => &[],
            Self::Events(events) => events,
        }
    }
}

/// Filter then sort, resolving the empty-state policy.
pub fn view<E>(events: &[E], f: &EventFilter, now: DateTime<Utc>) -> ListView<E>
where
    E: Borrow<Event> + Clone,
{
    if events.is_empty() {
        return ListView::Empty(EmptyState::NoEvents);
    }
    let visible = sort(filter(events, f, now), now);
    if visible.is_empty() {
        ListView::Empty(EmptyState::NoMatches)
    } else {
        ListView::Events(visible)
    }
}
