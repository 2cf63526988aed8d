// ── Event domain types ──

use std::borrow::Borrow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// How attendees take part in an event.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EventType {
    Seating,
    Online,
    Open,
    Register,
}

/// Lifecycle phase computed from the current time. Never persisted.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum EventStatus {
    Upcoming,
    Ongoing,
    Completed,
}

impl EventStatus {
    /// Sort priority: ongoing first, then upcoming, then completed.
    pub fn rank(self) -> u8 {
        match self {
            Self::Ongoing => 0,
            Self::Upcoming => 1,
            Self::Completed => 2,
        }
    }
}

/// One event as the organiser sees it.
///
/// `fields` holds the complete server document (typed fields included) so
/// that edit drafts can project every scalar the server sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub id: String,
    pub name: String,
    /// Raw type label as stored by the server.
    pub event_type: String,
    pub schedule_start: DateTime<Utc>,
    pub schedule_end: DateTime<Utc>,
    pub poster_url: Option<String>,
    #[serde(skip)]
    pub fields: Map<String, Value>,
}

impl Event {
    /// Derived status at `now`.
    pub fn status_at(&self, now: DateTime<Utc>) -> EventStatus {
        derive_status(self, now)
    }

    /// The type label parsed case-insensitively, if it is a known type.
    pub fn kind(&self) -> Option<EventType> {
        self.event_type.parse().ok()
    }

    /// Case-insensitive comparison against a type filter.
    pub fn has_type(&self, kind: EventType) -> bool {
        self.event_type.eq_ignore_ascii_case(kind.as_ref())
    }

    /// Editing (and ticket changes) are only offered before the event starts.
    pub fn is_editable_at(&self, now: DateTime<Utc>) -> bool {
        self.status_at(now) == EventStatus::Upcoming
    }
}

/// Derive the display status of an event.
///
/// Both bounds are inclusive for `Ongoing`.
pub fn derive_status(event: impl Borrow<Event>, now: DateTime<Utc>) -> EventStatus {
    let event: &Event = event.borrow();
    if now < event.schedule_start {
        EventStatus::Upcoming
    } else if now > event.schedule_end {
        EventStatus::Completed
    } else {
        EventStatus::Ongoing
    }
}
