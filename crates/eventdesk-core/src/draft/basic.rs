// ── Basic details draft ──

use chrono::{DateTime, Local, TimeZone, Utc};
use serde_json::{Map, Number, Value};

use crate::error::CoreError;
use crate::localtime;
use crate::model::{Event, EventType};

/// Server-owned keys that never appear in the basic details form.
pub const EXCLUDED_FIELDS: &[&str] = &[
    // identifiers
    "_id",
    "id",
    "eventId",
    "__v",
    // timestamps
    "createdAt",
    "updatedAt",
    // verification / publish / online flags
    "isVerified",
    "verified",
    "isPublished",
    "published",
    "isOnline",
    // organiser reference
    "organiser",
    "organiserId",
    "organizer",
    "organizerId",
    // aggregate counters
    "ticketsSold",
    "totalTicketsSold",
    "totalRevenue",
    "totalBookings",
    "bookingCount",
    "views",
    // poster
    "posterUrl",
];

/// Fields edited as local wall-clock time.
pub const SCHEDULE_FIELDS: [&str; 2] = ["scheduleStart", "scheduleEnd"];

const TYPE_FIELD: &str = "type";

/// Project a document onto its editable scalar fields.
///
/// Keeps every string, number and boolean whose key is not excluded;
/// objects, arrays and nulls are dropped.
pub fn editable_fields(source: &Map<String, Value>) -> Map<String, Value> {
    source
        .iter()
        .filter(|(key, value)| {
            !EXCLUDED_FIELDS.contains(&key.as_str())
                && matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_))
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Editable projection of one event's basic details.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicDetailsDraft {
    fields: Map<String, Value>,
    baseline: Map<String, Value>,
}

impl BasicDetailsDraft {
    pub fn from_event(event: &Event) -> Self {
        let fields = editable_fields(&event.fields);
        Self {
            baseline: fields.clone(),
            fields,
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// The whole draft as submitted to `update-details`.
    pub fn details(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn is_dirty(&self) -> bool {
        self.fields != self.baseline
    }

    pub fn is_schedule_field(key: &str) -> bool {
        SCHEDULE_FIELDS.contains(&key)
    }

    /// Text shown in the form for `key`, in the machine's time zone.
    pub fn display_value(&self, key: &str) -> String {
        self.display_value_in(key, &Local)
    }

    /// Text shown in the form for `key`; schedule fields render in `tz`.
    pub fn display_value_in<Tz: TimeZone>(&self, key: &str, tz: &Tz) -> String {
        match self.fields.get(key) {
            Some(Value::String(s)) if Self::is_schedule_field(key) => s
                .parse::<DateTime<Utc>>()
                .map_or_else(|_| s.clone(), |at| localtime::to_local_input(at, tz)),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }

    /// Replace one field from form text, in the machine's time zone.
    pub fn set_text(&mut self, key: &str, input: &str) -> Result<(), CoreError> {
        self.set_text_in(key, input, &Local)
    }

    /// Replace one field from form text.
    ///
    /// The new value keeps the JSON kind of the current one. Schedule fields
    /// are read as local time in `tz` and stored as absolute UTC.
    pub fn set_text_in<Tz: TimeZone>(
        &mut self,
        key: &str,
        input: &str,
        tz: &Tz,
    ) -> Result<(), CoreError> {
        let current = self
            .fields
            .get(key)
            .ok_or_else(|| CoreError::validation(format!("{key} is not an editable field")))?;

        let value = if Self::is_schedule_field(key) {
            Value::String(localtime::to_wire(localtime::from_local_input(input, tz)?))
        } else if key == TYPE_FIELD {
            let kind: EventType = input.trim().parse().map_err(|_| {
                CoreError::validation(format!(
                    "unknown event type {input:?} (expected seating, online, open or register)"
                ))
            })?;
            Value::String(kind.to_string())
        } else {
            match current {
                Value::Number(_) => Value::Number(parse_number(key, input)?),
                Value::Bool(_) => Value::Bool(parse_bool(key, input)?),
                _ => Value::String(input.to_owned()),
            }
        };

        self.fields.insert(key.to_owned(), value);
        Ok(())
    }

    /// Flip a boolean field.
    pub fn toggle(&mut self, key: &str) -> Result<(), CoreError> {
        match self.fields.get_mut(key) {
            Some(Value::Bool(b)) => {
                *b = !*b;
                Ok(())
            }
            _ => Err(CoreError::validation(format!("{key} is not a yes/no field"))),
        }
    }

    /// Start times before end times, checked before submitting.
    pub fn validate(&self) -> Result<(), CoreError> {
        let parse = |key: &str| {
            self.fields
                .get(key)
                .and_then(Value::as_str)
                .and_then(|s| s.parse::<DateTime<Utc>>().ok())
        };
        match (parse(SCHEDULE_FIELDS[0]), parse(SCHEDULE_FIELDS[1])) {
            (Some(start), Some(end)) if start > end => {
                Err(CoreError::validation("event must not end before it starts"))
            }
            _ => Ok(()),
        }
    }
}

fn parse_number(key: &str, input: &str) -> Result<Number, CoreError> {
    let trimmed = input.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return Ok(Number::from(i));
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .ok_or_else(|| CoreError::validation(format!("{key} must be a number, got {input:?}")))
}

fn parse_bool(key: &str, input: &str) -> Result<bool, CoreError> {
    match input.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" | "on" => Ok(true),
        "false" | "no" | "n" | "0" | "off" => Ok(false),
        _ => Err(CoreError::validation(format!(
            "{key} must be yes or no, got {input:?}"
        ))),
    }
}
