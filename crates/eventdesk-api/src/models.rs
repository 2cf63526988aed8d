// Event API wire types
//
// Every response is wrapped in `ApiResponse<T>`. The server stores events as
// loosely-shaped documents: `EventDocument` keeps a row verbatim and
// `EventRecord` models the fields the client reasons about. Ticket prices arrive as
// numbers or numeric strings depending on how they were last written, so the
// numeric fields deserialize leniently.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ── Response Envelope ────────────────────────────────────────────────

/// Standard response envelope.
///
/// ```json
/// { "success": true, "message": "optional", "data": { ... } }
/// ```
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

// ── Event ────────────────────────────────────────────────────────────

/// One event document as returned by `get-events`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub event_type: String,
    pub schedule_start: DateTime<Utc>,
    pub schedule_end: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    /// Every other field the server sent, preserved in payload order.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One `get-events` row exactly as the server sent it.
///
/// Rows are decoded one at a time with [`EventDocument::record`], so a
/// malformed document only costs that row.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct EventDocument(pub Value);

impl EventDocument {
    /// The document's id, if it carries a string `_id` (or `id`).
    pub fn id(&self) -> Option<&str> {
        self.0
            .get("_id")
            .or_else(|| self.0.get("id"))
            .and_then(Value::as_str)
    }

    /// Decode the typed view of this document.
    pub fn record(&self) -> Result<EventRecord, serde_json::Error> {
        EventRecord::deserialize(&self.0)
    }

    /// The document's fields in payload order, untouched.
    pub fn into_fields(self) -> Map<String, Value> {
        match self.0 {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}

// ── Ticket details ───────────────────────────────────────────────────

/// Flat (single price) vs categorized (named tiers with ticket counts).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingOption {
    #[default]
    Flat,
    Categorized,
}

/// One named price tier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorizedPrice {
    #[serde(rename = "type", default)]
    pub category: String,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub price: f64,
    #[serde(default, deserialize_with = "lenient::u32")]
    pub number_of_tickets: u32,
}

/// Ticket pricing for one event, fetched from `ticket-details/{eventId}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketDetails {
    #[serde(default)]
    pub pricing_option: PricingOption,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub flat_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::null_as_empty")]
    pub categorized_prices: Vec<CategorizedPrice>,
}

// ── Request bodies ───────────────────────────────────────────────────

/// Body of `POST /api/event/update-ticket-details`.
///
/// Only the price shape matching `pricing_option` is sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTicketDetailsRequest {
    pub event_id: String,
    pub pricing_option: PricingOption,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flat_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categorized_prices: Option<Vec<CategorizedPrice>>,
}

/// Numeric fields that tolerate strings, blanks, and nulls.
mod lenient {
    use serde::de::{Deserialize, Deserializer, Error};
    use serde_json::Value;

    fn number<'de, D: Deserializer<'de>>(value: Value) -> Result<Option<f64>, D::Error> {
        match value {
            Value::Null => Ok(None),
            Value::Number(n) => n
                .as_f64()
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("number out of range: {n}"))),
            Value::String(s) if s.trim().is_empty() => Ok(None),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|e| D::Error::custom(format!("invalid number {s:?}: {e}"))),
            other => Err(D::Error::custom(format!("expected a number, got {other}"))),
        }
    }

    pub fn f64<'de, D: Deserializer<'de>>(de: D) -> Result<f64, D::Error> {
        let value = Value::deserialize(de)?;
        Ok(number::<D>(value)?.unwrap_or_default())
    }

    pub fn opt_f64<'de, D: Deserializer<'de>>(de: D) -> Result<Option<f64>, D::Error> {
        let value = Value::deserialize(de)?;
        number::<D>(value)
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::as_conversions
    )]
    pub fn u32<'de, D: Deserializer<'de>>(de: D) -> Result<u32, D::Error> {
        let value = Value::deserialize(de)?;
        match number::<D>(value)? {
            None => Ok(0),
            Some(n) if n >= 0.0 && n <= f64::from(u32::MAX) && n.fract().abs() < f64::EPSILON => {
                Ok(n as u32)
            }
            Some(n) => Err(D::Error::custom(format!("invalid ticket count: {n}"))),
        }
    }

    pub fn null_as_empty<'de, D, T>(de: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Ok(Option::<Vec<T>>::deserialize(de)?.unwrap_or_default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn event_record_keeps_unknown_fields() {
        let record: EventRecord = serde_json::from_value(json!({
            "_id": "evt-1",
            "name": "Launch Night",
            "type": "seating",
            "scheduleStart": "2099-01-01T00:00:00.000Z",
            "scheduleEnd": "2099-01-02T00:00:00Z",
            "venue": "Hall A",
            "capacity": 300
        }))
        .unwrap();

        assert_eq!(record.id, "evt-1");
        assert_eq!(record.event_type, "seating");
        assert_eq!(record.poster_url, None);
        assert_eq!(record.extra.get("venue"), Some(&json!("Hall A")));
        assert_eq!(record.extra.get("capacity"), Some(&json!(300)));
    }

    #[test]
    fn event_record_accepts_plain_id() {
        let record: EventRecord = serde_json::from_value(json!({
            "id": "evt-2",
            "scheduleStart": "2099-01-01T00:00:00Z",
            "scheduleEnd": "2099-01-02T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(record.id, "evt-2");
        assert_eq!(record.name, "");
    }

    #[test]
    fn ticket_details_parse_string_prices() {
        let details: TicketDetails = serde_json::from_value(json!({
            "pricingOption": "categorized",
            "flatPrice": null,
            "categorizedPrices": [
                { "type": "VIP", "price": "120.5", "numberOfTickets": "40" },
                { "type": "General", "price": 30, "numberOfTickets": 200 },
                { "type": "Comp", "price": "", "numberOfTickets": null }
            ]
        }))
        .unwrap();

        assert_eq!(details.pricing_option, PricingOption::Categorized);
        assert_eq!(details.flat_price, None);
        assert_eq!(
            details.categorized_prices,
            vec![
                CategorizedPrice {
                    category: "VIP".into(),
                    price: 120.5,
                    number_of_tickets: 40
                },
                CategorizedPrice {
                    category: "General".into(),
                    price: 30.0,
                    number_of_tickets: 200
                },
                CategorizedPrice {
                    category: "Comp".into(),
                    price: 0.0,
                    number_of_tickets: 0
                },
            ]
        );
    }

    #[test]
    fn ticket_details_default_to_flat_when_empty() {
        let details: TicketDetails = serde_json::from_value(json!({})).unwrap();
        assert_eq!(details, TicketDetails::default());
    }

    #[test]
    fn fractional_ticket_count_is_rejected() {
        let result: Result<CategorizedPrice, _> =
            serde_json::from_value(json!({ "type": "VIP", "price": 1, "numberOfTickets": 2.5 }));
        assert!(result.is_err());
    }

    #[test]
    fn flat_update_omits_categorized_prices() {
        let body = UpdateTicketDetailsRequest {
            event_id: "evt-1".into(),
            pricing_option: PricingOption::Flat,
            flat_price: Some(25.0),
            categorized_prices: None,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "eventId": "evt-1", "pricingOption": "flat", "flatPrice": 25.0 })
        );
    }
}
