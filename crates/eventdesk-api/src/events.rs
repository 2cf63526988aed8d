// Event list, basic-details and delete endpoints.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::client::EventClient;
use crate::error::Error;
use crate::models::EventDocument;

impl EventClient {
    /// List every event owned by an organiser, one raw document per row.
    ///
    /// `GET /api/event/get-events/{organiserId}`
    pub async fn list_events(&self, organiser_id: &str) -> Result<Vec<EventDocument>, Error> {
        let url = self.event_url(&["get-events", organiser_id])?;
        let events: Option<Vec<EventDocument>> = self.get(url).await?;
        Ok(events.unwrap_or_default())
    }

    /// Replace the editable basic details of an event.
    ///
    /// `POST /api/event/update-details` with `{eventId, details}`
    pub async fn update_details(
        &self,
        event_id: &str,
        details: &Map<String, Value>,
    ) -> Result<(), Error> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Body<'a> {
            event_id: &'a str,
            details: &'a Map<String, Value>,
        }

        debug!(event_id, fields = details.len(), "updating event details");
        let url = self.event_url(&["update-details"])?;
        let _: Option<Value> = self
            .post(url, &Body { event_id, details })
            .await?;
        Ok(())
    }

    /// Permanently delete an event.
    ///
    /// `POST /api/event/delete-event` with `{eventId}`
    pub async fn delete_event(&self, event_id: &str) -> Result<(), Error> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Body<'a> {
            event_id: &'a str,
        }

        debug!(event_id, "deleting event");
        let url = self.event_url(&["delete-event"])?;
        let _: Option<Value> = self.post(url, &Body { event_id }).await?;
        Ok(())
    }
}
