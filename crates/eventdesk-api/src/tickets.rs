// Ticket pricing endpoints.

use serde_json::Value;
use tracing::debug;

use crate::client::EventClient;
use crate::error::Error;
use crate::models::{TicketDetails, UpdateTicketDetailsRequest};

impl EventClient {
    /// Fetch the ticket pricing of one event.
    ///
    /// `GET /api/event/ticket-details/{eventId}`. An event that has never
    /// been priced comes back without `data` and yields the default
    /// (flat, no price).
    pub async fn get_ticket_details(&self, event_id: &str) -> Result<TicketDetails, Error> {
        let url = self.event_url(&["ticket-details", event_id])?;
        let details: Option<TicketDetails> = self.get(url).await?;
        Ok(details.unwrap_or_default())
    }

    /// Replace the ticket pricing of one event.
    ///
    /// `POST /api/event/update-ticket-details`
    pub async fn update_ticket_details(
        &self,
        request: &UpdateTicketDetailsRequest,
    ) -> Result<(), Error> {
        debug!(
            event_id = %request.event_id,
            pricing = ?request.pricing_option,
            "updating ticket details"
        );
        let url = self.event_url(&["update-ticket-details"])?;
        let _: Option<Value> = self.post(url, request).await?;
        Ok(())
    }
}
