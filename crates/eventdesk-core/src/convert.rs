// ── Wire → domain conversion ──

use eventdesk_api::EventDocument;

use crate::model::Event;

impl TryFrom<EventDocument> for Event {
    type Error = serde_json::Error;

    /// `fields` is the document as received (`_id`, `type`,
    /// `scheduleStart`...), so nothing the server omitted is invented.
    fn try_from(document: EventDocument) -> Result<Self, Self::Error> {
        let record = document.record()?;
        Ok(Self {
            id: record.id,
            name: record.name,
            event_type: record.event_type,
            schedule_start: record.schedule_start,
            schedule_end: record.schedule_end,
            poster_url: record.poster_url,
            fields: document.into_fields(),
        })
    }
}
