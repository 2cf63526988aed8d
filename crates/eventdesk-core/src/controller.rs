// ── Controller ──
//
// Single entry point consumers use to reach the event service. Owns the
// HTTP client and the organiser identity, converts wire types into the
// domain model, and routes every `Command` to its endpoint(s).

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use eventdesk_api::transport::{TlsMode, TransportConfig};
use eventdesk_api::EventClient;

use crate::command::{Command, CommandResult};
use crate::config::{ClientConfig, TlsVerification};
use crate::error::CoreError;
use crate::modal::{EditModal, ModalTab, SaveOutcome};
use crate::model::{Event, TicketDetails};
use crate::store::EventStore;

/// Cheaply cloneable handle to the event service.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: ClientConfig,
    client: EventClient,
}

impl Controller {
    /// Build the HTTP client for `config`. No request is sent yet.
    pub fn new(config: ClientConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            tls: match &config.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: config.timeout,
            token: config.token.clone(),
        };
        let client = EventClient::new(config.url.clone(), &transport)?;
        Ok(Self {
            inner: Arc::new(ControllerInner { config, client }),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn organiser_id(&self) -> &str {
        &self.inner.config.organiser_id
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Fetch the organiser's full event collection.
    ///
    /// Documents that cannot be read as events (missing id, unparseable
    /// schedule) are logged and left out; the rest of the list still loads.
    pub async fn list_events(&self) -> Result<Vec<Event>, CoreError> {
        let documents = self.inner.client.list_events(self.organiser_id()).await?;
        let fetched = documents.len();
        let events: Vec<Event> = documents
            .into_iter()
            .filter_map(|document| {
                let id = document.id().unwrap_or("<missing>").to_owned();
                Event::try_from(document)
                    .inspect_err(|e| warn!(event_id = %id, error = %e, "skipping unreadable event"))
                    .ok()
            })
            .collect();
        debug!(fetched, kept = events.len(), "fetched events");
        Ok(events)
    }

    /// Fetch one event by id (from the full collection).
    pub async fn get_event(&self, event_id: &str) -> Result<Event, CoreError> {
        self.list_events()
            .await?
            .into_iter()
            .find(|e| e.id == event_id)
            .ok_or_else(|| CoreError::EventNotFound {
                identifier: event_id.to_owned(),
            })
    }

    /// Fetch ticket pricing for one event.
    pub async fn ticket_details(&self, event_id: &str) -> Result<TicketDetails, CoreError> {
        Ok(self.inner.client.get_ticket_details(event_id).await?)
    }

    /// Re-fetch into `store`, replacing its collection on success.
    pub async fn refresh(&self, store: &mut EventStore) -> Result<(), CoreError> {
        store.begin_load();
        match self.list_events().await {
            Ok(events) => {
                store.apply_snapshot(events, Utc::now());
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "event fetch failed");
                store.apply_error(&e);
                Err(e)
            }
        }
    }

    // ── Command execution ────────────────────────────────────────────

    /// Execute a write against the service.
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        let client = &self.inner.client;
        let event_id = cmd.event_id().to_owned();

        let result = match cmd {
            Command::UpdateBasicDetails { event_id, details } => {
                client.update_details(&event_id, &details).await?;
                CommandResult::Ok
            }
            Command::UpdateTicketDetails(request) => {
                client.update_ticket_details(&request).await?;
                CommandResult::Ok
            }
            Command::SavePoster { event_id, file } => {
                // The association only runs once the upload has succeeded.
                // An upload whose association then fails stays orphaned.
                let poster_url = client.upload_poster_file(&file).await?;
                client.update_poster_url(&event_id, &poster_url).await?;
                CommandResult::PosterSaved { poster_url }
            }
            Command::DeleteEvent { event_id } => {
                client.delete_event(&event_id).await?;
                CommandResult::Ok
            }
        };

        info!(%event_id, "command completed");
        Ok(result)
    }

    /// Delete an event, then re-fetch the collection into `store`.
    ///
    /// Only the delete can fail the call. A failed re-fetch after a
    /// successful delete is left in `store` as its load error.
    pub async fn delete_and_refresh(
        &self,
        event_id: &str,
        store: &mut EventStore,
    ) -> Result<(), CoreError> {
        self.execute(Command::DeleteEvent {
            event_id: event_id.to_owned(),
        })
        .await?;
        if let Err(e) = self.refresh(store).await {
            debug!(%event_id, error = %e, "re-fetch after delete failed");
        }
        Ok(())
    }

    /// Load ticket details into a freshly opened modal.
    pub async fn load_tickets(&self, modal: &mut EditModal) {
        let result = self.ticket_details(modal.event_id()).await;
        if let Err(ref e) = result {
            warn!(event_id = modal.event_id(), error = %e, "ticket details fetch failed");
        }
        modal.tickets_loaded(result);
    }

    /// Run one tab's full save cycle against the service.
    ///
    /// Every failure comes back as `Err`. Remote failures are folded into
    /// the modal first, so it is back in `Ready` with `last_error` set.
    pub async fn save(&self, modal: &mut EditModal, tab: ModalTab) -> Result<SaveOutcome, CoreError> {
        let cmd = modal.begin_save(tab, Utc::now())?;
        let result = self.execute(cmd).await;
        let failure = result.as_ref().err().cloned();
        let outcome = modal.finish_save(tab, result);
        match failure {
            Some(e) => {
                if e.is_rejection() {
                    info!(event_id = modal.event_id(), %tab, reason = %e, "save rejected by the service");
                } else {
                    warn!(event_id = modal.event_id(), %tab, error = %e, "save failed");
                }
                Err(e)
            }
            None => Ok(outcome),
        }
    }
}
