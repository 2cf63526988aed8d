// ── Edit modal state machine ──
//
//   Closed ─open→ Loading ─tickets→ Ready(tab) ─begin_save→ Saving(tab)
//                                      ▲                       │
//                                      └──── finish_save ──────┘ (or Closed)
//
// `Closed` is the absence of an `EditModal`: the owner holds an
// `Option<EditModal>` and dropping it discards every draft. The modal never
// performs I/O itself; `begin_save` hands back the `Command` to run and
// `finish_save` folds the outcome back in, so the same machine drives the
// synchronous CLI and the task-spawning TUI.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use strum::{Display, EnumIter};

use crate::command::{Command, CommandResult};
use crate::draft::{BasicDetailsDraft, PosterDraft, TicketDraft};
use crate::error::CoreError;
use crate::model::{Event, EventStatus, TicketDetails};

/// The three independently saved field groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum ModalTab {
    Basic,
    Ticket,
    Poster,
}

impl ModalTab {
    pub const ALL: [Self; 3] = [Self::Basic, Self::Ticket, Self::Poster];

    pub fn index(self) -> usize {
        match self {
            Self::Basic => 0,
            Self::Ticket => 1,
            Self::Poster => 2,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Progress of the separate ticket-details fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum TicketLoad {
    Loading,
    Loaded(TicketDraft),
    Failed(String),
}

/// Externally visible state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalState {
    Loading,
    Ready(ModalTab),
    Saving(ModalTab),
}

/// What the owner should do after a save completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Notify success and re-fetch the list. `close` ends the modal.
    Saved { message: &'static str, close: bool },
    /// Show the message; drafts are unchanged.
    Failed { message: String },
}

/// What an in-flight save submitted. Success re-baselines to this, not to
/// whatever the draft holds by the time the response lands.
#[derive(Debug, Clone)]
enum InFlight {
    Basic,
    Ticket(TicketDetails),
    Poster(PathBuf),
}

impl InFlight {
    fn tab(&self) -> ModalTab {
        match self {
            Self::Basic => ModalTab::Basic,
            Self::Ticket(_) => ModalTab::Ticket,
            Self::Poster(_) => ModalTab::Poster,
        }
    }
}

/// One open edit session for one event.
#[derive(Debug, Clone)]
pub struct EditModal {
    event: Arc<Event>,
    tab: ModalTab,
    saving: Option<InFlight>,
    basic: BasicDetailsDraft,
    ticket: TicketLoad,
    poster: PosterDraft,
    last_error: Option<String>,
}

impl EditModal {
    /// Open on `event`: partition basic details now, tickets load separately.
    pub fn open(event: Arc<Event>) -> Self {
        let basic = BasicDetailsDraft::from_event(&event);
        let poster = PosterDraft::new(event.poster_url.clone());
        Self {
            event,
            tab: ModalTab::Basic,
            saving: None,
            basic,
            ticket: TicketLoad::Loading,
            poster,
            last_error: None,
        }
    }

    pub fn event(&self) -> &Arc<Event> {
        &self.event
    }

    pub fn event_id(&self) -> &str {
        &self.event.id
    }

    pub fn state(&self) -> ModalState {
        match (&self.saving, &self.ticket) {
            (Some(sent), _) => ModalState::Saving(sent.tab()),
            (None, TicketLoad::Loading) => ModalState::Loading,
            (None, _) => ModalState::Ready(self.tab),
        }
    }

    pub fn is_saving(&self) -> bool {
        self.saving.is_some()
    }

    // ── Tabs ─────────────────────────────────────────────────────────

    pub fn tab(&self) -> ModalTab {
        self.tab
    }

    pub fn select_tab(&mut self, tab: ModalTab) {
        self.tab = tab;
    }

    pub fn next_tab(&mut self) {
        self.tab = self.tab.next();
    }

    pub fn prev_tab(&mut self) {
        self.tab = self.tab.prev();
    }

    // ── Drafts ───────────────────────────────────────────────────────

    pub fn basic(&self) -> &BasicDetailsDraft {
        &self.basic
    }

    pub fn basic_mut(&mut self) -> &mut BasicDetailsDraft {
        &mut self.basic
    }

    pub fn ticket_load(&self) -> &TicketLoad {
        &self.ticket
    }

    /// The ticket draft, once the fetch has resolved.
    pub fn ticket(&self) -> Option<&TicketDraft> {
        match &self.ticket {
            TicketLoad::Loaded(draft) => Some(draft),
            _ => None,
        }
    }

    pub fn ticket_mut(&mut self) -> Option<&mut TicketDraft> {
        match &mut self.ticket {
            TicketLoad::Loaded(draft) => Some(draft),
            _ => None,
        }
    }

    pub fn poster(&self) -> &PosterDraft {
        &self.poster
    }

    pub fn poster_mut(&mut self) -> &mut PosterDraft {
        &mut self.poster
    }

    /// Fold in the ticket-details fetch.
    pub fn tickets_loaded(&mut self, result: Result<TicketDetails, CoreError>) {
        self.ticket = match result {
            Ok(details) => TicketLoad::Loaded(TicketDraft::new(details)),
            Err(e) => TicketLoad::Failed(e.to_string()),
        };
    }

    /// Any draft differs from what was loaded.
    pub fn is_dirty(&self) -> bool {
        self.basic.is_dirty()
            || self.ticket().is_some_and(TicketDraft::is_dirty)
            || self.poster.is_dirty()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    // ── Gating ───────────────────────────────────────────────────────

    pub fn status_at(&self, now: DateTime<Utc>) -> EventStatus {
        self.event.status_at(now)
    }

    /// Ticket saves need loaded details and an upcoming event.
    pub fn can_save_tickets(&self, now: DateTime<Utc>) -> bool {
        self.ticket().is_some() && self.status_at(now) == EventStatus::Upcoming
    }

    // ── Save cycle ───────────────────────────────────────────────────

    /// Validate `tab` and enter `Saving(tab)`, returning the command to run.
    ///
    /// Errors leave the modal untouched and are also recorded as
    /// `last_error`.
    pub fn begin_save(&mut self, tab: ModalTab, now: DateTime<Utc>) -> Result<Command, CoreError> {
        let result = self.prepare(tab, now);
        match &result {
            Ok(cmd) => {
                self.saving = Some(match cmd {
                    Command::UpdateTicketDetails(_) => InFlight::Ticket(
                        self.ticket()
                            .map(|draft| draft.details().clone())
                            .unwrap_or_default(),
                    ),
                    Command::SavePoster { file, .. } => InFlight::Poster(file.clone()),
                    Command::UpdateBasicDetails { .. } | Command::DeleteEvent { .. } => {
                        InFlight::Basic
                    }
                });
                self.last_error = None;
            }
            Err(e) => self.last_error = Some(e.to_string()),
        }
        result
    }

    fn prepare(&self, tab: ModalTab, now: DateTime<Utc>) -> Result<Command, CoreError> {
        if let Some(active) = &self.saving {
            return Err(CoreError::SaveInProgress {
                tab: active.tab().to_string(),
            });
        }
        let event_id = self.event.id.clone();

        match tab {
            ModalTab::Basic => {
                self.basic.validate()?;
                Ok(Command::UpdateBasicDetails {
                    event_id,
                    details: self.basic.details().clone(),
                })
            }
            ModalTab::Ticket => {
                let status = self.status_at(now);
                if status != EventStatus::Upcoming {
                    return Err(CoreError::TicketsLocked { status });
                }
                let draft = self.ticket().ok_or(CoreError::TicketsNotLoaded)?;
                draft.validate()?;
                Ok(Command::UpdateTicketDetails(draft.to_request(&event_id)))
            }
            ModalTab::Poster => {
                let file = self
                    .poster
                    .pending()
                    .ok_or(CoreError::NoPendingPoster)?
                    .to_path_buf();
                Ok(Command::SavePoster { event_id, file })
            }
        }
    }

    /// Leave `Saving(tab)`. Failures keep every draft as it was.
    pub fn finish_save(
        &mut self,
        tab: ModalTab,
        result: Result<CommandResult, CoreError>,
    ) -> SaveOutcome {
        let sent = self.saving.take();
        match result {
            Err(e) => {
                let message = e.to_string();
                self.last_error = Some(message.clone());
                SaveOutcome::Failed { message }
            }
            Ok(outcome) => {
                self.last_error = None;
                match (sent, outcome) {
                    (Some(InFlight::Poster(file)), CommandResult::PosterSaved { poster_url }) => {
                        self.poster.commit(poster_url, &file);
                    }
                    (Some(InFlight::Ticket(details)), _) => {
                        if let Some(draft) = self.ticket_mut() {
                            draft.mark_saved(details);
                        }
                    }
                    _ => {}
                }
                SaveOutcome::Saved {
                    message: match tab {
                        ModalTab::Basic => "Event details updated",
                        ModalTab::Ticket => "Ticket details updated",
                        ModalTab::Poster => "Poster updated",
                    },
                    close: tab == ModalTab::Basic,
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::model::event::tests::event;
    use crate::model::{CategorizedPrice, PricingOption};

    fn upcoming() -> Arc<Event> {
        let mut e = event("evt-1", "seating", "2099-01-01T00:00:00Z", "2099-01-02T00:00:00Z");
        e.fields = json!({
            "_id": "evt-1",
            "name": "Gala",
            "type": "seating",
            "scheduleStart": "2099-01-01T00:00:00Z",
            "scheduleEnd": "2099-01-02T00:00:00Z"
        })
        .as_object()
        .unwrap()
        .clone();
        e.poster_url = Some("https://cdn/old.png".into());
        Arc::new(e)
    }

    fn before() -> DateTime<Utc> {
        "2098-12-31T00:00:00Z".parse().unwrap()
    }

    fn during() -> DateTime<Utc> {
        "2099-01-01T12:00:00Z".parse().unwrap()
    }

    fn flat(price: f64) -> TicketDetails {
        TicketDetails {
            pricing_option: PricingOption::Flat,
            flat_price: Some(price),
            categorized_prices: Vec::new(),
        }
    }

    #[test]
    fn open_starts_loading_on_basic_tab() {
        let modal = EditModal::open(upcoming());
        assert_eq!(modal.state(), ModalState::Loading);
        assert_eq!(modal.basic().len(), 4);
        assert!(modal.ticket().is_none());
        assert!(!modal.is_dirty());
    }

    #[test]
    fn ticket_fetch_moves_to_ready() {
        let mut modal = EditModal::open(upcoming());
        modal.tickets_loaded(Ok(flat(20.0)));
        assert_eq!(modal.state(), ModalState::Ready(ModalTab::Basic));
        modal.next_tab();
        assert_eq!(modal.state(), ModalState::Ready(ModalTab::Ticket));
    }

    #[test]
    fn basic_saves_while_tickets_load() {
        let mut modal = EditModal::open(upcoming());
        let cmd = modal.begin_save(ModalTab::Basic, before()).unwrap();
        assert!(matches!(
            cmd,
            Command::UpdateBasicDetails { ref event_id, .. } if event_id == "evt-1"
        ));
        assert_eq!(modal.state(), ModalState::Saving(ModalTab::Basic));
    }

    #[test]
    fn ticket_save_enabled_only_when_upcoming() {
        let mut modal = EditModal::open(upcoming());
        modal.tickets_loaded(Ok(flat(20.0)));

        assert!(modal.can_save_tickets(before()));
        assert!(!modal.can_save_tickets(during()));
        assert!(matches!(
            modal.begin_save(ModalTab::Ticket, during()),
            Err(CoreError::TicketsLocked {
                status: EventStatus::Ongoing
            })
        ));
        assert!(!modal.is_saving());
        assert!(modal.last_error().is_some());

        let cmd = modal.begin_save(ModalTab::Ticket, before()).unwrap();
        assert!(matches!(cmd, Command::UpdateTicketDetails(ref r) if r.flat_price == Some(20.0)));
    }

    #[test]
    fn ticket_save_waits_for_fetch() {
        let mut modal = EditModal::open(upcoming());
        assert!(!modal.can_save_tickets(before()));
        assert!(matches!(
            modal.begin_save(ModalTab::Ticket, before()),
            Err(CoreError::TicketsNotLoaded)
        ));
    }

    #[test]
    fn only_one_save_at_a_time() {
        let mut modal = EditModal::open(upcoming());
        modal.begin_save(ModalTab::Basic, before()).unwrap();
        assert!(matches!(
            modal.begin_save(ModalTab::Basic, before()),
            Err(CoreError::SaveInProgress { .. })
        ));
    }

    #[test]
    fn failed_save_returns_to_ready_with_draft_unchanged() {
        let mut modal = EditModal::open(upcoming());
        modal.tickets_loaded(Ok(flat(20.0)));
        modal.basic_mut().set_text("name", "Renamed").unwrap();
        let snapshot = modal.basic().clone();

        modal.begin_save(ModalTab::Basic, before()).unwrap();
        let outcome = modal.finish_save(
            ModalTab::Basic,
            Err(CoreError::Rejected {
                message: "Name taken".into(),
            }),
        );

        assert_eq!(
            outcome,
            SaveOutcome::Failed {
                message: "Name taken".into()
            }
        );
        assert_eq!(modal.state(), ModalState::Ready(ModalTab::Basic));
        assert_eq!(modal.basic(), &snapshot);
        assert_eq!(modal.last_error(), Some("Name taken"));
    }

    #[test]
    fn basic_success_closes() {
        let mut modal = EditModal::open(upcoming());
        modal.begin_save(ModalTab::Basic, before()).unwrap();
        assert_eq!(
            modal.finish_save(ModalTab::Basic, Ok(CommandResult::Ok)),
            SaveOutcome::Saved {
                message: "Event details updated",
                close: true
            }
        );
    }

    #[test]
    fn poster_needs_pending_file() {
        let mut modal = EditModal::open(upcoming());
        assert!(matches!(
            modal.begin_save(ModalTab::Poster, before()),
            Err(CoreError::NoPendingPoster)
        ));
    }

    #[test]
    fn poster_failure_keeps_preview_and_success_commits() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("new.png");
        std::fs::write(&file, b"png").unwrap();

        let mut modal = EditModal::open(upcoming());
        modal.poster_mut().select_file(&file).unwrap();
        let preview = modal.poster().preview();

        modal.begin_save(ModalTab::Poster, before()).unwrap();
        modal.finish_save(
            ModalTab::Poster,
            Err(CoreError::Rejected {
                message: "upload failed".into(),
            }),
        );
        assert_eq!(modal.poster().preview(), preview);

        modal.begin_save(ModalTab::Poster, before()).unwrap();
        let outcome = modal.finish_save(
            ModalTab::Poster,
            Ok(CommandResult::PosterSaved {
                poster_url: "https://cdn/new.png".into(),
            }),
        );
        assert!(matches!(outcome, SaveOutcome::Saved { close: false, .. }));
        assert_eq!(modal.poster().remote(), Some("https://cdn/new.png"));
        assert!(!modal.poster().is_dirty());
    }

    #[test]
    fn ticket_edit_during_save_stays_dirty() {
        let mut modal = EditModal::open(upcoming());
        modal.tickets_loaded(Ok(flat(10.0)));
        modal.ticket_mut().unwrap().set_flat_price(Some(12.0));

        let cmd = modal.begin_save(ModalTab::Ticket, before()).unwrap();
        assert!(matches!(cmd, Command::UpdateTicketDetails(ref r) if r.flat_price == Some(12.0)));
        modal.ticket_mut().unwrap().set_flat_price(Some(99.0));

        modal.finish_save(ModalTab::Ticket, Ok(CommandResult::Ok));
        assert_eq!(modal.ticket().unwrap().flat_price(), Some(99.0));
        assert!(modal.is_dirty());

        // Reverting to what the server holds is clean again
        modal.ticket_mut().unwrap().set_flat_price(Some(12.0));
        assert!(!modal.is_dirty());
    }

    #[test]
    fn poster_picked_during_upload_survives() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.png");
        let second = dir.path().join("b.png");
        std::fs::write(&first, b"png").unwrap();
        std::fs::write(&second, b"png").unwrap();

        let mut modal = EditModal::open(upcoming());
        modal.poster_mut().select_file(&first).unwrap();
        modal.begin_save(ModalTab::Poster, before()).unwrap();
        modal.poster_mut().select_file(&second).unwrap();

        modal.finish_save(
            ModalTab::Poster,
            Ok(CommandResult::PosterSaved {
                poster_url: "https://cdn/a.png".into(),
            }),
        );
        assert_eq!(modal.poster().remote(), Some("https://cdn/a.png"));
        assert_eq!(modal.poster().pending(), Some(second.as_path()));
        assert!(modal.is_dirty());
    }

    #[test]
    fn dirty_tracks_every_draft() {
        let mut modal = EditModal::open(upcoming());
        modal.tickets_loaded(Ok(TicketDetails {
            pricing_option: PricingOption::Categorized,
            flat_price: None,
            categorized_prices: vec![CategorizedPrice {
                category: "VIP".into(),
                price: 10.0,
                number_of_tickets: 5,
            }],
        }));
        assert!(!modal.is_dirty());
        modal.ticket_mut().unwrap().add_category();
        assert!(modal.is_dirty());
        modal.ticket_mut().unwrap().remove_category(1);
        assert!(!modal.is_dirty());
    }

    #[test]
    fn tabs_cycle_both_ways() {
        assert_eq!(ModalTab::Poster.next(), ModalTab::Basic);
        assert_eq!(ModalTab::Basic.prev(), ModalTab::Poster);
    }
}
