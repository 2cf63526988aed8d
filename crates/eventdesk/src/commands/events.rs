//! Event command handlers.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::{Map, Value};
use tabled::Tabled;

use eventdesk_core::localtime::display_local;
use eventdesk_core::{
    CategoryField, Controller, EditModal, Event, EventFilter,
    EventStatus, EventStore, EventType, ListView, ModalTab, PricingOption, SaveOutcome,
    TicketDetails, TicketLoad,
};

use crate::cli::{EventTypeArg, EventsArgs, EventsCommand, GlobalOpts, OutputFormat, StatusArg};
use crate::error::CliError;
use crate::output;

use super::util;

const DELETE_WARNING: &str = "Deleting an event is permanent. Its ticketing, booking, \
    financial and analytics records are removed with it and cannot be recovered.";

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct EventRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Starts")]
    starts: String,
    #[tabled(rename = "Ends")]
    ends: String,
    #[tabled(rename = "Editable")]
    editable: String,
}

#[derive(Tabled)]
struct PriceRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Type")]
    category: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Tickets")]
    tickets: u32,
}

/// Serialized shape of one listed event.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EventSummary {
    id: String,
    name: String,
    #[serde(rename = "type")]
    event_type: String,
    status: EventStatus,
    schedule_start: DateTime<Utc>,
    schedule_end: DateTime<Utc>,
    editable: bool,
}

impl EventSummary {
    fn new(event: &Event, now: DateTime<Utc>) -> Self {
        Self {
            id: event.id.clone(),
            name: event.name.clone(),
            event_type: event.event_type.clone(),
            status: event.status_at(now),
            schedule_start: event.schedule_start,
            schedule_end: event.schedule_end,
            editable: event.is_editable_at(now),
        }
    }
}

/// Full server document plus the derived status.
#[derive(Serialize)]
struct EventDetail {
    status: EventStatus,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

fn status_cell(status: EventStatus, color: bool) -> String {
    if !color {
        return status.to_string();
    }
    match status {
        EventStatus::Ongoing => status.green().to_string(),
        EventStatus::Upcoming => status.cyan().to_string(),
        EventStatus::Completed => status.dimmed().to_string(),
    }
}

fn event_row(s: &EventSummary, color: bool) -> EventRow {
    EventRow {
        id: s.id.clone(),
        name: s.name.clone(),
        kind: s.event_type.clone(),
        status: status_cell(s.status, color),
        starts: display_local(s.schedule_start),
        ends: display_local(s.schedule_end),
        editable: if s.editable { "yes".into() } else { "-".into() },
    }
}

fn detail(d: &EventDetail) -> String {
    let width = d.fields.keys().map(String::len).max().unwrap_or(0).max("status".len());
    let mut lines = vec![format!("{:width$}  {}", "status", d.status)];
    for (key, value) in &d.fields {
        let text = match value {
            Value::String(s) if key == "scheduleStart" || key == "scheduleEnd" => s
                .parse::<DateTime<Utc>>()
                .map_or_else(|_| s.clone(), |at| format!("{} (local)", display_local(at))),
            Value::String(s) => s.clone(),
            Value::Null => "-".into(),
            other => other.to_string(),
        };
        lines.push(format!("{key:width$}  {text}"));
    }
    lines.join("\n")
}

fn ticket_detail(details: &TicketDetails) -> String {
    match details.pricing_option {
        PricingOption::Flat => format!(
            "Pricing:  flat\nPrice:    {}",
            details
                .flat_price
                .map_or_else(|| "-".into(), |p| format!("{p:.2}"))
        ),
        PricingOption::Categorized => {
            let rows: Vec<PriceRow> = details
                .categorized_prices
                .iter()
                .enumerate()
                .map(|(index, c)| PriceRow {
                    index,
                    category: c.category.clone(),
                    price: format!("{:.2}", c.price),
                    tickets: c.number_of_tickets,
                })
                .collect();
            format!(
                "Pricing:  categorized\n{}",
                tabled::Table::new(rows).with(tabled::settings::Style::rounded())
            )
        }
    }
}

impl From<EventTypeArg> for EventType {
    fn from(arg: EventTypeArg) -> Self {
        match arg {
            EventTypeArg::Seating => Self::Seating,
            EventTypeArg::Online => Self::Online,
            EventTypeArg::Open => Self::Open,
            EventTypeArg::Register => Self::Register,
        }
    }
}

impl From<StatusArg> for EventStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Upcoming => Self::Upcoming,
            StatusArg::Ongoing => Self::Ongoing,
            StatusArg::Completed => Self::Completed,
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: EventsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        EventsCommand::List { event_type, status } => {
            let filter = EventFilter {
                event_type: event_type.map(Into::into),
                status: status.map(Into::into),
            };
            let mut store = EventStore::new();
            controller.refresh(&mut store).await?;
            print_view(&store, &filter, global);
            Ok(())
        }

        EventsCommand::Get { id } => {
            let event = controller.get_event(&id).await?;
            let detail_view = EventDetail {
                status: event.status_at(Utc::now()),
                fields: event.fields.clone(),
            };
            let out = output::render_single(global.output(), &detail_view, detail, |_| event.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        EventsCommand::Delete { id } => {
            let event = controller.get_event(&id).await?;
            if !global.quiet && !global.yes {
                eprintln!("{}", DELETE_WARNING.yellow());
            }
            let prompt = format!("Delete event '{}' ({id})?", event.name);
            if !util::confirm(&prompt, global.yes, "events delete")? {
                output::print_status("Aborted.", global.quiet);
                return Ok(());
            }

            let mut store = EventStore::new();
            controller.delete_and_refresh(&id, &mut store).await?;
            output::print_status("Event deleted", global.quiet);

            if let Some(error) = store.error() {
                output::print_status(
                    &format!("Event deleted, but the list could not be refreshed: {error}"),
                    global.quiet,
                );
            } else if store.get(&id).is_some() {
                tracing::warn!(event_id = %id, "event still listed after delete");
                output::print_status(
                    &format!("Warning: '{id}' is still listed by the service"),
                    global.quiet,
                );
            } else {
                print_view(&store, &EventFilter::default(), global);
            }
            Ok(())
        }

        EventsCommand::Edit { id, set } => {
            let mut modal = open_editable(controller, &id).await?;
            for raw in &set {
                let (key, value) = util::parse_assignment(raw)?;
                modal.basic_mut().set_text(key, value)?;
            }
            if !modal.basic().is_dirty() {
                output::print_status("Nothing to change", global.quiet);
                return Ok(());
            }
            save_tab(controller, &mut modal, ModalTab::Basic, global).await
        }

        EventsCommand::Tickets { id } => {
            let details = controller.ticket_details(&id).await?;
            let out = output::render_single(global.output(), &details, ticket_detail, |d| {
                format!("{:?}", d.pricing_option).to_lowercase()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        EventsCommand::SetTickets { id, flat, category } => {
            let mut modal = open_editable(controller, &id).await?;
            controller.load_tickets(&mut modal).await;
            if let TicketLoad::Failed(message) = modal.ticket_load() {
                return Err(CliError::ApiError {
                    message: format!("could not load ticket details: {message}"),
                    status: None,
                });
            }
            let draft = modal.ticket_mut().ok_or_else(|| {
                CliError::Internal("ticket details did not load".into())
            })?;

            if let Some(price) = flat {
                draft.set_pricing_option(PricingOption::Flat);
                draft.set_flat_price(Some(price));
            } else {
                draft.set_pricing_option(PricingOption::Categorized);
                while draft.remove_category(0).is_some() {}
                for (index, raw) in category.iter().enumerate() {
                    let (name, price, count) = util::parse_category(raw)?;
                    draft.add_category();
                    draft.update_category(index, CategoryField::Type, name)?;
                    draft.update_category(index, CategoryField::Price, price)?;
                    draft.update_category(index, CategoryField::Tickets, count)?;
                }
            }
            save_tab(controller, &mut modal, ModalTab::Ticket, global).await
        }

        EventsCommand::Poster { id, file } => {
            let event = controller.get_event(&id).await?;
            let mut modal = EditModal::open(Arc::new(event));
            modal.poster_mut().select_file(&file)?;
            let outcome = save_tab(controller, &mut modal, ModalTab::Poster, global).await;
            if outcome.is_ok() {
                if let Some(url) = modal.poster().remote() {
                    output::print_output(url, global.quiet);
                }
            }
            outcome
        }
    }
}

fn print_view(store: &EventStore, filter: &EventFilter, global: &GlobalOpts) {
    let now = Utc::now();
    match store.view(filter, now) {
        ListView::Empty(state) => {
            if matches!(global.output(), OutputFormat::Table | OutputFormat::Plain) {
                output::print_status(state.message(), global.quiet);
            } else {
                let out = output::render_list(
                    global.output(),
                    &Vec::<EventSummary>::new(),
                    |s| event_row(s, false),
                    |s| s.id.clone(),
                );
                output::print_output(&out, global.quiet);
            }
        }
        ListView::Events(events) => {
            let color = output::should_color(global.color());
            let summaries: Vec<EventSummary> =
                events.iter().map(|e| EventSummary::new(e, now)).collect();
            let out = output::render_list(
                global.output(),
                &summaries,
                |s| event_row(s, color),
                |s| s.id.clone(),
            );
            output::print_output(&out, global.quiet);
        }
    }
}

/// Fetch `id` and open an edit session, refusing events that have started.
async fn open_editable(controller: &Controller, id: &str) -> Result<EditModal, CliError> {
    let event = controller.get_event(id).await?;
    let status = event.status_at(Utc::now());
    if status != EventStatus::Upcoming {
        return Err(CliError::validation(
            "event",
            format!("only upcoming events can be edited ('{id}' is {status})"),
        ));
    }
    Ok(EditModal::open(Arc::new(event)))
}

/// Run one tab's save cycle, keeping the service error's kind for the exit code.
async fn save_tab(
    controller: &Controller,
    modal: &mut EditModal,
    tab: ModalTab,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let pb = util::spinner(&format!("Saving {tab} details..."), global.quiet);
    let result = controller.save(modal, tab).await;
    pb.finish_and_clear();

    match result? {
        SaveOutcome::Saved { message, .. } => {
            output::print_status(&format!("{} {message}", "✓".green()), global.quiet);
            Ok(())
        }
        SaveOutcome::Failed { message } => Err(CliError::Internal(message)),
    }
}
