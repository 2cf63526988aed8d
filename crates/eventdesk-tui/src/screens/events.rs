//! Events screen — filterable, status-sorted table of the organiser's events.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
};
use serde_json::Value;
use strum::IntoEnumIterator;

use eventdesk_core::localtime::display_local;
use eventdesk_core::{
    BasicDetailsDraft, EmptyState, Event, EventFilter, EventStatus, EventStore, EventType,
    ListView,
};

use crate::action::{Action, ConfirmAction, Notification};
use crate::component::Component;
use crate::theme;

/// Step `current` through `options`, wrapping back to "no filter".
fn cycle<T: Copy + PartialEq>(options: &[T], current: Option<T>) -> Option<T> {
    match current {
        None => options.first().copied(),
        Some(value) => options
            .iter()
            .position(|o| *o == value)
            .and_then(|i| options.get(i + 1))
            .copied(),
    }
}

fn filter_label<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "all".into(), |v| v.to_string())
}

pub struct EventsScreen {
    store: EventStore,
    filter: EventFilter,
    table_state: TableState,
    detail_open: bool,
    throbber_state: throbber_widgets_tui::ThrobberState,
}

impl Default for EventsScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl EventsScreen {
    #[cfg(test)]
    pub fn store(&self) -> &EventStore {
        &self.store
    }

    pub fn new() -> Self {
        Self {
            store: EventStore::new(),
            filter: EventFilter::default(),
            table_state: TableState::default().with_selected(0),
            detail_open: false,
            throbber_state: throbber_widgets_tui::ThrobberState::default(),
        }
    }

    /// Events that pass the filter, in display order.
    fn visible(&self, now: DateTime<Utc>) -> Vec<Arc<Event>> {
        match self.store.view(&self.filter, now) {
            ListView::Events(events) => events,
            ListView::Empty(_) => Vec::new(),
        }
    }

    fn selected_index(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    fn selected_event(&self, now: DateTime<Utc>) -> Option<Arc<Event>> {
        self.visible(now).get(self.selected_index()).cloned()
    }

    fn select(&mut self, idx: usize, len: usize) {
        let clamped = if len == 0 { 0 } else { idx.min(len - 1) };
        self.table_state.select(Some(clamped));
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.visible(Utc::now()).len();
        if len == 0 {
            return;
        }
        let next = self.selected_index().saturating_add_signed(delta);
        self.select(next, len);
    }

    fn filter_changed(&mut self) {
        self.detail_open = false;
        self.table_state.select(Some(0));
    }

    // ── Rendering ───────────────────────────────────────────────

    fn render_filter_line(&self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::styled(" Type ", theme::key_hint()),
            Span::styled(filter_label(self.filter.event_type), theme::field_value()),
            Span::styled("   Status ", theme::key_hint()),
            Span::styled(filter_label(self.filter.status), theme::field_value()),
        ]);
        frame.render_widget(Paragraph::new(line), area);

        if self.store.is_loading() {
            let throbber = throbber_widgets_tui::Throbber::default()
                .label(" refreshing")
                .style(Style::default().fg(theme::CYAN))
                .throbber_style(Style::default().fg(theme::ACCENT));
            let width = 14u16.min(area.width);
            let spot = Rect::new(area.right().saturating_sub(width), area.y, width, 1);
            frame.render_stateful_widget(throbber, spot, &mut self.throbber_state.clone());
        }
    }

    fn render_error_banner(frame: &mut Frame, area: Rect, message: &str) {
        let line = Line::from(vec![
            Span::styled(" ✗ Could not load events: ", theme::error_text()),
            Span::styled(message.to_owned(), Style::default().fg(theme::TEXT)),
            Span::styled("   r ", theme::key_hint_key()),
            Span::styled("retry", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(line).wrap(Wrap { trim: true }), area);
    }

    fn render_empty(&self, frame: &mut Frame, area: Rect, state: EmptyState) {
        let hint = match state {
            EmptyState::NoEvents => "r refresh",
            EmptyState::NoMatches => "c clear filters",
        };
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(state.message(), Style::default().fg(theme::TEXT))),
            Line::from(Span::styled(hint, theme::key_hint())),
        ];
        let text = if self.store.is_loading() && self.store.is_empty() {
            vec![Line::from(""), Line::from(Span::styled("Loading events…", theme::key_hint()))]
        } else {
            lines
        };
        frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), area);
    }

    fn render_table(&self, frame: &mut Frame, area: Rect, events: &[Arc<Event>], now: DateTime<Utc>) {
        let header = Row::new(vec![
            Cell::from("Status").style(theme::table_header()),
            Cell::from("Type").style(theme::table_header()),
            Cell::from("Name").style(theme::table_header()),
            Cell::from("Starts").style(theme::table_header()),
            Cell::from("Ends").style(theme::table_header()),
            Cell::from("Edit").style(theme::table_header()),
        ]);

        let selected_idx = self.selected_index();
        let rows: Vec<Row> = events
            .iter()
            .enumerate()
            .map(|(i, event)| {
                let is_selected = i == selected_idx;
                let prefix = if is_selected { "▸" } else { " " };
                let status = event.status_at(now);
                let editable = if event.is_editable_at(now) { "✎" } else { "" };

                Row::new(vec![
                    Cell::from(format!("{prefix}{status}")).style(theme::status_style(status)),
                    Cell::from(event.event_type.clone()),
                    Cell::from(event.name.clone()).style(
                        Style::default().fg(theme::CYAN).add_modifier(if is_selected {
                            Modifier::BOLD
                        } else {
                            Modifier::empty()
                        }),
                    ),
                    Cell::from(display_local(event.schedule_start))
                        .style(Style::default().fg(theme::CORAL)),
                    Cell::from(display_local(event.schedule_end))
                        .style(Style::default().fg(theme::CORAL)),
                    Cell::from(editable),
                ])
                .style(if is_selected {
                    theme::table_selected()
                } else {
                    theme::table_row()
                })
            })
            .collect();

        let widths = [
            Constraint::Length(11),
            Constraint::Length(9),
            Constraint::Min(16),
            Constraint::Length(17),
            Constraint::Length(17),
            Constraint::Length(4),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected());

        let mut state = self.table_state;
        frame.render_stateful_widget(table, area, &mut state);
    }

    #[allow(clippy::unused_self)]
    fn render_detail(&self, frame: &mut Frame, area: Rect, event: &Event, now: DateTime<Utc>) {
        let block = Block::default()
            .title(format!(" {} ", event.name))
            .title_style(theme::title_style())
            .borders(Borders::TOP)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let status = event.status_at(now);
        let mut lines = vec![Line::from(vec![
            Span::styled(format!("  {:<16}", "status"), theme::field_label(false)),
            Span::styled(status.to_string(), theme::status_style(status)),
        ])];
        for (key, value) in &event.fields {
            let text = match value {
                Value::String(s) if BasicDetailsDraft::is_schedule_field(key) => s
                    .parse::<DateTime<Utc>>()
                    .map_or_else(|_| s.clone(), display_local),
                Value::String(s) => s.clone(),
                Value::Null => "—".into(),
                other => other.to_string(),
            };
            lines.push(Line::from(vec![
                Span::styled(format!("  {key:<16}"), theme::field_label(false)),
                Span::styled(text, theme::field_value()),
            ]));
        }
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }
}

impl Component for EventsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let now = Utc::now();
        match (key.modifiers, key.code) {
            (_, KeyCode::Char('j') | KeyCode::Down) => self.move_selection(1),
            (_, KeyCode::Char('k') | KeyCode::Up) => self.move_selection(-1),
            (KeyModifiers::CONTROL, KeyCode::Char('d')) => self.move_selection(10),
            (KeyModifiers::CONTROL, KeyCode::Char('u')) => self.move_selection(-10),
            (_, KeyCode::Char('g') | KeyCode::Home) => self.table_state.select(Some(0)),
            (_, KeyCode::Char('G') | KeyCode::End) => {
                let len = self.visible(now).len();
                self.select(len.saturating_sub(1), len);
            }

            (_, KeyCode::Char('t')) => {
                let types: Vec<EventType> = EventType::iter().collect();
                self.filter.event_type = cycle(&types, self.filter.event_type);
                self.filter_changed();
            }
            (_, KeyCode::Char('s')) => {
                let statuses: Vec<EventStatus> = EventStatus::iter().collect();
                self.filter.status = cycle(&statuses, self.filter.status);
                self.filter_changed();
            }
            (_, KeyCode::Char('c')) => {
                if !self.filter.is_empty() {
                    self.filter = EventFilter::default();
                    self.filter_changed();
                }
            }
            (_, KeyCode::Char('r')) => return Ok(Some(Action::RefreshEvents)),

            (_, KeyCode::Enter) => {
                if self.selected_event(now).is_some() {
                    self.detail_open = !self.detail_open;
                }
            }
            (_, KeyCode::Esc) => self.detail_open = false,

            (_, KeyCode::Char('e')) => {
                if let Some(event) = self.selected_event(now) {
                    if event.is_editable_at(now) {
                        return Ok(Some(Action::OpenEditor(event)));
                    }
                    let status = event.status_at(now);
                    return Ok(Some(Action::Notify(Notification::info(format!(
                        "Only upcoming events can be edited ({status})"
                    )))));
                }
            }
            (_, KeyCode::Char('d')) => {
                if let Some(event) = self.selected_event(now) {
                    return Ok(Some(Action::ShowConfirm(ConfirmAction::DeleteEvent {
                        id: event.id.clone(),
                        name: event.name.clone(),
                    })));
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::RefreshEvents => self.store.begin_load(),
            Action::EventsLoaded { result, .. } => {
                self.store.apply(result.clone(), Utc::now());
                let len = self.visible(Utc::now()).len();
                if self.selected_index() >= len {
                    self.select(len.saturating_sub(1), len);
                }
            }
            Action::Tick => {
                if self.store.is_loading() {
                    self.throbber_state.calc_next();
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let now = Utc::now();
        let view = self.store.view(&self.filter, now);
        let shown = view.events().len();

        let block = Block::default()
            .title(format!(" Events ({shown}/{}) ", self.store.len()))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let error = self.store.error();
        let layout = Layout::vertical([
            Constraint::Length(1),                              // filters
            Constraint::Length(u16::from(error.is_some()) * 2), // error banner
            Constraint::Min(1),                                 // table / detail
            Constraint::Length(1),                              // hints
        ])
        .split(inner);

        self.render_filter_line(frame, layout[0]);
        if let Some(message) = error {
            Self::render_error_banner(frame, layout[1], message);
        }

        let (table_area, detail_area) = if self.detail_open {
            let chunks = Layout::vertical([Constraint::Percentage(45), Constraint::Percentage(55)])
                .split(layout[2]);
            (chunks[0], Some(chunks[1]))
        } else {
            (layout[2], None)
        };

        match &view {
            // A failed first load only shows the banner
            ListView::Empty(_) if error.is_some() && self.store.is_empty() => {}
            ListView::Empty(state) => self.render_empty(frame, table_area, *state),
            ListView::Events(events) => {
                self.render_table(frame, table_area, events, now);
                if let Some(detail_area) = detail_area {
                    if let Some(event) = events.get(self.selected_index()) {
                        self.render_detail(frame, detail_area, event, now);
                    }
                }
            }
        }

        let hints = Line::from(vec![
            Span::styled("  j/k ", theme::key_hint_key()),
            Span::styled("move  ", theme::key_hint()),
            Span::styled("t ", theme::key_hint_key()),
            Span::styled("type  ", theme::key_hint()),
            Span::styled("s ", theme::key_hint_key()),
            Span::styled("status  ", theme::key_hint()),
            Span::styled("Enter ", theme::key_hint_key()),
            Span::styled("view  ", theme::key_hint()),
            Span::styled("e ", theme::key_hint_key()),
            Span::styled("edit  ", theme::key_hint()),
            Span::styled("d ", theme::key_hint_key()),
            Span::styled("delete  ", theme::key_hint()),
            Span::styled("r ", theme::key_hint_key()),
            Span::styled("refresh", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[3]);
    }

    fn id(&self) -> &'static str {
        "Events"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};
    use serde_json::json;

    use eventdesk_core::CoreError;

    use super::*;

    fn event(id: &str, kind: &str, start: &str, end: &str) -> Event {
        let fields = json!({
            "_id": id,
            "name": format!("Event {id}"),
            "type": kind,
            "scheduleStart": start,
            "scheduleEnd": end,
        });
        Event {
            id: id.into(),
            name: format!("Event {id}"),
            event_type: kind.into(),
            schedule_start: start.parse().unwrap(),
            schedule_end: end.parse().unwrap(),
            poster_url: None,
            fields: fields.as_object().cloned().unwrap(),
        }
    }

    fn loaded() -> EventsScreen {
        let mut screen = EventsScreen::new();
        screen
            .update(&Action::EventsLoaded {
                generation: 1,
                result: Ok(vec![
                    event("past", "open", "2001-01-01T10:00:00Z", "2001-01-01T12:00:00Z"),
                    event("future", "Seating", "2099-01-01T10:00:00Z", "2099-01-01T12:00:00Z"),
                ]),
            })
            .unwrap();
        screen
    }

    fn press(screen: &mut EventsScreen, code: KeyCode) -> Option<Action> {
        screen
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    fn rendered(screen: &EventsScreen) -> String {
        let mut terminal = Terminal::new(TestBackend::new(110, 20)).unwrap();
        terminal.draw(|f| screen.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[test]
    fn cycling_wraps_back_to_no_filter() {
        let options = [1, 2];
        assert_eq!(cycle(&options, None), Some(1));
        assert_eq!(cycle(&options, Some(1)), Some(2));
        assert_eq!(cycle(&options, Some(2)), None);
    }

    #[test]
    fn upcoming_event_opens_the_editor() {
        let mut screen = loaded();
        // Sorted: upcoming "future" before completed "past"
        match press(&mut screen, KeyCode::Char('e')) {
            Some(Action::OpenEditor(event)) => assert_eq!(event.id, "future"),
            other => panic!("expected OpenEditor, got {other:?}"),
        }
    }

    #[test]
    fn completed_event_is_not_editable() {
        let mut screen = loaded();
        press(&mut screen, KeyCode::Char('j'));
        match press(&mut screen, KeyCode::Char('e')) {
            Some(Action::Notify(n)) => assert!(n.message.contains("Completed")),
            other => panic!("expected a notification, got {other:?}"),
        }
    }

    #[test]
    fn delete_asks_for_confirmation() {
        let mut screen = loaded();
        match press(&mut screen, KeyCode::Char('d')) {
            Some(Action::ShowConfirm(ConfirmAction::DeleteEvent { id, .. })) => {
                assert_eq!(id, "future");
            }
            other => panic!("expected ShowConfirm, got {other:?}"),
        }
    }

    #[test]
    fn type_filter_narrows_the_table() {
        let mut screen = loaded();
        press(&mut screen, KeyCode::Char('t')); // seating
        let visible = screen.visible(Utc::now());
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "future");
    }

    #[test]
    fn empty_states_are_distinguished() {
        let mut screen = EventsScreen::new();
        screen
            .update(&Action::EventsLoaded {
                generation: 1,
                result: Ok(Vec::new()),
            })
            .unwrap();
        assert!(rendered(&screen).contains("No events yet"));

        let mut screen = loaded();
        press(&mut screen, KeyCode::Char('s')); // upcoming
        press(&mut screen, KeyCode::Char('s')); // ongoing
        assert!(rendered(&screen).contains("No events match"));
    }

    #[test]
    fn failed_load_shows_retry_banner() {
        let mut screen = EventsScreen::new();
        screen
            .update(&Action::EventsLoaded {
                generation: 1,
                result: Err(CoreError::Timeout { timeout_secs: 30 }),
            })
            .unwrap();
        let text = rendered(&screen);
        assert!(text.contains("Could not load events"));
        assert!(text.contains("retry"));
        assert!(matches!(
            press(&mut screen, KeyCode::Char('r')),
            Some(Action::RefreshEvents)
        ));
    }
}
