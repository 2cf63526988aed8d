//! Edit dialog — Basic / Tickets / Poster tabs over one `EditModal`.
//!
//! The dialog owns the core state machine and only translates keys into
//! draft edits. Saves leave as `Action::ExecuteSave` and come back through
//! [`EditModalScreen::finish_save`].

use std::sync::Arc;

use chrono::Utc;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};
use serde_json::Value;

use eventdesk_core::{
    BasicDetailsDraft, CategoryField, CommandResult, CoreError, EditModal, Event, ModalTab,
    PosterPreview, PricingOption, SaveOutcome, TicketDraft, TicketLoad,
};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::theme;
use crate::widgets::sub_tabs::render_sub_tabs;
use crate::widgets::text_field::{FieldKey, TextField};

const TAB_LABELS: [&str; 3] = ["Basic", "Tickets", "Poster"];
const TIER_FIELDS: [CategoryField; 3] =
    [CategoryField::Type, CategoryField::Price, CategoryField::Tickets];

/// The value a text field will be written back to.
#[derive(Debug, Clone, PartialEq, Eq)]
enum EditTarget {
    Basic(String),
    FlatPrice,
    Tier(usize, CategoryField),
    PosterPath,
}

impl EditTarget {
    fn label(&self) -> String {
        match self {
            Self::Basic(key) if BasicDetailsDraft::is_schedule_field(key) => {
                format!("{key} (local, YYYY-MM-DDTHH:MM)")
            }
            Self::Basic(key) => key.clone(),
            Self::FlatPrice => "price".into(),
            Self::Tier(row, field) => format!("tier {} {}", row + 1, tier_field_name(*field)),
            Self::PosterPath => "image file".into(),
        }
    }
}

fn tier_field_name(field: CategoryField) -> &'static str {
    match field {
        CategoryField::Type => "type",
        CategoryField::Price => "price",
        CategoryField::Tickets => "tickets",
    }
}

fn price_text(price: f64) -> String {
    format!("{price:.2}")
}

pub struct EditModalScreen {
    modal: EditModal,
    basic_idx: usize,
    tier_row: usize,
    tier_col: usize,
    editing: Option<(EditTarget, TextField)>,
    /// First Esc on a dirty dialog arms this; the second one discards.
    discard_armed: bool,
    throbber_state: throbber_widgets_tui::ThrobberState,
}

impl EditModalScreen {
    pub fn new(event: Arc<Event>) -> Self {
        Self {
            modal: EditModal::open(event),
            basic_idx: 0,
            tier_row: 0,
            tier_col: 0,
            editing: None,
            discard_armed: false,
            throbber_state: throbber_widgets_tui::ThrobberState::default(),
        }
    }

    pub fn event_id(&self) -> &str {
        self.modal.event_id()
    }

    /// Fold a finished save back into the dialog.
    pub fn finish_save(
        &mut self,
        tab: ModalTab,
        result: Result<CommandResult, CoreError>,
    ) -> SaveOutcome {
        self.discard_armed = false;
        self.modal.finish_save(tab, result)
    }

    fn basic_keys(&self) -> Vec<String> {
        self.modal.basic().keys().map(str::to_owned).collect()
    }

    fn error_notice(err: &CoreError) -> Action {
        Action::Notify(Notification::error(err.to_string()))
    }

    fn start_editing(&mut self, target: EditTarget, initial: String) {
        self.editing = Some((target, TextField::new(initial)));
    }

    /// Write a committed field value into the matching draft.
    fn commit(&mut self, target: &EditTarget, value: &str) -> Option<Action> {
        let result = match target {
            EditTarget::Basic(key) => self.modal.basic_mut().set_text(key, value),
            EditTarget::FlatPrice => self
                .modal
                .ticket_mut()
                .map_or(Ok(()), |draft| draft.set_flat_price_text(value)),
            EditTarget::Tier(row, field) => self
                .modal
                .ticket_mut()
                .map_or(Ok(()), |draft| draft.update_category(*row, *field, value)),
            EditTarget::PosterPath if value.trim().is_empty() => {
                self.modal.poster_mut().clear_pending();
                Ok(())
            }
            EditTarget::PosterPath => self.modal.poster_mut().select_file(value.trim()),
        };
        result.err().map(|e| Self::error_notice(&e))
    }

    fn save(&mut self) -> Action {
        let tab = self.modal.tab();
        match self.modal.begin_save(tab, Utc::now()) {
            Ok(command) => Action::ExecuteSave { tab, command },
            Err(e) => Self::error_notice(&e),
        }
    }

    fn close(&mut self) -> Action {
        if self.modal.is_saving() {
            return Action::Notify(Notification::info(
                "Wait for the save to finish before closing",
            ));
        }
        if self.modal.is_dirty() && !self.discard_armed {
            self.discard_armed = true;
            return Action::Notify(Notification::info(
                "Unsaved changes. Press Esc again to discard them",
            ));
        }
        Action::CloseEditor
    }

    // ── Per-tab keys ────────────────────────────────────────────

    fn handle_basic_key(&mut self, key: KeyEvent) -> Option<Action> {
        let keys = self.basic_keys();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.basic_idx = (self.basic_idx + 1).min(keys.len().saturating_sub(1));
            }
            KeyCode::Char('k') | KeyCode::Up => self.basic_idx = self.basic_idx.saturating_sub(1),
            KeyCode::Enter | KeyCode::Char(' ') => {
                let field = keys.get(self.basic_idx)?;
                if matches!(self.modal.basic().get(field), Some(Value::Bool(_))) {
                    return self
                        .modal
                        .basic_mut()
                        .toggle(field)
                        .err()
                        .map(|e| Self::error_notice(&e));
                }
                if key.code == KeyCode::Enter {
                    let initial = self.modal.basic().display_value(field);
                    self.start_editing(EditTarget::Basic(field.clone()), initial);
                }
            }
            _ => {}
        }
        None
    }

    fn handle_ticket_key(&mut self, key: KeyEvent) -> Option<Action> {
        let now = Utc::now();
        let locked = !self.modal.can_save_tickets(now);
        let draft = self.modal.ticket()?;
        let option = draft.pricing_option();
        let tiers = draft.categories().len();
        let flat = draft.flat_price();

        let is_edit_key = matches!(
            key.code,
            KeyCode::Char('p' | 'a' | 'x') | KeyCode::Enter | KeyCode::Delete
        );
        if locked && is_edit_key {
            let status = self.modal.status_at(now);
            return Some(Action::Notify(Notification::info(format!(
                "Ticket details are locked while the event is {status}"
            ))));
        }

        match (option, key.code) {
            (_, KeyCode::Char('p')) => {
                if let Some(draft) = self.modal.ticket_mut() {
                    draft.toggle_pricing_option();
                }
            }
            (PricingOption::Flat, KeyCode::Enter) => {
                self.start_editing(EditTarget::FlatPrice, flat.map(price_text).unwrap_or_default());
            }
            (PricingOption::Categorized, KeyCode::Char('j') | KeyCode::Down) => {
                self.tier_row = (self.tier_row + 1).min(tiers.saturating_sub(1));
            }
            (PricingOption::Categorized, KeyCode::Char('k') | KeyCode::Up) => {
                self.tier_row = self.tier_row.saturating_sub(1);
            }
            (PricingOption::Categorized, KeyCode::Char('l') | KeyCode::Right) => {
                self.tier_col = (self.tier_col + 1).min(TIER_FIELDS.len() - 1);
            }
            (PricingOption::Categorized, KeyCode::Char('h') | KeyCode::Left) => {
                self.tier_col = self.tier_col.saturating_sub(1);
            }
            (PricingOption::Categorized, KeyCode::Char('a')) => {
                if let Some(draft) = self.modal.ticket_mut() {
                    draft.add_category();
                    self.tier_row = draft.categories().len().saturating_sub(1);
                    self.tier_col = 0;
                }
            }
            (PricingOption::Categorized, KeyCode::Char('x') | KeyCode::Delete) => {
                if let Some(draft) = self.modal.ticket_mut() {
                    draft.remove_category(self.tier_row);
                    self.tier_row = self.tier_row.min(draft.categories().len().saturating_sub(1));
                }
            }
            (PricingOption::Categorized, KeyCode::Enter) => {
                let field = TIER_FIELDS[self.tier_col];
                let tier = self.modal.ticket()?.categories().get(self.tier_row)?;
                let initial = match field {
                    CategoryField::Type => tier.category.clone(),
                    CategoryField::Price => price_text(tier.price),
                    CategoryField::Tickets => tier.number_of_tickets.to_string(),
                };
                self.start_editing(EditTarget::Tier(self.tier_row, field), initial);
            }
            _ => {}
        }
        None
    }

    fn handle_poster_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Enter | KeyCode::Char('o') => {
                let initial = self
                    .modal
                    .poster()
                    .pending()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                self.start_editing(EditTarget::PosterPath, initial);
            }
            KeyCode::Char('c') => self.modal.poster_mut().clear_pending(),
            _ => {}
        }
        None
    }

    // ── Rendering ───────────────────────────────────────────────

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let status = self.modal.status_at(Utc::now());
        let mut spans = vec![
            Span::styled(" ", Style::default()),
            Span::styled(status.to_string(), theme::status_style(status)),
            Span::styled(format!("  {}", self.modal.event_id()), theme::key_hint()),
        ];
        if self.modal.is_dirty() {
            spans.push(Span::styled("  ● unsaved", Style::default().fg(theme::YELLOW)));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);

        let busy = match (self.modal.is_saving(), self.modal.ticket_load()) {
            (true, _) => Some("saving"),
            (false, TicketLoad::Loading) => Some("loading tickets"),
            _ => None,
        };
        if let Some(label) = busy {
            let throbber = throbber_widgets_tui::Throbber::default()
                .label(format!(" {label}"))
                .style(Style::default().fg(theme::CYAN))
                .throbber_style(Style::default().fg(theme::ACCENT));
            let width = 20u16.min(area.width);
            let spot = Rect::new(area.right().saturating_sub(width), area.y, width, 1);
            frame.render_stateful_widget(throbber, spot, &mut self.throbber_state.clone());
        }
    }

    fn render_basic(&self, frame: &mut Frame, area: Rect) {
        let basic = self.modal.basic();
        let keys = self.basic_keys();
        let height = usize::from(area.height.max(1));
        let start = self.basic_idx.saturating_sub(height - 1);

        let lines: Vec<Line> = keys
            .iter()
            .enumerate()
            .skip(start)
            .take(height)
            .map(|(i, key)| {
                let focused = i == self.basic_idx;
                let marker = if focused { "▸ " } else { "  " };
                let value = basic.display_value(key);
                let value_style = match basic.get(key) {
                    Some(Value::Bool(true)) => Style::default().fg(theme::GREEN),
                    Some(Value::Bool(false)) => Style::default().fg(theme::MUTED),
                    _ => theme::field_value(),
                };
                let suffix = if BasicDetailsDraft::is_schedule_field(key) { " (local)" } else { "" };
                Line::from(vec![
                    Span::styled(marker, theme::field_label(focused)),
                    Span::styled(format!("{key:<18}"), theme::field_label(focused)),
                    Span::styled(value, value_style),
                    Span::styled(suffix, theme::key_hint()),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_ticket(&self, frame: &mut Frame, area: Rect) {
        let now = Utc::now();
        let draft: &TicketDraft = match self.modal.ticket_load() {
            TicketLoad::Loading => {
                let text = Line::from(Span::styled("  Loading ticket details…", theme::key_hint()));
                frame.render_widget(Paragraph::new(text), area);
                return;
            }
            TicketLoad::Failed(message) => {
                let text = vec![
                    Line::from(Span::styled(
                        format!("  Could not load ticket details: {message}"),
                        theme::error_text(),
                    )),
                    Line::from(Span::styled(
                        "  Close and reopen the event to try again.",
                        theme::key_hint(),
                    )),
                ];
                frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), area);
                return;
            }
            TicketLoad::Loaded(draft) => draft,
        };

        let mut lines = Vec::new();
        if !self.modal.can_save_tickets(now) {
            lines.push(Line::from(Span::styled(
                format!(
                    "  Locked: the event is {}. Ticket details only change before it starts.",
                    self.modal.status_at(now)
                ),
                Style::default().fg(theme::YELLOW),
            )));
        }

        let option = match draft.pricing_option() {
            PricingOption::Flat => "flat",
            PricingOption::Categorized => "categorized",
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<10}", "pricing"), theme::field_label(false)),
            Span::styled(option, theme::field_value()),
        ]));
        lines.push(Line::from(""));

        match draft.pricing_option() {
            PricingOption::Flat => {
                let price = draft.flat_price().map_or_else(|| "—".into(), price_text);
                lines.push(Line::from(vec![
                    Span::styled("▸ ", theme::field_label(true)),
                    Span::styled(format!("{:<10}", "price"), theme::field_label(true)),
                    Span::styled(price, theme::field_value()),
                ]));
            }
            PricingOption::Categorized => {
                lines.push(Line::from(Span::styled(
                    format!("  {:<22}{:>10}  {:>8}", "Type", "Price", "Tickets"),
                    theme::table_header(),
                )));
                if draft.categories().is_empty() {
                    lines.push(Line::from(Span::styled("  No price tiers yet", theme::key_hint())));
                }
                for (row, tier) in draft.categories().iter().enumerate() {
                    let cell = |col: usize| {
                        if row == self.tier_row && col == self.tier_col {
                            theme::table_selected()
                        } else if row == self.tier_row {
                            theme::field_value().add_modifier(Modifier::BOLD)
                        } else {
                            theme::table_row()
                        }
                    };
                    let marker = if row == self.tier_row { "▸ " } else { "  " };
                    lines.push(Line::from(vec![
                        Span::styled(marker, theme::field_label(row == self.tier_row)),
                        Span::styled(format!("{:<22}", tier.category), cell(0)),
                        Span::styled(format!("{:>10}", price_text(tier.price)), cell(1)),
                        Span::raw("  "),
                        Span::styled(format!("{:>8}", tier.number_of_tickets), cell(2)),
                    ]));
                }
            }
        }
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_poster(&self, frame: &mut Frame, area: Rect) {
        let poster = self.modal.poster();
        let row = |label: &str, value: String| {
            Line::from(vec![
                Span::styled(format!("  {label:<10}"), theme::field_label(false)),
                Span::styled(value, theme::field_value()),
            ])
        };
        let preview = match poster.preview() {
            PosterPreview::None => "no poster".to_owned(),
            PosterPreview::Remote(_) => "current poster".to_owned(),
            PosterPreview::Local(path) => format!(
                "{} (not uploaded yet)",
                path.file_name()
                    .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
            ),
        };
        let lines = vec![
            row("current", poster.remote().unwrap_or("—").to_owned()),
            row(
                "selected",
                poster
                    .pending()
                    .map_or_else(|| "—".into(), |p| p.display().to_string()),
            ),
            row("preview", preview),
        ];
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
    }

    fn render_hints(&self, frame: &mut Frame, area: Rect) {
        let pair = |key: &'static str, what: &'static str| {
            [
                Span::styled(key, theme::key_hint_key()),
                Span::styled(what, theme::key_hint()),
            ]
        };
        let mut spans: Vec<Span> = Vec::new();
        if self.editing.is_some() {
            spans.extend(pair(" Enter ", "apply  "));
            spans.extend(pair("Esc ", "cancel  "));
            spans.extend(pair("Ctrl-u ", "clear"));
        } else {
            spans.extend(pair(" Tab ", "next tab  "));
            match self.modal.tab() {
                ModalTab::Basic => spans.extend(pair("Enter ", "edit/toggle  ")),
                ModalTab::Ticket => {
                    spans.extend(pair("p ", "pricing  "));
                    spans.extend(pair("a/x ", "add/remove tier  "));
                    spans.extend(pair("Enter ", "edit  "));
                }
                ModalTab::Poster => {
                    spans.extend(pair("Enter ", "choose file  "));
                    spans.extend(pair("c ", "clear  "));
                }
            }
            spans.extend(pair("Ctrl-s ", "save tab  "));
            spans.extend(pair("Esc ", "close"));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

impl Component for EditModalScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some((target, mut field)) = self.editing.take() {
            match field.handle_key(key) {
                FieldKey::Editing => self.editing = Some((target, field)),
                FieldKey::Cancel => {}
                FieldKey::Commit => return Ok(self.commit(&target, field.value())),
            }
            return Ok(None);
        }

        if key.code != KeyCode::Esc {
            self.discard_armed = false;
        }

        let action = match (key.modifiers, key.code) {
            (_, KeyCode::Esc) => Some(self.close()),
            (KeyModifiers::CONTROL, KeyCode::Char('s')) => Some(self.save()),
            (_, KeyCode::Tab) => {
                self.modal.next_tab();
                None
            }
            (_, KeyCode::BackTab) => {
                self.modal.prev_tab();
                None
            }
            _ => match self.modal.tab() {
                ModalTab::Basic => self.handle_basic_key(key),
                ModalTab::Ticket => self.handle_ticket_key(key),
                ModalTab::Poster => self.handle_poster_key(key),
            },
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::TicketsLoaded { event_id, result } if event_id == self.modal.event_id() => {
                self.modal.tickets_loaded(result.clone());
            }
            Action::Tick => {
                if self.modal.is_saving() || matches!(self.modal.ticket_load(), TicketLoad::Loading) {
                    self.throbber_state.calc_next();
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let width = 84u16.min(area.width.saturating_sub(4));
        let height = 24u16.min(area.height.saturating_sub(2));
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        let overlay = Rect::new(x, y, width, height);

        frame.render_widget(Clear, overlay);

        let block = Block::default()
            .title(format!(" Edit · {} ", self.modal.event().name))
            .title_style(Style::default().fg(theme::YELLOW).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(theme::ACCENT))
            .style(Style::default().bg(theme::BG_DARK));
        let inner = block.inner(overlay);
        frame.render_widget(block, overlay);

        let layout = Layout::vertical([
            Constraint::Length(1), // status
            Constraint::Length(1), // tabs
            Constraint::Length(1),
            Constraint::Min(1),    // body
            Constraint::Length(1), // field editor
            Constraint::Length(1), // last error
            Constraint::Length(1), // hints
        ])
        .split(inner);

        self.render_header(frame, layout[0]);

        let marked = [
            self.modal.basic().is_dirty(),
            self.modal.ticket().is_some_and(TicketDraft::is_dirty),
            self.modal.poster().is_dirty(),
        ];
        frame.render_widget(
            Paragraph::new(render_sub_tabs(&TAB_LABELS, self.modal.tab().index(), &marked)),
            layout[1],
        );

        match self.modal.tab() {
            ModalTab::Basic => self.render_basic(frame, layout[3]),
            ModalTab::Ticket => self.render_ticket(frame, layout[3]),
            ModalTab::Poster => self.render_poster(frame, layout[3]),
        }

        if let Some((target, field)) = &self.editing {
            let prefix = Line::from(vec![
                Span::styled(" ✎ ", Style::default().fg(theme::YELLOW)),
                Span::styled(format!("{}: ", target.label()), theme::field_label(true)),
            ]);
            field.render(frame, layout[4], prefix);
        }

        if let Some(message) = self.modal.last_error() {
            frame.render_widget(
                Paragraph::new(Span::styled(format!(" ✗ {message}"), theme::error_text())),
                layout[5],
            );
        }

        self.render_hints(frame, layout[6]);
    }

    fn id(&self) -> &'static str {
        "EditModal"
    }
}
