//! Single-line text entry on top of `tui-input`.
//!
//! Keys are mapped to backend-independent `InputRequest`s so the field does
//! not depend on which crossterm version `tui-input` was built against.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Position, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};
use tui_input::{Input, InputRequest};

use crate::theme;

/// What the owner should do after a key reached the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKey {
    /// Keep editing.
    Editing,
    /// Enter: take the value.
    Commit,
    /// Esc: drop the value.
    Cancel,
}

/// A text field being edited in place.
#[derive(Debug, Clone)]
pub struct TextField {
    input: Input,
}

impl TextField {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            input: Input::new(initial.into()),
        }
    }

    pub fn value(&self) -> &str {
        self.input.value()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FieldKey {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let request = match key.code {
            KeyCode::Enter => return FieldKey::Commit,
            KeyCode::Esc => return FieldKey::Cancel,
            KeyCode::Char('u') if ctrl => InputRequest::DeleteLine,
            KeyCode::Char('w') if ctrl => InputRequest::DeletePrevWord,
            KeyCode::Char('a') if ctrl => InputRequest::GoToStart,
            KeyCode::Char('e') if ctrl => InputRequest::GoToEnd,
            KeyCode::Char(_) if ctrl => return FieldKey::Editing,
            KeyCode::Char(c) => InputRequest::InsertChar(c),
            KeyCode::Backspace => InputRequest::DeletePrevChar,
            KeyCode::Delete => InputRequest::DeleteNextChar,
            KeyCode::Left => InputRequest::GoToPrevChar,
            KeyCode::Right => InputRequest::GoToNextChar,
            KeyCode::Home => InputRequest::GoToStart,
            KeyCode::End => InputRequest::GoToEnd,
            _ => return FieldKey::Editing,
        };
        let _ = self.input.handle(request);
        FieldKey::Editing
    }

    /// Draw the value after `prefix` and place the terminal cursor.
    pub fn render(&self, frame: &mut Frame, area: Rect, prefix: Line<'_>) {
        let prefix_width = u16::try_from(prefix.width()).unwrap_or(u16::MAX);
        let room = usize::from(area.width.saturating_sub(prefix_width).max(1));
        let scroll = self.input.visual_scroll(room);

        let visible: String = self.input.value().chars().skip(scroll).collect();
        let mut spans = prefix.spans;
        spans.push(Span::styled(visible, theme::field_value()));
        frame.render_widget(Paragraph::new(Line::from(spans)), area);

        let cursor = self.input.visual_cursor().saturating_sub(scroll);
        let x = area
            .x
            .saturating_add(prefix_width)
            .saturating_add(u16::try_from(cursor).unwrap_or(u16::MAX));
        frame.set_cursor_position(Position::new(x.min(area.right().saturating_sub(1)), area.y));
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn typed(field: &mut TextField, text: &str) {
        for c in text.chars() {
            field.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn typing_edits_at_the_cursor() {
        let mut field = TextField::new("Gala");
        field.handle_key(key(KeyCode::Home));
        typed(&mut field, "Spring ");
        assert_eq!(field.value(), "Spring Gala");

        field.handle_key(key(KeyCode::End));
        field.handle_key(key(KeyCode::Backspace));
        assert_eq!(field.value(), "Spring Gal");
    }

    #[test]
    fn enter_and_esc_end_editing() {
        let mut field = TextField::new("");
        assert_eq!(field.handle_key(key(KeyCode::Char('x'))), FieldKey::Editing);
        assert_eq!(field.handle_key(key(KeyCode::Enter)), FieldKey::Commit);
        assert_eq!(field.handle_key(key(KeyCode::Esc)), FieldKey::Cancel);
    }

    #[test]
    fn ctrl_u_clears_the_line() {
        let mut field = TextField::new("12.50");
        field.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert_eq!(field.value(), "");
    }
}
