//! Horizontal tab bar used by the edit dialog.

use ratatui::style::Modifier;
use ratatui::text::{Line, Span};

use crate::theme;

/// Tab bar line with the active tab bracketed and highlighted.
///
/// Labels in `marked` get a trailing `*`, used for tabs with unsaved edits.
pub fn render_sub_tabs<'a>(labels: &[&'a str], active_index: usize, marked: &[bool]) -> Line<'a> {
    let mut spans = Vec::with_capacity(labels.len() * 2);

    for (i, label) in labels.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ", theme::key_hint()));
        }
        let mark = if marked.get(i).copied().unwrap_or(false) { "*" } else { "" };

        if i == active_index {
            spans.push(Span::styled(
                format!("[{label}{mark}]"),
                theme::tab_active().add_modifier(Modifier::UNDERLINED),
            ));
        } else {
            spans.push(Span::styled(format!(" {label}{mark} "), theme::tab_inactive()));
        }
    }

    Line::from(spans)
}
