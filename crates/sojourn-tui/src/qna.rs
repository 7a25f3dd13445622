//! Q&A accordion under the results panel.
//!
//! At most one entry is expanded at a time; toggling an open entry closes
//! it, toggling a closed one closes the previous and opens it.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use sojourn_core::types::QnaPair;

/// Accordion state over the generated Q&A entries.
#[derive(Debug, Clone, Default)]
pub struct QnaState {
    entries: Vec<QnaPair>,
    expanded: Option<usize>,
    cursor: usize,
}

impl QnaState {
    /// Replace the entries, collapsing everything.
    pub fn set_entries(&mut self, entries: Vec<QnaPair>) {
        self.entries = entries;
        self.expanded = None;
        self.cursor = 0;
    }

    pub fn entries(&self) -> &[QnaPair] {
        &self.entries
    }

    /// Number of entries, shown as the section badge.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn expanded(&self) -> Option<usize> {
        self.expanded
    }

    /// Move the cursor up, stopping at the first entry.
    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move the cursor down, stopping at the last entry.
    pub fn cursor_down(&mut self) {
        if self.cursor + 1 < self.entries.len() {
            self.cursor += 1;
        }
    }

    /// Toggle the entry under the cursor.
    pub fn toggle(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.expanded = if self.expanded == Some(self.cursor) {
            None
        } else {
            Some(self.cursor)
        };
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.expanded = None;
        self.cursor = 0;
    }
}

/// Draw the accordion list with the expanded answer inline.
pub fn draw_qna(frame: &mut Frame, area: Rect, state: &QnaState) {
    let title = format!(" Questions & Answers ({}) ", state.count());

    if state.entries().is_empty() {
        let placeholder = Paragraph::new("No questions generated.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(placeholder, area);
        return;
    }

    let mut lines = Vec::new();
    for (i, pair) in state.entries().iter().enumerate() {
        let marker = if state.expanded() == Some(i) { "▾" } else { "▸" };
        let style = if i == state.cursor() {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {marker} {}", pair.question), style),
            Span::styled(
                format!("  [{}]", pair.category),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
        if state.expanded() == Some(i) {
            lines.push(Line::from(Span::styled(
                format!("   {}", pair.answer),
                Style::default().fg(Color::Gray),
            )));
        }
    }

    let list = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(list, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(q: &str) -> QnaPair {
        QnaPair {
            question: q.to_string(),
            answer: format!("Answer to {q}"),
            category: "general".to_string(),
        }
    }

    fn state_with(n: usize) -> QnaState {
        let mut state = QnaState::default();
        state.set_entries((0..n).map(|i| pair(&format!("Q{i}"))).collect());
        state
    }

    #[test]
    fn test_toggle_opens_and_closes() {
        let mut state = state_with(3);
        assert_eq!(state.expanded(), None);
        state.toggle();
        assert_eq!(state.expanded(), Some(0));
        state.toggle();
        assert_eq!(state.expanded(), None);
    }

    #[test]
    fn test_at_most_one_entry_expanded() {
        let mut state = state_with(3);
        state.toggle();
        state.cursor_down();
        state.toggle();
        assert_eq!(state.expanded(), Some(1));
    }

    #[test]
    fn test_cursor_clamps_at_ends() {
        let mut state = state_with(2);
        state.cursor_up();
        assert_eq!(state.cursor(), 0);
        state.cursor_down();
        state.cursor_down();
        assert_eq!(state.cursor(), 1);
    }

    #[test]
    fn test_toggle_on_empty_is_noop() {
        let mut state = QnaState::default();
        state.toggle();
        assert_eq!(state.expanded(), None);
    }

    #[test]
    fn test_new_entries_collapse_everything() {
        let mut state = state_with(2);
        state.toggle();
        state.set_entries(vec![pair("fresh")]);
        assert_eq!(state.expanded(), None);
        assert_eq!(state.cursor(), 0);
        assert_eq!(state.count(), 1);
    }
}
