//! Agent pipeline progress panel.
//!
//! Pure projection of [`PipelineProgress`] plus the latest status message
//! into ratatui widgets; the state transitions live in `sojourn-core`.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use sojourn_core::agent::{AgentStage, NodeState, PipelineProgress};

/// Glyph drawn in front of a stage label.
pub fn node_symbol(state: NodeState) -> &'static str {
    match state {
        NodeState::Waiting => "○",
        NodeState::Active => "◐",
        NodeState::Done => "✓",
    }
}

fn node_style(state: NodeState) -> Style {
    match state {
        NodeState::Waiting => Style::default().fg(Color::DarkGray),
        NodeState::Active => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        NodeState::Done => Style::default().fg(Color::Green),
    }
}

/// One rendered line per pipeline stage.
pub fn node_line(stage: AgentStage, state: NodeState) -> Line<'static> {
    let style = node_style(state);
    let mut spans = vec![
        Span::styled(format!(" {} ", node_symbol(state)), style),
        Span::styled(stage.title().to_string(), style),
    ];
    if state == NodeState::Active {
        spans.push(Span::styled(
            format!("  {}", stage.description()),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

/// Draw the progress panel: one line per stage plus the live status message.
pub fn draw_progress(
    frame: &mut Frame,
    area: Rect,
    progress: &PipelineProgress,
    status_message: &str,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(AgentStage::ALL.len() as u16 + 2),
            Constraint::Min(3),
        ])
        .split(area);

    let lines: Vec<Line> = AgentStage::ALL
        .iter()
        .map(|stage| node_line(*stage, progress.state(*stage)))
        .collect();

    let pipeline = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Planning Pipeline "),
    );
    frame.render_widget(pipeline, chunks[0]);

    let status = Paragraph::new(Line::from(vec![Span::styled(
        status_message.to_string(),
        Style::default().fg(Color::Cyan),
    )]))
    .block(Block::default().borders(Borders::ALL).title(" Status "));
    frame.render_widget(status, chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_symbols() {
        assert_eq!(node_symbol(NodeState::Waiting), "○");
        assert_eq!(node_symbol(NodeState::Active), "◐");
        assert_eq!(node_symbol(NodeState::Done), "✓");
    }

    #[test]
    fn test_active_line_carries_description() {
        let line = node_line(AgentStage::ProgramSearch, NodeState::Active);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.contains("Program Search"));
        assert!(text.contains("Shortlisting matching programs"));
    }

    #[test]
    fn test_waiting_line_has_no_description() {
        let line = node_line(AgentStage::ProgramSearch, NodeState::Waiting);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.contains("Program Search"));
        assert!(!text.contains("Shortlisting"));
    }
}
