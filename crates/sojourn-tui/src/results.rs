//! Results panel: shortlist pills and the selected program's detail.
//!
//! Exactly one program is selected at a time; the detail pane below the
//! pill row always shows the selected program. An empty shortlist renders
//! a placeholder instead.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use sojourn_core::types::ProgramMatch;

/// Selection state over the shortlist.
#[derive(Debug, Clone, Default)]
pub struct ResultsState {
    shortlist: Vec<ProgramMatch>,
    selected: usize,
}

impl ResultsState {
    /// Take ownership of a freshly arrived shortlist, selecting the first
    /// program.
    pub fn set_shortlist(&mut self, shortlist: Vec<ProgramMatch>) {
        self.shortlist = shortlist;
        self.selected = 0;
    }

    pub fn shortlist(&self) -> &[ProgramMatch] {
        &self.shortlist
    }

    pub fn is_empty(&self) -> bool {
        self.shortlist.is_empty()
    }

    /// Index of the selected pill.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// The selected program, if the shortlist is non-empty.
    pub fn selected_match(&self) -> Option<&ProgramMatch> {
        self.shortlist.get(self.selected)
    }

    /// Select the next pill, stopping at the last.
    pub fn select_next(&mut self) {
        if self.selected + 1 < self.shortlist.len() {
            self.selected += 1;
        }
    }

    /// Select the previous pill, stopping at the first.
    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Drop the shortlist and selection.
    pub fn clear(&mut self) {
        self.shortlist.clear();
        self.selected = 0;
    }
}

/// Flag emoji for the program's country, with a globe fallback.
pub fn flag_for_country(country: &str) -> &'static str {
    match country.trim() {
        "USA" | "United States" | "US" => "🇺🇸",
        "UK" | "United Kingdom" => "🇬🇧",
        "Germany" => "🇩🇪",
        "Canada" => "🇨🇦",
        "Australia" => "🇦🇺",
        "France" => "🇫🇷",
        "Netherlands" => "🇳🇱",
        "Ireland" => "🇮🇪",
        "Singapore" => "🇸🇬",
        "Sweden" => "🇸🇪",
        "Switzerland" => "🇨🇭",
        "New Zealand" => "🇳🇿",
        "Italy" => "🇮🇹",
        "Spain" => "🇪🇸",
        "Japan" => "🇯🇵",
        _ => "🌐",
    }
}

/// Label for one shortlist pill, truncated to fit the pill row.
pub fn pill_label(m: &ProgramMatch, max_width: usize) -> String {
    let flag = flag_for_country(&m.program.country);
    let text = format!("{flag} {} · {}", m.program.university, m.program.name);
    truncate_label(&text, max_width)
}

fn truncate_label(text: &str, max_width: usize) -> String {
    if text.chars().count() <= max_width {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_width.saturating_sub(1)).collect();
    format!("{kept}…")
}

/// Plain-text detail lines for the selected program.
///
/// Sections in order: program facts, match reasoning, requirements,
/// timeline, warnings. Empty sections are omitted entirely rather than
/// rendered as empty headers.
pub fn detail_lines(m: &ProgramMatch) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let heading = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().fg(Color::DarkGray);

    lines.push(Line::from(Span::styled(
        format!(
            "{} {} — {}",
            flag_for_country(&m.program.country),
            m.program.university,
            m.program.name
        ),
        heading,
    )));
    lines.push(Line::from(format!("Country: {}", m.program.country)));
    lines.push(Line::from(format!("Tuition: {}", m.program.tuition_range)));
    lines.push(Line::from(format!(
        "Deadline: {}",
        m.program.application_deadline
    )));
    if !m.program.eligibility_criteria.is_empty() {
        lines.push(Line::from(format!(
            "Eligibility: {}",
            m.program.eligibility_criteria
        )));
    }

    if let Some(reasoning) = m.program.match_reasoning.as_deref() {
        if !reasoning.is_empty() {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled("Why this program", heading)));
            lines.push(Line::from(reasoning.to_string()));
        }
    }

    if let Some(req) = &m.requirements {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled("Requirements", heading)));
        for doc in &req.required_documents {
            lines.push(Line::from(format!("  • {doc}")));
        }
        for test in &req.test_requirements {
            lines.push(Line::from(format!("  • {test}")));
        }
        if let Some(notes) = req.special_notes.as_deref() {
            if !notes.is_empty() {
                lines.push(Line::from(Span::styled(format!("  {notes}"), dim)));
            }
        }
    }

    if !m.timeline.is_empty() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled("Timeline", heading)));
        for (i, task) in m.timeline.iter().enumerate() {
            lines.push(Line::from(format!(
                "  {}. {} — due {}",
                i + 1,
                task.title,
                task.due_date
            )));
            if let Some(dep) = task.dependency.as_deref() {
                if !dep.is_empty() {
                    lines.push(Line::from(Span::styled(
                        format!("     after: {dep}"),
                        dim,
                    )));
                }
            }
        }
    }

    if !m.warnings.is_empty() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "Warnings",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        for warning in &m.warnings {
            lines.push(Line::from(Span::styled(
                format!("  ⚠ {warning}"),
                Style::default().fg(Color::Yellow),
            )));
        }
    }

    lines
}

/// Draw the shortlist pill row and the selected program's detail pane.
pub fn draw_results(frame: &mut Frame, area: Rect, state: &ResultsState) {
    if state.is_empty() {
        let placeholder = Paragraph::new("No programs found.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(" Shortlist "));
        frame.render_widget(placeholder, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(area);

    let pill_width = (chunks[0].width as usize / state.shortlist().len().max(1)).max(8);
    let spans: Vec<Span> = state
        .shortlist()
        .iter()
        .enumerate()
        .flat_map(|(i, m)| {
            let style = if i == state.selected() {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            [
                Span::styled(format!(" {} ", pill_label(m, pill_width)), style),
                Span::raw(" "),
            ]
        })
        .collect();

    let pills = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title(" Shortlist "));
    frame.render_widget(pills, chunks[0]);

    if let Some(selected) = state.selected_match() {
        let detail = Paragraph::new(detail_lines(selected))
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title(" Program "));
        frame.render_widget(detail, chunks[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sojourn_core::types::{Program, ProgramRequirements, TimelineTask};

    fn program(university: &str, name: &str) -> ProgramMatch {
        ProgramMatch {
            program: Program {
                name: name.to_string(),
                university: university.to_string(),
                country: "Germany".to_string(),
                tuition_range: "EUR 0 - 300/semester".to_string(),
                application_deadline: "2025-01-15".to_string(),
                eligibility_criteria: String::new(),
                match_reasoning: None,
            },
            requirements: None,
            timeline: vec![],
            warnings: vec![],
        }
    }

    fn state_with(n: usize) -> ResultsState {
        let mut state = ResultsState::default();
        state.set_shortlist(
            (0..n)
                .map(|i| program(&format!("Uni {i}"), "M.Sc."))
                .collect(),
        );
        state
    }

    #[test]
    fn test_selection_clamps_at_ends() {
        let mut state = state_with(3);
        state.select_prev();
        assert_eq!(state.selected(), 0);
        state.select_next();
        state.select_next();
        state.select_next();
        assert_eq!(state.selected(), 2);
    }

    #[test]
    fn test_new_shortlist_selects_first() {
        let mut state = state_with(3);
        state.select_next();
        state.set_shortlist(vec![program("TUM", "M.Sc.")]);
        assert_eq!(state.selected(), 0);
        assert_eq!(state.selected_match().unwrap().program.university, "TUM");
    }

    #[test]
    fn test_empty_shortlist_has_no_selection() {
        let state = ResultsState::default();
        assert!(state.is_empty());
        assert!(state.selected_match().is_none());
    }

    #[test]
    fn test_flag_lookup_with_globe_fallback() {
        assert_eq!(flag_for_country("Germany"), "🇩🇪");
        assert_eq!(flag_for_country("USA"), "🇺🇸");
        assert_eq!(flag_for_country("United Kingdom"), "🇬🇧");
        assert_eq!(flag_for_country("Atlantis"), "🌐");
    }

    #[test]
    fn test_pill_label_truncates() {
        let m = program("A University With A Very Long Name", "M.Sc. Informatics");
        let label = pill_label(&m, 20);
        assert!(label.chars().count() <= 20);
        assert!(label.ends_with('…'));
    }

    #[test]
    fn test_detail_omits_empty_sections() {
        let m = program("TUM", "M.Sc.");
        let text: String = detail_lines(&m)
            .iter()
            .flat_map(|l| l.spans.iter().map(|s| s.content.to_string()))
            .collect();
        assert!(!text.contains("Warnings"));
        assert!(!text.contains("Requirements"));
        assert!(!text.contains("Timeline"));
    }

    #[test]
    fn test_detail_renders_all_sections() {
        let mut m = program("TUM", "M.Sc.");
        m.program.match_reasoning = Some("Strong AI focus".to_string());
        m.requirements = Some(ProgramRequirements {
            program_name: "M.Sc.".to_string(),
            required_documents: vec!["Transcript".to_string()],
            test_requirements: vec!["TOEFL 90+".to_string()],
            special_notes: Some("Apply early".to_string()),
        });
        m.timeline = vec![TimelineTask {
            title: "Submit transcripts".to_string(),
            description: String::new(),
            due_date: "2024-01-10".to_string(),
            dependency: Some("Get transcripts".to_string()),
            status: "Pending".to_string(),
        }];
        m.warnings = vec!["GPA below typical admits".to_string()];

        let text: String = detail_lines(&m)
            .iter()
            .flat_map(|l| l.spans.iter().map(|s| s.content.to_string()))
            .collect();
        assert!(text.contains("Why this program"));
        assert!(text.contains("Transcript"));
        assert!(text.contains("TOEFL 90+"));
        assert!(text.contains("Submit transcripts"));
        assert!(text.contains("after: Get transcripts"));
        assert!(text.contains("GPA below typical admits"));
    }
}
