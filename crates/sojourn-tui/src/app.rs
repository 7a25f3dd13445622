//! Main application state and loop for the Sojourn TUI.
//!
//! The `App` owns every piece of UI state and a receiver of [`UiMessage`]s.
//! Network work runs on background threads that own a small tokio runtime;
//! they report back over the channel so the draw loop never blocks.

use std::io;
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEvent};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use tracing::{debug, error, warn};

use sojourn_client::config::ClientConfig;
use sojourn_client::resume::ResumeClient;
use sojourn_client::stream::{CancelToken, EventSink, PlanClient};
use sojourn_client::ClientError;
use sojourn_core::agent::{AgentStage, PipelineProgress};
use sojourn_core::error::SojournError;
use sojourn_core::types::{ResumeProfile, StreamEvent};

use crate::event::{AppEvent, InputHandler, InputMode};
use crate::form::{AdvanceOutcome, FieldId, FormState};
use crate::progress::draw_progress;
use crate::qna::{draw_qna, QnaState};
use crate::results::{draw_results, ResultsState};
use crate::view::{FormStep, Phase, View};

/// Result type for app operations.
pub type AppResult<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Target frame rate (30 FPS is plenty for a form-and-stream UI).
const FRAME_DURATION: Duration = Duration::from_millis(1000 / 30);

/// Messages from background work to the UI loop.
///
/// Every message carries the id of the run that produced it. Cancellation is
/// cooperative, so a cancelled thread may already have queued messages; the
/// app drops anything from a superseded run instead of applying it.
#[derive(Debug)]
pub enum UiMessage {
    /// One decoded record from the plan stream
    Event { run: u64, event: StreamEvent },
    /// The plan stream failed at the transport level
    StreamFailed { run: u64, message: String },
    /// The server closed the plan stream
    StreamClosed { run: u64 },
    /// Resume parsing produced a partial profile
    ResumeParsed { run: u64, profile: ResumeProfile },
    /// Resume parsing failed or was rejected
    ResumeFailed { run: u64, message: String },
}

impl UiMessage {
    /// Id of the run this message belongs to.
    fn run(&self) -> u64 {
        match self {
            UiMessage::Event { run, .. }
            | UiMessage::StreamFailed { run, .. }
            | UiMessage::StreamClosed { run }
            | UiMessage::ResumeParsed { run, .. }
            | UiMessage::ResumeFailed { run, .. } => *run,
        }
    }
}

/// [`EventSink`] that forwards stream events into the UI channel.
struct UiEventSink {
    tx: Sender<UiMessage>,
    run: u64,
}

impl EventSink for UiEventSink {
    fn emit(&self, event: StreamEvent) {
        let _ = self.tx.send(UiMessage::Event {
            run: self.run,
            event,
        });
    }
}

/// Main application state.
pub struct App {
    view: View,
    form: FormState,
    progress: PipelineProgress,
    results: ResultsState,
    qna: QnaState,
    input_handler: InputHandler,
    /// Live line under the pipeline while streaming
    status_message: String,
    /// Error overlay text; Some means the modal is up
    modal_error: Option<String>,
    /// A plan stream or resume parse is in flight
    loading: bool,
    should_quit: bool,
    dirty: bool,
    tx: Sender<UiMessage>,
    rx: Receiver<UiMessage>,
    cancel: CancelToken,
    /// Current run generation; bumped by submit, auto-fill, and reset
    run_id: u64,
    config: ClientConfig,
    /// Directory exported workbooks are written into
    export_dir: PathBuf,
}

impl App {
    /// Create a new app writing exports into the current directory.
    pub fn new(config: ClientConfig) -> Self {
        let export_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::with_export_dir(config, export_dir)
    }

    /// Create a new app with an explicit export directory.
    pub fn with_export_dir(config: ClientConfig, export_dir: PathBuf) -> Self {
        let (tx, rx) = std::sync::mpsc::channel();
        Self {
            view: View::default(),
            form: FormState::new(),
            progress: PipelineProgress::new(),
            results: ResultsState::default(),
            qna: QnaState::default(),
            input_handler: InputHandler::new(),
            status_message: String::new(),
            modal_error: None,
            loading: false,
            should_quit: false,
            dirty: true,
            tx,
            rx,
            cancel: CancelToken::new(),
            run_id: 0,
            config,
            export_dir,
        }
    }

    /// Returns the current view.
    pub fn view(&self) -> View {
        self.view
    }

    /// Returns whether the app should quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Returns the error overlay text, if shown.
    pub fn modal_error(&self) -> Option<&str> {
        self.modal_error.as_deref()
    }

    /// Form state, exposed for drawing and tests.
    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// Results state, exposed for drawing and tests.
    pub fn results(&self) -> &ResultsState {
        &self.results
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// The input mode is derived from state so it can never go stale.
    fn input_mode(&self) -> InputMode {
        if self.modal_error.is_some() {
            return InputMode::Modal;
        }
        match self.view {
            View::Welcome => InputMode::Welcome,
            View::Form => InputMode::Form,
            View::Progress => InputMode::Progress,
            View::Results => InputMode::Results,
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        self.input_handler.set_mode(self.input_mode());
        let app_event = self.input_handler.handle_key(key);
        self.handle_app_event(app_event);
    }

    /// Apply one app event to the state.
    pub fn handle_app_event(&mut self, app_event: AppEvent) {
        match app_event {
            AppEvent::Begin => {
                self.view = View::Form;
            }
            AppEvent::Advance => match self.form.advance_step() {
                AdvanceOutcome::Advanced | AdvanceOutcome::Invalid => {}
                AdvanceOutcome::Submit => self.submit(),
            },
            AppEvent::Retreat => {
                self.form.retreat_step();
            }
            AppEvent::FocusNext => self.form.focus_next(),
            AppEvent::FocusPrev => self.form.focus_prev(),
            AppEvent::TextInput(c) => self.form.push_char(c),
            AppEvent::Backspace => self.form.pop_char(),
            AppEvent::AutoFill => self.autofill(),
            AppEvent::SelectPrev => self.results.select_prev(),
            AppEvent::SelectNext => self.results.select_next(),
            AppEvent::NavigateUp => self.qna.cursor_up(),
            AppEvent::NavigateDown => self.qna.cursor_down(),
            AppEvent::ToggleEntry => self.qna.toggle(),
            AppEvent::Export => self.export(),
            AppEvent::Reset => self.reset(),
            AppEvent::DismissModal => {
                self.modal_error = None;
                // A failed run drops back to the form for another attempt
                if self.view == View::Progress && !self.loading {
                    self.view = View::Form;
                }
            }
            AppEvent::Quit | AppEvent::ForceQuit => {
                self.cancel.cancel();
                self.should_quit = true;
            }
            AppEvent::None => return,
        }
        self.mark_dirty();
    }

    /// Submit the collected profile and start pumping the plan stream.
    fn submit(&mut self) {
        let profile = self.form.collect();
        debug!(countries = profile.target_countries.len(), "submitting profile");

        self.progress.reset();
        self.results.clear();
        self.qna.clear();
        self.status_message = "Contacting the planner...".to_string();
        self.loading = true;
        self.view = View::Progress;
        self.cancel = CancelToken::new();
        self.run_id += 1;

        let run = self.run_id;
        let tx = self.tx.clone();
        let cancel = self.cancel.clone();
        let config = self.config.clone();
        std::thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    let _ = tx.send(UiMessage::StreamFailed {
                        run,
                        message: format!("Failed to start runtime: {e}"),
                    });
                    return;
                }
            };
            let outcome = runtime.block_on(async {
                let client = PlanClient::from_config(config)?;
                let sink = UiEventSink {
                    tx: tx.clone(),
                    run,
                };
                client.generate_plan(&profile, &sink, &cancel).await
            });
            match outcome {
                Ok(()) => {
                    let _ = tx.send(UiMessage::StreamClosed { run });
                }
                Err(ClientError::Cancelled) => {
                    debug!("plan stream cancelled");
                }
                Err(e) => {
                    error!(error = %e, "plan stream failed");
                    let _ = tx.send(UiMessage::StreamFailed {
                        run,
                        message: e.friendly_message(),
                    });
                }
            }
        });
    }

    /// Send the resume text for parsing and merge the result into the form.
    fn autofill(&mut self) {
        let text = self.form.value(FieldId::ResumeText).to_string();
        if text.trim().is_empty() {
            self.modal_error = Some("Paste your resume text first.".to_string());
            return;
        }
        self.loading = true;
        self.status_message = "Parsing resume...".to_string();
        self.run_id += 1;

        let run = self.run_id;
        let tx = self.tx.clone();
        let config = self.config.clone();
        std::thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    let _ = tx.send(UiMessage::ResumeFailed {
                        run,
                        message: format!("Failed to start runtime: {e}"),
                    });
                    return;
                }
            };
            let outcome = runtime.block_on(async {
                let client = ResumeClient::from_config(config)?;
                client.parse_resume(&text).await
            });
            match outcome {
                Ok(profile) => {
                    let _ = tx.send(UiMessage::ResumeParsed { run, profile });
                }
                Err(e) => {
                    warn!(error = %e, "resume parse failed");
                    let _ = tx.send(UiMessage::ResumeFailed {
                        run,
                        message: e.friendly_message(),
                    });
                }
            }
        });
    }

    /// Cancel any in-flight stream and return to the welcome panel.
    ///
    /// Bumping the run id makes messages the cancelled thread already queued
    /// stale, so the cleared state cannot be repopulated behind our back.
    fn reset(&mut self) {
        self.cancel.cancel();
        self.run_id += 1;
        self.loading = false;
        self.form.reset();
        self.progress.reset();
        self.results.clear();
        self.qna.clear();
        self.status_message.clear();
        self.modal_error = None;
        self.view = View::Welcome;
    }

    /// Export the selected program's timeline into the export directory.
    fn export(&mut self) {
        let Some(selected) = self.results.selected_match() else {
            self.modal_error = Some(modal_text(&SojournError::ExportNoSelection));
            return;
        };
        if selected.timeline.is_empty() {
            self.modal_error = Some("The selected program has no timeline to export.".to_string());
            return;
        }
        match sojourn_export::export_timeline(selected, &self.export_dir) {
            Ok(path) => {
                self.status_message = format!("Exported {}", path.display());
            }
            Err(e) => {
                error!(error = %e, "timeline export failed");
                self.modal_error = Some(modal_text(&e));
            }
        }
    }

    /// Drain every pending background message; returns true if any arrived.
    fn drain_messages(&mut self) -> bool {
        let mut changed = false;
        while let Ok(message) = self.rx.try_recv() {
            self.apply_message(message);
            changed = true;
        }
        changed
    }

    /// Apply one background message to the state.
    ///
    /// Messages from a superseded run are dropped: a stale `result` queued
    /// before the thread observed cancellation must not resurrect state a
    /// reset already cleared.
    pub fn apply_message(&mut self, message: UiMessage) {
        if message.run() != self.run_id {
            debug!(
                run = message.run(),
                current = self.run_id,
                "dropping message from superseded run"
            );
            return;
        }
        match message {
            UiMessage::Event {
                event: StreamEvent::Status { agent, message },
                ..
            } => {
                match AgentStage::from_wire(&agent) {
                    Some(stage) => self.progress.on_status(stage),
                    None => warn!(%agent, "status event named an unknown agent"),
                }
                self.status_message = message;
            }
            UiMessage::Event {
                event: StreamEvent::Result { data },
                ..
            } => {
                self.progress.finish();
                self.results.set_shortlist(data.shortlist);
                self.qna.set_entries(data.qna_questions);
                self.loading = false;
                self.status_message = "Plan Generated Successfully!".to_string();
                self.view = View::Results;
            }
            UiMessage::Event {
                event: StreamEvent::Error { message },
                ..
            } => {
                self.loading = false;
                self.modal_error = Some(message);
            }
            UiMessage::StreamFailed { message, .. } => {
                self.loading = false;
                self.modal_error = Some(message);
            }
            UiMessage::StreamClosed { .. } => {
                // A stream that closes without a result event is a failure
                if self.loading {
                    self.loading = false;
                    self.modal_error =
                        Some("The planner closed the stream before finishing.".to_string());
                }
            }
            UiMessage::ResumeParsed { profile, .. } => {
                self.loading = false;
                self.form.apply_resume(&profile);
                self.status_message = "Resume parsed; review the filled fields.".to_string();
            }
            UiMessage::ResumeFailed { message, .. } => {
                self.loading = false;
                self.modal_error = Some(message);
            }
        }
        self.mark_dirty();
    }

    /// Run the main application loop.
    pub fn run(&mut self) -> AppResult<()> {
        crossterm::terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.run_loop(&mut terminal);

        crossterm::terminal::disable_raw_mode()?;
        crossterm::execute!(
            terminal.backend_mut(),
            crossterm::terminal::LeaveAlternateScreen
        )?;
        terminal.show_cursor()?;

        result
    }

    /// The inner event loop: drain background messages, redraw when dirty,
    /// poll input for the remainder of the frame.
    fn run_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> AppResult<()> {
        while !self.should_quit {
            let frame_start = Instant::now();

            if self.drain_messages() {
                self.mark_dirty();
            }

            if self.take_dirty() {
                terminal.draw(|frame| self.draw(frame))?;
            }

            let elapsed = frame_start.elapsed();
            let timeout = FRAME_DURATION.saturating_sub(elapsed).max(Duration::from_millis(10));
            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key_event(key);
                }
            }
        }
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(1),
            ])
            .split(frame.area());

        self.draw_header(frame, chunks[0]);

        match self.view {
            View::Welcome => self.draw_welcome(frame, chunks[1]),
            View::Form => self.draw_form(frame, chunks[1]),
            View::Progress => draw_progress(frame, chunks[1], &self.progress, &self.status_message),
            View::Results => self.draw_results_view(frame, chunks[1]),
        }

        self.draw_footer(frame, chunks[2]);

        if let Some(message) = self.modal_error.clone() {
            self.draw_modal(frame, &message);
        }
    }

    /// Header: app title, view title, and the four-phase journey indicator.
    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let phase = Phase::for_view(self.view, self.progress.active());
        let mut spans = vec![
            Span::styled(
                " Sojourn ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("· {} ", self.view.title()),
                Style::default().fg(Color::Gray),
            ),
            Span::raw("  "),
        ];
        for (i, p) in Phase::ALL.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" ▸ ", Style::default().fg(Color::DarkGray)));
            }
            let style = if *p == phase {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            spans.push(Span::styled(p.title(), style));
        }

        let header = Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::BOTTOM));
        frame.render_widget(header, area);
    }

    fn draw_welcome(&self, frame: &mut Frame, area: Rect) {
        let lines = vec![
            Line::default(),
            Line::from(Span::styled(
                "Plan your study-abroad applications",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from("Fill in your profile and the planner will shortlist programs,"),
            Line::from("extract their requirements, and build an application timeline."),
            Line::default(),
            Line::from(Span::styled(
                "Press Enter to begin.",
                Style::default().fg(Color::Cyan),
            )),
        ];
        let welcome = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(" Welcome "));
        frame.render_widget(welcome, area);
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect) {
        let step = self.form.step();
        let title = format!(
            " Step {}/{}: {} ",
            step.number(),
            FormStep::ALL.len(),
            step.title()
        );

        let mut lines = Vec::new();
        for field in FieldId::for_step(step) {
            let focused = *field == self.form.focused();
            let marker = if focused { "▸ " } else { "  " };
            let label_style = if focused {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let required = if field.is_required() { "*" } else { "" };
            lines.push(Line::from(Span::styled(
                format!("{marker}{}{required}", field.label()),
                label_style,
            )));

            let value = self.form.value(*field);
            let shown = if focused {
                format!("  {value}█")
            } else if value.is_empty() {
                "  ·".to_string()
            } else {
                format!("  {value}")
            };
            lines.push(Line::from(Span::styled(
                shown,
                Style::default().fg(Color::Gray),
            )));

            if let Some(message) = self.form.error_for(*field) {
                lines.push(Line::from(Span::styled(
                    format!("  {message}"),
                    Style::default().fg(Color::Red),
                )));
            }
            lines.push(Line::default());
        }

        if !self.status_message.is_empty() {
            lines.push(Line::from(Span::styled(
                self.status_message.clone(),
                Style::default().fg(Color::Cyan),
            )));
        }

        let form = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(form, area);
    }

    fn draw_results_view(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(area);

        draw_results(frame, chunks[0], &self.results);
        draw_qna(frame, chunks[1], &self.qna);
    }

    /// Footer: key hints for the current mode.
    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let hints = match self.input_mode() {
            InputMode::Welcome => "Enter begin · q quit",
            InputMode::Form => {
                "Enter next · Esc back · Tab field · Ctrl+U auto-fill · Ctrl+C quit"
            }
            InputMode::Progress => "r reset · q quit",
            InputMode::Results => {
                "←/→ program · ↑/↓ question · Enter toggle · e export · r reset · q quit"
            }
            InputMode::Modal => "Esc dismiss",
        };
        let footer = Paragraph::new(Span::styled(
            format!(" {hints}"),
            Style::default().fg(Color::DarkGray),
        ));
        frame.render_widget(footer, area);
    }

    /// Centered error overlay on top of whatever view is showing.
    fn draw_modal(&self, frame: &mut Frame, message: &str) {
        let area = centered_rect(60, 30, frame.area());
        frame.render_widget(Clear, area);
        let modal = Paragraph::new(message.to_string())
            .wrap(Wrap { trim: false })
            .style(Style::default().fg(Color::Red))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Error ")
                    .border_style(Style::default().fg(Color::Red)),
            );
        frame.render_widget(modal, area);
    }
}

/// Overlay text for a core error, with its guidance line when one exists.
fn modal_text(err: &SojournError) -> String {
    match err.guidance() {
        Some(guidance) => format!("{err}.\n{guidance}."),
        None => err.to_string(),
    }
}

/// Helper to create a centered rect using a percentage of the available area.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
