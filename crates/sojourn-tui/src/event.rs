//! Event handling for the Sojourn TUI.
//!
//! Keyboard input is translated into [`AppEvent`]s according to the current
//! [`InputMode`]; the app applies them to its state. While a form field is
//! focused, printable keys are text input rather than hotkeys.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Application-level events that can trigger state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Begin the form from the welcome panel
    Begin,
    /// Advance the form step (submits on the terminal step)
    Advance,
    /// Retreat one form step (unconditional)
    Retreat,
    /// Focus the next form field
    FocusNext,
    /// Focus the previous form field
    FocusPrev,
    /// Select the previous shortlist pill
    SelectPrev,
    /// Select the next shortlist pill
    SelectNext,
    /// Move the Q&A cursor up
    NavigateUp,
    /// Move the Q&A cursor down
    NavigateDown,
    /// Toggle the Q&A entry under the cursor
    ToggleEntry,
    /// Export the selected program's timeline
    Export,
    /// Run resume auto-fill against the parse endpoint
    AutoFill,
    /// Reset to the welcome panel, clearing all derived state
    Reset,
    /// Dismiss the error overlay
    DismissModal,
    /// Text input character for the focused field
    TextInput(char),
    /// Backspace in the focused field
    Backspace,
    /// Request application quit
    Quit,
    /// Force quit (Ctrl+C)
    ForceQuit,
    /// No action needed
    None,
}

/// Input interpretation mode, derived from the app's current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Welcome panel: Enter begins, q quits
    #[default]
    Welcome,
    /// Form view: printable keys edit the focused field
    Form,
    /// Progress view: only reset/quit apply
    Progress,
    /// Results view: pill selection, Q&A accordion, export
    Results,
    /// Error overlay shown: any dismissal key closes it
    Modal,
}

/// Converts key events into app events for the current mode.
#[derive(Debug, Default)]
pub struct InputHandler {
    mode: InputMode,
}

impl InputHandler {
    /// Create a new input handler in welcome mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the interpretation mode.
    pub fn set_mode(&mut self, mode: InputMode) {
        self.mode = mode;
    }

    /// Returns the current interpretation mode.
    pub fn mode(&self) -> InputMode {
        self.mode
    }

    /// Handle a key event and return the corresponding app event.
    pub fn handle_key(&self, key: KeyEvent) -> AppEvent {
        // Ctrl+C always force quits
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return AppEvent::ForceQuit;
        }

        match self.mode {
            InputMode::Welcome => Self::handle_welcome(key),
            InputMode::Form => Self::handle_form(key),
            InputMode::Progress => Self::handle_progress(key),
            InputMode::Results => Self::handle_results(key),
            InputMode::Modal => Self::handle_modal(key),
        }
    }

    fn handle_welcome(key: KeyEvent) -> AppEvent {
        match key.code {
            KeyCode::Enter => AppEvent::Begin,
            KeyCode::Char('q') | KeyCode::Char('Q') => AppEvent::Quit,
            _ => AppEvent::None,
        }
    }

    /// Form mode: printable characters are field input, never hotkeys.
    fn handle_form(key: KeyEvent) -> AppEvent {
        match key.code {
            KeyCode::Enter => AppEvent::Advance,
            KeyCode::Esc => AppEvent::Retreat,
            KeyCode::Tab | KeyCode::Down => AppEvent::FocusNext,
            KeyCode::BackTab | KeyCode::Up => AppEvent::FocusPrev,
            KeyCode::Backspace => AppEvent::Backspace,
            // Ctrl+U triggers resume auto-fill so plain 'u' stays typeable
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                AppEvent::AutoFill
            }
            KeyCode::Char(c) => AppEvent::TextInput(c),
            _ => AppEvent::None,
        }
    }

    fn handle_progress(key: KeyEvent) -> AppEvent {
        match key.code {
            KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Esc => AppEvent::Reset,
            KeyCode::Char('q') | KeyCode::Char('Q') => AppEvent::Quit,
            _ => AppEvent::None,
        }
    }

    fn handle_results(key: KeyEvent) -> AppEvent {
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => AppEvent::SelectPrev,
            KeyCode::Right | KeyCode::Char('l') => AppEvent::SelectNext,
            KeyCode::Up | KeyCode::Char('k') => AppEvent::NavigateUp,
            KeyCode::Down | KeyCode::Char('j') => AppEvent::NavigateDown,
            KeyCode::Enter | KeyCode::Char(' ') => AppEvent::ToggleEntry,
            KeyCode::Char('e') | KeyCode::Char('E') => AppEvent::Export,
            KeyCode::Char('r') | KeyCode::Char('R') => AppEvent::Reset,
            KeyCode::Char('q') | KeyCode::Char('Q') => AppEvent::Quit,
            _ => AppEvent::None,
        }
    }

    fn handle_modal(key: KeyEvent) -> AppEvent {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ') => AppEvent::DismissModal,
            _ => AppEvent::None,
        }
    }
}
