//! View types and navigation for the Sojourn TUI.
//!
//! The single page of the planner cycles through four exclusive views; the
//! form view is further split into three sub-steps. A sidebar phase
//! indicator is derived from the same state, so it can never disagree with
//! the panel being shown.

use std::fmt;

use sojourn_core::agent::AgentStage;

/// Exclusive top-level views of the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Landing panel before the form is started
    #[default]
    Welcome,
    /// The three-step profile form
    Form,
    /// Agent pipeline progress while a plan streams in
    Progress,
    /// Shortlist, timelines, and Q&A once the result arrived
    Results,
}

impl View {
    /// Returns the display title for this view.
    pub fn title(&self) -> &'static str {
        match self {
            View::Welcome => "Welcome",
            View::Form => "Your Profile",
            View::Progress => "Generating Plan",
            View::Results => "Your Plan",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Sub-steps of the profile form, 1-based.
///
/// Step three is terminal: advancing from it submits instead of moving on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormStep {
    #[default]
    Academics,
    Preferences,
    TestsAndResume,
}

impl FormStep {
    /// All steps in order.
    pub const ALL: [FormStep; 3] = [
        FormStep::Academics,
        FormStep::Preferences,
        FormStep::TestsAndResume,
    ];

    /// 1-based index of this step.
    pub fn number(&self) -> usize {
        match self {
            FormStep::Academics => 1,
            FormStep::Preferences => 2,
            FormStep::TestsAndResume => 3,
        }
    }

    /// Returns the display title for this step.
    pub fn title(&self) -> &'static str {
        match self {
            FormStep::Academics => "Academics",
            FormStep::Preferences => "Preferences",
            FormStep::TestsAndResume => "Tests & Resume",
        }
    }

    /// The step after this one, or None when this is the terminal step.
    pub fn next(&self) -> Option<FormStep> {
        match self {
            FormStep::Academics => Some(FormStep::Preferences),
            FormStep::Preferences => Some(FormStep::TestsAndResume),
            FormStep::TestsAndResume => None,
        }
    }

    /// The step before this one, or None at the first step.
    pub fn prev(&self) -> Option<FormStep> {
        match self {
            FormStep::Academics => None,
            FormStep::Preferences => Some(FormStep::Academics),
            FormStep::TestsAndResume => Some(FormStep::Preferences),
        }
    }

    /// Whether advancing from here submits the form.
    pub fn is_terminal(&self) -> bool {
        self.next().is_none()
    }
}

/// High-level journey phase shown in the sidebar indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Profile,
    Shortlist,
    Requirements,
    Timeline,
}

impl Phase {
    /// All phases in journey order.
    pub const ALL: [Phase; 4] = [
        Phase::Profile,
        Phase::Shortlist,
        Phase::Requirements,
        Phase::Timeline,
    ];

    /// Returns the display title for this phase.
    pub fn title(&self) -> &'static str {
        match self {
            Phase::Profile => "Profile",
            Phase::Shortlist => "Shortlist",
            Phase::Requirements => "Requirements",
            Phase::Timeline => "Timeline",
        }
    }

    /// Phase corresponding to an active pipeline stage.
    pub fn for_stage(stage: AgentStage) -> Phase {
        match stage {
            AgentStage::ProfileIntake => Phase::Profile,
            AgentStage::ProgramSearch => Phase::Shortlist,
            AgentStage::RequirementsParser => Phase::Requirements,
            AgentStage::TimelinePlanner
            | AgentStage::ChecklistValidator
            | AgentStage::QnaGenerator => Phase::Timeline,
        }
    }

    /// Phase for the current view, given the stage active in a run.
    ///
    /// Derivation keeps the indicator consistent with the panel shown:
    /// the form is always the Profile phase, the progress panel tracks the
    /// active stage, and the results panel is the Timeline phase.
    pub fn for_view(view: View, active_stage: Option<AgentStage>) -> Phase {
        match view {
            View::Welcome | View::Form => Phase::Profile,
            View::Progress => active_stage.map(Phase::for_stage).unwrap_or(Phase::Profile),
            View::Results => Phase::Timeline,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}
