//! Agent pipeline stages and the progress state machine.
//!
//! The server reports planning progress as `status` events naming an agent
//! stage. The client models each stage as an explicit [`NodeState`] with a
//! pure transition function; rendering projects the states onto the progress
//! panel separately.

use std::fmt;

/// Named stages of the server-side planning pipeline.
///
/// Opaque to the client beyond the identifier and display text; the order
/// here is the display order of the progress panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentStage {
    /// Normalizes the submitted student profile
    ProfileIntake,
    /// Searches and shortlists matching programs
    ProgramSearch,
    /// Extracts per-program admission requirements
    RequirementsParser,
    /// Plans the application timeline per program
    TimelinePlanner,
    /// Validates the plan and raises warnings
    ChecklistValidator,
    /// Generates follow-up Q&A for the shortlist
    QnaGenerator,
}

impl AgentStage {
    /// All stages in display order.
    pub const ALL: [AgentStage; 6] = [
        AgentStage::ProfileIntake,
        AgentStage::ProgramSearch,
        AgentStage::RequirementsParser,
        AgentStage::TimelinePlanner,
        AgentStage::ChecklistValidator,
        AgentStage::QnaGenerator,
    ];

    /// Returns the display title for this stage.
    pub fn title(&self) -> &'static str {
        match self {
            AgentStage::ProfileIntake => "Profile Intake",
            AgentStage::ProgramSearch => "Program Search",
            AgentStage::RequirementsParser => "Requirements Parser",
            AgentStage::TimelinePlanner => "Timeline Planner",
            AgentStage::ChecklistValidator => "Checklist Validator",
            AgentStage::QnaGenerator => "Q&A Generator",
        }
    }

    /// Returns a one-line description for the progress panel.
    pub fn description(&self) -> &'static str {
        match self {
            AgentStage::ProfileIntake => "Analyzing your academic profile",
            AgentStage::ProgramSearch => "Shortlisting matching programs",
            AgentStage::RequirementsParser => "Reading admission requirements",
            AgentStage::TimelinePlanner => "Planning application deadlines",
            AgentStage::ChecklistValidator => "Checking the plan for gaps",
            AgentStage::QnaGenerator => "Preparing follow-up answers",
        }
    }

    /// Try to parse a stage from the `agent` field of a status event.
    pub fn from_wire(name: &str) -> Option<AgentStage> {
        match name {
            "ProfileIntake" => Some(AgentStage::ProfileIntake),
            "ProgramSearch" => Some(AgentStage::ProgramSearch),
            "RequirementsParser" => Some(AgentStage::RequirementsParser),
            "TimelinePlanner" => Some(AgentStage::TimelinePlanner),
            "ChecklistValidator" => Some(AgentStage::ChecklistValidator),
            "QNAGenerator" | "QnaGenerator" => Some(AgentStage::QnaGenerator),
            _ => None,
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0)
    }
}

impl fmt::Display for AgentStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Visual state of one pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeState {
    /// Not yet reported by any status event
    #[default]
    Waiting,
    /// Named by the most recent status event
    Active,
    /// Was active earlier in this run, or the run completed
    Done,
}

/// Per-run progress of the agent pipeline.
///
/// Transitions are monotonic forward within a run (Waiting -> Active -> Done)
/// and [`reset`](PipelineProgress::reset) starts the next run from Waiting.
/// A stage demoted by a later status event is shown as Done even though the
/// server never confirms completion per stage; this mirrors the planner UI's
/// "visited means done" display heuristic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineProgress {
    states: [NodeState; AgentStage::ALL.len()],
    active: Option<AgentStage>,
}

impl Default for PipelineProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineProgress {
    /// Create a fresh pipeline with every stage waiting.
    pub fn new() -> Self {
        Self {
            states: [NodeState::Waiting; AgentStage::ALL.len()],
            active: None,
        }
    }

    /// Returns the state of one stage.
    pub fn state(&self, stage: AgentStage) -> NodeState {
        self.states[stage.index()]
    }

    /// Returns the currently active stage, if any.
    pub fn active(&self) -> Option<AgentStage> {
        self.active
    }

    /// Apply a status event naming `stage`.
    ///
    /// The previously active stage (if different) is marked Done and the
    /// named stage becomes Active.
    pub fn on_status(&mut self, stage: AgentStage) {
        if let Some(prev) = self.active {
            if prev != stage {
                self.states[prev.index()] = NodeState::Done;
            }
        }
        self.states[stage.index()] = NodeState::Active;
        self.active = Some(stage);
    }

    /// Force every stage to Done; called when the result event arrives.
    pub fn finish(&mut self) {
        for state in &mut self.states {
            *state = NodeState::Done;
        }
        self.active = None;
    }

    /// Return every stage to Waiting at the start of a new submission.
    pub fn reset(&mut self) {
        for state in &mut self.states {
            *state = NodeState::Waiting;
        }
        self.active = None;
    }

    /// Returns true once every stage is Done.
    pub fn is_finished(&self) -> bool {
        self.states.iter().all(|s| *s == NodeState::Done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_from_wire() {
        assert_eq!(
            AgentStage::from_wire("ProfileIntake"),
            Some(AgentStage::ProfileIntake)
        );
        assert_eq!(
            AgentStage::from_wire("QNAGenerator"),
            Some(AgentStage::QnaGenerator)
        );
        assert_eq!(AgentStage::from_wire("Unknown"), None);
    }

    #[test]
    fn test_stage_titles() {
        assert_eq!(AgentStage::ProfileIntake.title(), "Profile Intake");
        assert_eq!(AgentStage::QnaGenerator.title(), "Q&A Generator");
    }

    #[test]
    fn test_fresh_pipeline_is_all_waiting() {
        let progress = PipelineProgress::new();
        for stage in AgentStage::ALL {
            assert_eq!(progress.state(stage), NodeState::Waiting);
        }
        assert!(progress.active().is_none());
        assert!(!progress.is_finished());
    }

    #[test]
    fn test_status_activates_stage() {
        let mut progress = PipelineProgress::new();
        progress.on_status(AgentStage::ProfileIntake);
        assert_eq!(progress.state(AgentStage::ProfileIntake), NodeState::Active);
        assert_eq!(progress.active(), Some(AgentStage::ProfileIntake));
        assert_eq!(progress.state(AgentStage::ProgramSearch), NodeState::Waiting);
    }

    #[test]
    fn test_demoted_stage_reads_as_done() {
        let mut progress = PipelineProgress::new();
        progress.on_status(AgentStage::ProfileIntake);
        progress.on_status(AgentStage::ProgramSearch);
        assert_eq!(progress.state(AgentStage::ProfileIntake), NodeState::Done);
        assert_eq!(progress.state(AgentStage::ProgramSearch), NodeState::Active);
    }

    #[test]
    fn test_repeated_status_for_same_stage_stays_active() {
        let mut progress = PipelineProgress::new();
        progress.on_status(AgentStage::RequirementsParser);
        progress.on_status(AgentStage::RequirementsParser);
        assert_eq!(
            progress.state(AgentStage::RequirementsParser),
            NodeState::Active
        );
        assert_eq!(progress.active(), Some(AgentStage::RequirementsParser));
    }

    #[test]
    fn test_finish_forces_every_stage_done() {
        // Any sequence of statuses followed by the result event must leave
        // every stage done, including stages never named.
        let mut progress = PipelineProgress::new();
        progress.on_status(AgentStage::ProgramSearch);
        progress.on_status(AgentStage::TimelinePlanner);
        progress.finish();
        for stage in AgentStage::ALL {
            assert_eq!(progress.state(stage), NodeState::Done);
        }
        assert!(progress.is_finished());
        assert!(progress.active().is_none());
    }

    #[test]
    fn test_reset_returns_to_waiting() {
        let mut progress = PipelineProgress::new();
        progress.on_status(AgentStage::ProfileIntake);
        progress.finish();
        progress.reset();
        for stage in AgentStage::ALL {
            assert_eq!(progress.state(stage), NodeState::Waiting);
        }
        assert!(!progress.is_finished());
    }

    #[test]
    fn test_revisited_pipeline_loops_per_program() {
        // The server interleaves RequirementsParser/TimelinePlanner/
        // ChecklistValidator statuses once per shortlisted program.
        let mut progress = PipelineProgress::new();
        for _ in 0..3 {
            progress.on_status(AgentStage::RequirementsParser);
            progress.on_status(AgentStage::TimelinePlanner);
            progress.on_status(AgentStage::ChecklistValidator);
        }
        assert_eq!(
            progress.state(AgentStage::ChecklistValidator),
            NodeState::Active
        );
        assert_eq!(
            progress.state(AgentStage::RequirementsParser),
            NodeState::Done
        );
        progress.finish();
        assert!(progress.is_finished());
    }
}
