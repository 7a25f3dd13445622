//! The three-step profile form.
//!
//! Field values are plain strings edited in place; [`FormState::collect`]
//! applies the same light coercion the planner's web form used: blank or
//! non-numeric numbers become 0, comma-separated fields are split with each
//! segment trimmed (empty segments are kept), and test scores are included
//! only when non-empty.

use std::collections::BTreeMap;

use sojourn_core::types::{ResumeProfile, StudentProfile};

use crate::view::FormStep;

/// Identifies one input field of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldId {
    Gpa,
    UndergradMajor,
    Backlogs,
    ResearchPapers,
    TargetDegree,
    TargetCountries,
    Budget,
    Interests,
    TargetIntake,
    GreScore,
    ToeflScore,
    WorkExperience,
    ResumeText,
}

impl FieldId {
    /// All fields in form order.
    pub const ALL: [FieldId; 13] = [
        FieldId::Gpa,
        FieldId::UndergradMajor,
        FieldId::Backlogs,
        FieldId::ResearchPapers,
        FieldId::TargetDegree,
        FieldId::TargetCountries,
        FieldId::Budget,
        FieldId::Interests,
        FieldId::TargetIntake,
        FieldId::GreScore,
        FieldId::ToeflScore,
        FieldId::WorkExperience,
        FieldId::ResumeText,
    ];

    /// Fields shown on a given step, in focus order.
    pub fn for_step(step: FormStep) -> &'static [FieldId] {
        match step {
            FormStep::Academics => &[
                FieldId::Gpa,
                FieldId::UndergradMajor,
                FieldId::Backlogs,
                FieldId::ResearchPapers,
            ],
            FormStep::Preferences => &[
                FieldId::TargetDegree,
                FieldId::TargetCountries,
                FieldId::Budget,
                FieldId::Interests,
                FieldId::TargetIntake,
            ],
            FormStep::TestsAndResume => &[
                FieldId::GreScore,
                FieldId::ToeflScore,
                FieldId::WorkExperience,
                FieldId::ResumeText,
            ],
        }
    }

    /// Label shown next to the input.
    pub fn label(&self) -> &'static str {
        match self {
            FieldId::Gpa => "GPA (0-10 scale)",
            FieldId::UndergradMajor => "Undergraduate major",
            FieldId::Backlogs => "Backlogs",
            FieldId::ResearchPapers => "Published papers",
            FieldId::TargetDegree => "Target degree",
            FieldId::TargetCountries => "Target countries (comma-separated)",
            FieldId::Budget => "Budget",
            FieldId::Interests => "Interests (comma-separated)",
            FieldId::TargetIntake => "Target intake",
            FieldId::GreScore => "GRE score",
            FieldId::ToeflScore => "TOEFL score",
            FieldId::WorkExperience => "Work experience (years)",
            FieldId::ResumeText => "Resume text (Ctrl+U to auto-fill)",
        }
    }

    /// Whether native-style validation requires this field to be filled.
    pub fn is_required(&self) -> bool {
        matches!(
            self,
            FieldId::Gpa
                | FieldId::TargetDegree
                | FieldId::TargetCountries
                | FieldId::Budget
                | FieldId::Interests
                | FieldId::TargetIntake
        )
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|f| f == self).unwrap_or(0)
    }
}

/// Outcome of attempting to advance the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Moved to the next step
    Advanced,
    /// The terminal step validated; the profile should be submitted
    Submit,
    /// Validation failed; per-field errors were recorded
    Invalid,
}

/// State of the three-step profile form.
#[derive(Debug, Clone)]
pub struct FormState {
    values: [String; FieldId::ALL.len()],
    step: FormStep,
    focused: FieldId,
    errors: Vec<(FieldId, String)>,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

impl FormState {
    /// Create an empty form at step one.
    pub fn new() -> Self {
        Self {
            values: Default::default(),
            step: FormStep::Academics,
            focused: FieldId::Gpa,
            errors: Vec::new(),
        }
    }

    /// Returns the current step.
    pub fn step(&self) -> FormStep {
        self.step
    }

    /// Returns the currently focused field.
    pub fn focused(&self) -> FieldId {
        self.focused
    }

    /// Returns the raw value of a field.
    pub fn value(&self, field: FieldId) -> &str {
        &self.values[field.index()]
    }

    /// Set the raw value of a field.
    pub fn set_value(&mut self, field: FieldId, value: impl Into<String>) {
        self.values[field.index()] = value.into();
    }

    /// Validation errors from the last failed advance.
    pub fn errors(&self) -> &[(FieldId, String)] {
        &self.errors
    }

    /// Returns the recorded error for one field, if any.
    pub fn error_for(&self, field: FieldId) -> Option<&str> {
        self.errors
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, msg)| msg.as_str())
    }

    /// Append a character to the focused field.
    pub fn push_char(&mut self, c: char) {
        self.values[self.focused.index()].push(c);
    }

    /// Remove the last character of the focused field.
    pub fn pop_char(&mut self) {
        self.values[self.focused.index()].pop();
    }

    /// Focus the next field of the current step, wrapping around.
    pub fn focus_next(&mut self) {
        let fields = FieldId::for_step(self.step);
        let pos = fields.iter().position(|f| *f == self.focused).unwrap_or(0);
        self.focused = fields[(pos + 1) % fields.len()];
    }

    /// Focus the previous field of the current step, wrapping around.
    pub fn focus_prev(&mut self) {
        let fields = FieldId::for_step(self.step);
        let pos = fields.iter().position(|f| *f == self.focused).unwrap_or(0);
        self.focused = fields[(pos + fields.len() - 1) % fields.len()];
    }

    /// Validate the current step and advance, or report why not.
    ///
    /// Failed validation records one message per invalid field and keeps
    /// the step unchanged. The terminal step returns [`AdvanceOutcome::Submit`]
    /// instead of advancing.
    pub fn advance_step(&mut self) -> AdvanceOutcome {
        self.errors = self.validate_step(self.step);
        if !self.errors.is_empty() {
            // Focus jumps to the first invalid field, like native validation
            self.focused = self.errors[0].0;
            return AdvanceOutcome::Invalid;
        }

        match self.step.next() {
            Some(next) => {
                self.step = next;
                self.focused = FieldId::for_step(next)[0];
                AdvanceOutcome::Advanced
            }
            None => AdvanceOutcome::Submit,
        }
    }

    /// Retreat one step unconditionally, keeping all values.
    pub fn retreat_step(&mut self) -> bool {
        match self.step.prev() {
            Some(prev) => {
                self.step = prev;
                self.focused = FieldId::for_step(prev)[0];
                self.errors.clear();
                true
            }
            None => false,
        }
    }

    /// Clear every field and return to step one.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn validate_step(&self, step: FormStep) -> Vec<(FieldId, String)> {
        let mut errors = Vec::new();
        for field in FieldId::for_step(step) {
            let value = self.value(*field).trim();
            if field.is_required() && value.is_empty() {
                errors.push((*field, "This field is required".to_string()));
                continue;
            }
            if *field == FieldId::Gpa && !value.is_empty() {
                match value.parse::<f64>() {
                    Ok(gpa) if (0.0..=10.0).contains(&gpa) => {}
                    _ => errors.push((*field, "Enter a number between 0 and 10".to_string())),
                }
            }
        }
        errors
    }

    /// Build the profile request from the current values.
    pub fn collect(&self) -> StudentProfile {
        let mut test_scores = BTreeMap::new();
        let gre = self.value(FieldId::GreScore).trim();
        if !gre.is_empty() {
            test_scores.insert("GRE".to_string(), gre.to_string());
        }
        let toefl = self.value(FieldId::ToeflScore).trim();
        if !toefl.is_empty() {
            test_scores.insert("TOEFL".to_string(), toefl.to_string());
        }

        StudentProfile {
            gpa: parse_number(self.value(FieldId::Gpa)),
            target_degree: self.value(FieldId::TargetDegree).trim().to_string(),
            target_countries: split_csv(self.value(FieldId::TargetCountries)),
            budget: self.value(FieldId::Budget).trim().to_string(),
            interests: split_csv(self.value(FieldId::Interests)),
            target_intake: self.value(FieldId::TargetIntake).trim().to_string(),
            test_scores,
            undergrad_major: non_empty(self.value(FieldId::UndergradMajor)),
            work_experience_years: parse_optional(self.value(FieldId::WorkExperience)),
            backlogs: parse_optional(self.value(FieldId::Backlogs)),
            research_papers: parse_optional(self.value(FieldId::ResearchPapers)),
        }
    }

    /// Merge a parsed resume into the form.
    ///
    /// Only fields present and non-empty in the response overwrite; user
    /// input survives for every field the parser omitted or zeroed.
    pub fn apply_resume(&mut self, resume: &ResumeProfile) {
        if let Some(gpa) = resume.gpa {
            if gpa > 0.0 {
                self.set_value(FieldId::Gpa, format_number(gpa));
            }
        }
        if let Some(major) = resume.undergrad_major.as_deref() {
            if !major.is_empty() {
                self.set_value(FieldId::UndergradMajor, major);
            }
        }
        if let Some(years) = resume.work_experience_years {
            if years > 0.0 {
                self.set_value(FieldId::WorkExperience, format_number(years));
            }
        }
        if let Some(backlogs) = resume.backlogs {
            if backlogs > 0 {
                self.set_value(FieldId::Backlogs, backlogs.to_string());
            }
        }
        if let Some(papers) = resume.research_papers {
            if papers > 0 {
                self.set_value(FieldId::ResearchPapers, papers.to_string());
            }
        }
        if let Some(scores) = &resume.test_scores {
            if let Some(gre) = scores.get("GRE").filter(|s| !s.is_empty()) {
                self.set_value(FieldId::GreScore, gre.clone());
            }
            if let Some(toefl) = scores.get("TOEFL").filter(|s| !s.is_empty()) {
                self.set_value(FieldId::ToeflScore, toefl.clone());
            }
        }
        if let Some(interests) = &resume.interests {
            if !interests.is_empty() {
                self.set_value(FieldId::Interests, interests.join(", "));
            }
        }
        if let Some(degree) = resume.target_degree.as_deref() {
            if !degree.is_empty() {
                self.set_value(FieldId::TargetDegree, degree);
            }
        }
    }
}

/// Numeric coercion: blank or unparseable input becomes 0.
fn parse_number(value: &str) -> f64 {
    value.trim().parse().unwrap_or(0.0)
}

/// Optional numeric input: blank stays None, unparseable becomes 0.
fn parse_optional<T: std::str::FromStr + Default>(value: &str) -> Option<T> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.parse().unwrap_or_default())
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Format a number without a trailing `.0` for whole values.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Split a comma-separated field, trimming each segment.
///
/// Empty segments are deliberately kept ("a,,b" yields three entries), the
/// behavior the server has always received from the web form.
fn split_csv(value: &str) -> Vec<String> {
    value.split(',').map(|s| s.trim().to_string()).collect()
}
