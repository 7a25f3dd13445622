//! Wire and domain types for the Sojourn planner API.
//!
//! These mirror the JSON shapes of the two server endpoints: the profile
//! submitted to `/api/generate-plan-stream` and the event union streamed
//! back. Everything here is transient per submission - the profile is
//! immutable once sent and stream events are consumed immediately.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Student profile submitted as the plan request body.
///
/// Built fresh per submission from the form. The optional fields are the
/// resume-derived extras; they are omitted from the wire when unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub gpa: f64,
    pub target_degree: String,
    pub target_countries: Vec<String>,
    pub budget: String,
    pub interests: Vec<String>,
    pub target_intake: String,
    #[serde(default)]
    pub test_scores: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub undergrad_major: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_experience_years: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backlogs: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub research_papers: Option<u32>,
}

impl Default for StudentProfile {
    fn default() -> Self {
        Self {
            gpa: 0.0,
            target_degree: String::new(),
            target_countries: Vec::new(),
            budget: String::new(),
            interests: Vec::new(),
            target_intake: String::new(),
            test_scores: BTreeMap::new(),
            undergrad_major: None,
            work_experience_years: None,
            backlogs: None,
            research_papers: None,
        }
    }
}

/// A degree program returned in the shortlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub name: String,
    pub university: String,
    pub country: String,
    pub tuition_range: String,
    pub application_deadline: String,
    #[serde(default)]
    pub eligibility_criteria: String,
    #[serde(default)]
    pub match_reasoning: Option<String>,
}

/// One application task in a program's timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineTask {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub due_date: String,
    #[serde(default)]
    pub dependency: Option<String>,
    #[serde(default = "default_task_status")]
    pub status: String,
}

fn default_task_status() -> String {
    "Pending".to_string()
}

/// Documents and test requirements extracted for a program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramRequirements {
    pub program_name: String,
    #[serde(default)]
    pub required_documents: Vec<String>,
    #[serde(default)]
    pub test_requirements: Vec<String>,
    #[serde(default)]
    pub special_notes: Option<String>,
}

/// One shortlisted program with its generated timeline and warnings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramMatch {
    pub program: Program,
    #[serde(default)]
    pub requirements: Option<ProgramRequirements>,
    #[serde(default)]
    pub timeline: Vec<TimelineTask>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// A follow-up question/answer pair generated alongside the shortlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QnaPair {
    pub question: String,
    pub answer: String,
    #[serde(default = "default_qna_category")]
    pub category: String,
}

fn default_qna_category() -> String {
    "general".to_string()
}

/// Final payload carried by a `result` stream event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanResult {
    #[serde(default)]
    pub shortlist: Vec<ProgramMatch>,
    #[serde(default)]
    pub qna_questions: Vec<QnaPair>,
}

/// Discriminated union of records on the plan stream.
///
/// The server frames each of these as one SSE `data:` record. `status`
/// events report pipeline progress, a single `result` event carries the
/// final payload, and `error` aborts the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamEvent {
    Status { agent: String, message: String },
    Result { data: PlanResult },
    Error { message: String },
}

/// Partial profile extracted from free-text resume parsing.
///
/// Every field is optional: auto-fill only overwrites form fields that are
/// present and non-empty here, leaving the user's input intact otherwise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeProfile {
    #[serde(default)]
    pub gpa: Option<f64>,
    #[serde(default)]
    pub undergrad_major: Option<String>,
    #[serde(default)]
    pub work_experience_years: Option<f64>,
    #[serde(default)]
    pub backlogs: Option<u32>,
    #[serde(default)]
    pub research_papers: Option<u32>,
    #[serde(default)]
    pub test_scores: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub interests: Option<Vec<String>>,
    #[serde(default)]
    pub target_degree: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_event_deserializes() {
        let json = r#"{"type":"status","agent":"ProgramSearch","message":"Searching..."}"#;
        let event: StreamEvent = serde_json::from_str(json).unwrap();
        assert_eq!(
            event,
            StreamEvent::Status {
                agent: "ProgramSearch".to_string(),
                message: "Searching...".to_string(),
            }
        );
    }

    #[test]
    fn test_result_event_tolerates_extra_fields() {
        // The server includes the echoed profile in the result payload;
        // the client only reads shortlist and qna_questions.
        let json = r#"{
            "type": "result",
            "data": {
                "profile": {"gpa": 3.6},
                "shortlist": [{
                    "program": {
                        "name": "MS CS",
                        "university": "TU Munich",
                        "country": "Germany",
                        "tuition_range": "Free - EUR 300/semester",
                        "application_deadline": "2025-01-15"
                    },
                    "timeline": [
                        {"title": "Submit transcripts", "due_date": "2024-01-10"}
                    ],
                    "warnings": ["Deadline is close"]
                }],
                "qna_questions": [
                    {"question": "Do I need GRE?", "answer": "Usually not.", "category": "tests"}
                ]
            }
        }"#;
        let event: StreamEvent = serde_json::from_str(json).unwrap();
        let StreamEvent::Result { data } = event else {
            panic!("expected result event");
        };
        assert_eq!(data.shortlist.len(), 1);
        assert_eq!(data.shortlist[0].program.university, "TU Munich");
        assert_eq!(data.shortlist[0].timeline[0].status, "Pending");
        assert_eq!(data.qna_questions.len(), 1);
        assert_eq!(data.qna_questions[0].category, "tests");
    }

    #[test]
    fn test_error_event_deserializes() {
        let json = r#"{"type":"error","message":"GEMINI_API_KEY not set"}"#;
        let event: StreamEvent = serde_json::from_str(json).unwrap();
        assert_eq!(
            event,
            StreamEvent::Error {
                message: "GEMINI_API_KEY not set".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_event_type_is_an_error() {
        let json = r#"{"type":"heartbeat"}"#;
        assert!(serde_json::from_str::<StreamEvent>(json).is_err());
    }

    #[test]
    fn test_profile_omits_unset_resume_fields() {
        let profile = StudentProfile {
            gpa: 3.8,
            target_degree: "MS in Computer Science".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("undergrad_major").is_none());
        assert!(json.get("backlogs").is_none());
        assert_eq!(json["gpa"], 3.8);
    }

    #[test]
    fn test_profile_serializes_resume_fields_when_set() {
        let profile = StudentProfile {
            undergrad_major: Some("Mechanical Engineering".to_string()),
            work_experience_years: Some(2.5),
            ..Default::default()
        };
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["undergrad_major"], "Mechanical Engineering");
        assert_eq!(json["work_experience_years"], 2.5);
    }

    #[test]
    fn test_resume_profile_partial_deserialize() {
        let json = r#"{"undergrad_major": "Physics", "research_papers": 2}"#;
        let parsed: ResumeProfile = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.undergrad_major.as_deref(), Some("Physics"));
        assert_eq!(parsed.research_papers, Some(2));
        assert!(parsed.gpa.is_none());
        assert!(parsed.interests.is_none());
    }

    #[test]
    fn test_qna_category_defaults_to_general() {
        let json = r#"{"question": "When to apply?", "answer": "Early."}"#;
        let pair: QnaPair = serde_json::from_str(json).unwrap();
        assert_eq!(pair.category, "general");
    }
}
