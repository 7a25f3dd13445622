//! Integration tests for the planner API client against a mock server.

use std::sync::Mutex;

use wiremock::{Mock, MockServer, ResponseTemplate, matchers};

use sojourn_client::{CancelToken, ClientConfig, EventSink, PlanClient, ResumeClient};
use sojourn_core::types::{StreamEvent, StudentProfile};

/// Sink that records every emitted event.
#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<StreamEvent>>,
}

impl EventSink for RecordingSink {
    fn emit(&self, event: StreamEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl RecordingSink {
    fn take(&self) -> Vec<StreamEvent> {
        std::mem::take(&mut self.events.lock().unwrap())
    }
}

fn sample_profile() -> StudentProfile {
    StudentProfile {
        gpa: 3.6,
        target_degree: "MS in Computer Science".to_string(),
        target_countries: vec!["Germany".to_string(), "USA".to_string()],
        budget: "Medium".to_string(),
        interests: vec!["AI".to_string()],
        target_intake: "Fall 2025".to_string(),
        ..Default::default()
    }
}

fn plan_client_for(server: &MockServer) -> PlanClient {
    let config = ClientConfig::default().with_base_url(server.uri());
    PlanClient::from_config(config).unwrap()
}

#[tokio::test]
async fn test_plan_stream_preserves_event_order() {
    let mock_server = MockServer::start().await;

    let body = concat!(
        "data: {\"type\":\"status\",\"agent\":\"ProfileIntake\",\"message\":\"Analyzing student profile...\"}\n\n",
        "data: {\"type\":\"status\",\"agent\":\"ProgramSearch\",\"message\":\"Found 3 top matches.\"}\n\n",
        "data: {\"type\":\"result\",\"data\":{\"shortlist\":[],\"qna_questions\":[]}}\n\n",
    );

    Mock::given(matchers::method("POST"))
        .and(matchers::path("/api/generate-plan-stream"))
        .and(matchers::body_partial_json(
            serde_json::json!({"target_degree": "MS in Computer Science"}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&mock_server)
        .await;

    let client = plan_client_for(&mock_server);
    let sink = RecordingSink::default();
    client
        .generate_plan(&sample_profile(), &sink, &CancelToken::new())
        .await
        .unwrap();

    let events = sink.take();
    assert_eq!(events.len(), 3);
    assert!(matches!(&events[0], StreamEvent::Status { agent, .. } if agent == "ProfileIntake"));
    assert!(matches!(&events[1], StreamEvent::Status { agent, .. } if agent == "ProgramSearch"));
    assert!(matches!(&events[2], StreamEvent::Result { .. }));
}

#[tokio::test]
async fn test_plan_stream_skips_malformed_record() {
    let mock_server = MockServer::start().await;

    let body = concat!(
        "data: {\"type\":\"status\",\"agent\":\"ProfileIntake\",\"message\":\"ok\"}\n\n",
        "data: {this is not json\n\n",
        "data: {\"type\":\"result\",\"data\":{\"shortlist\":[]}}\n\n",
    );

    Mock::given(matchers::method("POST"))
        .and(matchers::path("/api/generate-plan-stream"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&mock_server)
        .await;

    let client = plan_client_for(&mock_server);
    let sink = RecordingSink::default();
    client
        .generate_plan(&sample_profile(), &sink, &CancelToken::new())
        .await
        .unwrap();

    let events = sink.take();
    assert_eq!(events.len(), 2);
    assert!(matches!(&events[1], StreamEvent::Result { .. }));
}

#[tokio::test]
async fn test_plan_stream_surfaces_error_event() {
    let mock_server = MockServer::start().await;

    let body = "data: {\"type\":\"error\",\"message\":\"GEMINI_API_KEY not set\"}\n\n";

    Mock::given(matchers::method("POST"))
        .and(matchers::path("/api/generate-plan-stream"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&mock_server)
        .await;

    let client = plan_client_for(&mock_server);
    let sink = RecordingSink::default();
    client
        .generate_plan(&sample_profile(), &sink, &CancelToken::new())
        .await
        .unwrap();

    let events = sink.take();
    assert_eq!(events.len(), 1);
    assert!(
        matches!(&events[0], StreamEvent::Error { message } if message.contains("GEMINI_API_KEY"))
    );
}

#[tokio::test]
async fn test_plan_stream_final_record_without_separator() {
    let mock_server = MockServer::start().await;

    // Stream closes right after the result record with no trailing blank line.
    let body = "data: {\"type\":\"result\",\"data\":{\"shortlist\":[]}}";

    Mock::given(matchers::method("POST"))
        .and(matchers::path("/api/generate-plan-stream"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&mock_server)
        .await;

    let client = plan_client_for(&mock_server);
    let sink = RecordingSink::default();
    client
        .generate_plan(&sample_profile(), &sink, &CancelToken::new())
        .await
        .unwrap();

    let events = sink.take();
    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], StreamEvent::Result { .. }));
}

#[tokio::test]
async fn test_plan_stream_non_ok_status_fails() {
    let mock_server = MockServer::start().await;

    Mock::given(matchers::method("POST"))
        .and(matchers::path("/api/generate-plan-stream"))
        .respond_with(
            ResponseTemplate::new(500).set_body_string("{\"detail\":\"GEMINI_API_KEY not set\"}"),
        )
        .mount(&mock_server)
        .await;

    let client = plan_client_for(&mock_server);
    let sink = RecordingSink::default();
    let result = client
        .generate_plan(&sample_profile(), &sink, &CancelToken::new())
        .await;

    match result {
        Err(sojourn_client::ClientError::HttpStatus { status, body }) => {
            assert_eq!(status, 500);
            assert!(body.contains("GEMINI_API_KEY"));
        }
        other => panic!("expected HttpStatus error, got {other:?}"),
    }
    assert!(sink.take().is_empty());
}

#[tokio::test]
async fn test_parse_resume_success() {
    let mock_server = MockServer::start().await;

    let template = ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "success": true,
        "data": {
            "gpa": 3.7,
            "undergrad_major": "Computer Science",
            "work_experience_years": 2.0,
            "test_scores": {"GRE": "320"},
            "interests": ["Machine Learning"],
        }
    }));

    Mock::given(matchers::method("POST"))
        .and(matchers::path("/api/parse-resume"))
        .respond_with(template)
        .mount(&mock_server)
        .await;

    let config = ClientConfig::default().with_base_url(mock_server.uri());
    let client = ResumeClient::from_config(config).unwrap();

    let profile = client.parse_resume("B.Tech CSE, 2 years at Acme...").await.unwrap();
    assert_eq!(profile.gpa, Some(3.7));
    assert_eq!(profile.undergrad_major.as_deref(), Some("Computer Science"));
    assert_eq!(
        profile.test_scores.unwrap().get("GRE").map(String::as_str),
        Some("320")
    );
}

#[tokio::test]
async fn test_parse_resume_unsuccessful_response_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(matchers::method("POST"))
        .and(matchers::path("/api/parse-resume"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": false
        })))
        .mount(&mock_server)
        .await;

    let config = ClientConfig::default().with_base_url(mock_server.uri());
    let client = ResumeClient::from_config(config).unwrap();

    let result = client.parse_resume("some resume text").await;
    assert!(matches!(
        result,
        Err(sojourn_client::ClientError::ResumeRejected(_))
    ));
}

#[tokio::test]
async fn test_parse_resume_missing_data_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(matchers::method("POST"))
        .and(matchers::path("/api/parse-resume"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true
        })))
        .mount(&mock_server)
        .await;

    let config = ClientConfig::default().with_base_url(mock_server.uri());
    let client = ResumeClient::from_config(config).unwrap();

    let result = client.parse_resume("some resume text").await;
    assert!(matches!(
        result,
        Err(sojourn_client::ClientError::ResumeRejected(_))
    ));
}
