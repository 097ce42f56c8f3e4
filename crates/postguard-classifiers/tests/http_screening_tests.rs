//! Screening against fake model endpoints over real HTTP

use postguard_classifiers::{
    ClassifierDescriptor, ClientConfig, DecisionRule, HttpModelClient, ScreeningPipeline,
};
use postguard_core::{Credential, Error, ModerationRequest, Verdict};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn pipeline_for(server: &MockServer) -> ScreeningPipeline {
    let descriptors = vec![
        ClassifierDescriptor::new(
            "hate-speech",
            format!("{}/models/hate", server.uri()),
            DecisionRule::TopLabel {
                label: "hate".to_string(),
                threshold: 0.6,
            },
        ),
        ClassifierDescriptor::new(
            "toxicity",
            format!("{}/models/toxic", server.uri()),
            DecisionRule::LabelScore {
                label: "toxic".to_string(),
                threshold: 0.7,
            },
        ),
    ];
    let client = HttpModelClient::new(&ClientConfig::default()).unwrap();

    ScreeningPipeline::new(descriptors, Arc::new(client), Credential::new("hf_token"))
}

#[tokio::test]
async fn test_hate_speech_rejects_without_querying_toxicity() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/hate"))
        .and(header("authorization", "Bearer hf_token"))
        .and(body_json(json!({ "inputs": "x\ny\nI hate them" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([[
            { "label": "hate", "score": 0.9 },
            { "label": "nothate", "score": 0.1 }
        ]])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/models/toxic"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let screening = pipeline_for(&server)
        .screen(&ModerationRequest::new("x", "y", "I hate them"))
        .await
        .unwrap();

    assert_eq!(screening.verdict.rejected_by(), Some("hate-speech"));
    assert_eq!(screening.report.len(), 1);
}

#[tokio::test]
async fn test_clean_post_is_checked_by_every_model() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/hate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([[
            { "label": "nothate", "score": 0.99 },
            { "label": "hate", "score": 0.01 }
        ]])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/models/toxic"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([[
            { "label": "toxic", "score": 0.002 },
            { "label": "insult", "score": 0.001 }
        ]])))
        .expect(1)
        .mount(&server)
        .await;

    let screening = pipeline_for(&server)
        .screen(&ModerationRequest::new("Hello", "A short intro", "Nice to meet you all"))
        .await
        .unwrap();

    assert_eq!(screening.verdict, Verdict::Approved);
    assert_eq!(screening.report.len(), 2);
    assert_eq!(screening.report.outcomes()[1].model, "toxicity");
}

#[tokio::test]
async fn test_toxic_entry_flags_despite_malformed_sibling() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/hate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([[
            { "label": "nothate", "score": 0.8 },
            { "label": "hate", "score": 0.2 }
        ]])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/models/toxic"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "label": "toxic", "score": 0.95 },
            { "label": "insult" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let screening = pipeline_for(&server)
        .screen(&ModerationRequest::new("a", "b", "c"))
        .await
        .unwrap();

    assert_eq!(screening.verdict.rejected_by(), Some("toxicity"));
    assert!(screening.report.last().unwrap().error.is_none());
}

#[tokio::test]
async fn test_html_response_stops_the_run() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/hate"))
        .respond_with(ResponseTemplate::new(502).set_body_raw("<html>Bad Gateway</html>", "text/html"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/models/toxic"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let err = pipeline_for(&server)
        .screen(&ModerationRequest::new("a", "b", "c"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::ModerationUnavailable { ref model, .. } if model == "hate-speech"
    ));
}
