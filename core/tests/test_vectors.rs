//! Verify the executor and client against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, simulated responses, and the expected
//! request, result or error. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

mod common;

use std::time::Duration;

use common::*;
use fursight_core::{
    AdopterProfile, DogProfile, FurSightError, HttpMethod, HttpResponse, PredictionResponse,
    ValidationError,
};
use serde_json::Value;

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        other => panic!("unknown method: {other}"),
    }
}

fn simulated_response(sim: &Value) -> HttpResponse {
    let headers = sim
        .get("headers")
        .and_then(Value::as_array)
        .map(|headers| {
            headers
                .iter()
                .map(|h| {
                    let pair = h.as_array().unwrap();
                    (
                        pair[0].as_str().unwrap().to_string(),
                        pair[1].as_str().unwrap().to_string(),
                    )
                })
                .collect()
        })
        .unwrap_or_default();
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers,
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn assert_error(name: &str, err: &FurSightError, expected: &Value) {
    let message = expected.get("message").and_then(Value::as_str);
    match expected["kind"].as_str().unwrap() {
        "Validation" => match err {
            FurSightError::Validation(ValidationError::Rejected(m)) => {
                assert_eq!(Some(m.as_str()), message, "{name}: message")
            }
            other => panic!("{name}: expected Validation, got {other:?}"),
        },
        "Authentication" => match err {
            FurSightError::Authentication(m) => assert_eq!(Some(m.as_str()), message, "{name}: message"),
            other => panic!("{name}: expected Authentication, got {other:?}"),
        },
        "InsufficientCredits" => match err {
            FurSightError::InsufficientCredits(m) => {
                assert_eq!(Some(m.as_str()), message, "{name}: message")
            }
            other => panic!("{name}: expected InsufficientCredits, got {other:?}"),
        },
        "Api" => match err {
            FurSightError::Api { status, message: m } => {
                assert_eq!(u64::from(*status), expected["status"].as_u64().unwrap(), "{name}: status");
                assert_eq!(Some(m.as_str()), message, "{name}: message");
            }
            other => panic!("{name}: expected Api, got {other:?}"),
        },
        "RateLimited" => match err {
            FurSightError::RateLimited { retry_after } => assert_eq!(
                retry_after.as_secs(),
                expected["retry_after_secs"].as_u64().unwrap(),
                "{name}: retry_after"
            ),
            other => panic!("{name}: expected RateLimited, got {other:?}"),
        },
        other => panic!("{name}: unknown expected_error kind: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Response sequences
// ---------------------------------------------------------------------------

#[test]
fn response_test_vectors() {
    let raw = include_str!("../../test-vectors/responses.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let replies: Vec<Reply> = case["responses"]
            .as_array()
            .unwrap()
            .iter()
            .map(|sim| Ok(simulated_response(sim)))
            .collect();
        let config = test_config().with_max_retries(3);
        let (executor, transport, clock) = scripted_executor(&config, replies);

        let result = executor.execute(HttpMethod::Get, "/health", None, &[]);

        assert_eq!(
            transport.attempts() as u64,
            case["expected_attempts"].as_u64().unwrap(),
            "{name}: attempts"
        );
        let expected_sleeps: Vec<Duration> = case["expected_sleeps_ms"]
            .as_array()
            .unwrap()
            .iter()
            .map(|ms| Duration::from_millis(ms.as_u64().unwrap()))
            .collect();
        assert_eq!(clock.sleeps(), expected_sleeps, "{name}: sleeps");

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            assert_error(name, &err, expected_error);
        } else {
            let value = result.unwrap_or_else(|e| panic!("{name}: unexpected error {e}"));
            assert_eq!(value, case["expected_result"], "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Predict
// ---------------------------------------------------------------------------

#[test]
fn predict_test_vectors() {
    let raw = include_str!("../../test-vectors/predict.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let adopter: AdopterProfile = serde_json::from_value(case["adopter"].clone()).unwrap();
        let dog: DogProfile = serde_json::from_value(case["dog"].clone()).unwrap();
        let include_explanation = case["include_explanation"].as_bool().unwrap();
        let sim = simulated_response(&case["simulated_response"]);

        let (client, transport, _clock) = scripted_client([Ok(sim)]);
        let prediction = client
            .predict_single(&adopter, &dog, include_explanation)
            .unwrap_or_else(|e| panic!("{name}: unexpected error {e}"));

        // Verify the request.
        let sent = transport.sent();
        assert_eq!(sent.len(), 1, "{name}: one request");
        let req = &sent[0];
        let expected_req = &case["expected_request"];
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(
            req.path,
            format!("http://fursight.test{}", expected_req["path"].as_str().unwrap()),
            "{name}: path"
        );
        for header in expected_req["headers"].as_array().unwrap() {
            let pair = header.as_array().unwrap();
            assert_eq!(
                req.header(pair[0].as_str().unwrap()),
                pair[1].as_str(),
                "{name}: header {}",
                pair[0]
            );
        }
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, expected_req["body"], "{name}: body");

        // Verify the parse.
        let expected: PredictionResponse =
            serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(prediction, expected, "{name}: parsed result");
    }
}
