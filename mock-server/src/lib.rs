use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex, PoisonError,
    },
};

use axum::{
    body::Body,
    extract::{Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

pub const DEFAULT_API_KEY: &str = "test-key";
pub const MODEL_VERSION: &str = "2.1.0";

/// A canned response served ahead of normal routing.
#[derive(Clone, Debug)]
pub struct ScriptedResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl ScriptedResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn rate_limited(retry_after_secs: u64) -> Self {
        Self::new(429, r#"{"detail":"Rate limit exceeded"}"#)
            .with_header("retry-after", &retry_after_secs.to_string())
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// Shared server state. Clones share the same script queue and counters.
#[derive(Clone, Debug)]
pub struct MockState {
    api_key: Arc<String>,
    scripted: Arc<Mutex<VecDeque<ScriptedResponse>>>,
    requests: Arc<AtomicUsize>,
}

impl MockState {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: Arc::new(api_key.to_string()),
            scripted: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Queue a response for the next request, whatever its route.
    pub fn script(&self, response: ScriptedResponse) {
        self.scripted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(response);
    }

    /// Requests received so far, scripted ones included.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn next_scripted(&self) -> Option<ScriptedResponse> {
        self.scripted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<(), ApiFailure> {
        let expected = format!("Bearer {}", self.api_key);
        match headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
            Some(value) if value == expected => Ok(()),
            _ => Err(ApiFailure::new(StatusCode::UNAUTHORIZED, "Invalid API key")),
        }
    }
}

impl Default for MockState {
    fn default() -> Self {
        Self::new(DEFAULT_API_KEY)
    }
}

/// Error body in the service's `{"detail": ...}` shape.
#[derive(Debug)]
pub struct ApiFailure {
    status: StatusCode,
    detail: String,
}

impl ApiFailure {
    fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub timestamp: String,
    pub model_loaded: bool,
    pub version: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Prediction {
    pub recommendation: String,
    pub adoption_probability: f64,
    pub confidence_score: f64,
    pub model_version: String,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simplified_band_info: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volunteer_guidance: Option<Value>,
    pub transaction_info: Value,
}

#[derive(Debug, Deserialize)]
pub struct PredictParams {
    #[serde(default = "default_include_explanation")]
    pub include_explanation: bool,
}

fn default_include_explanation() -> bool {
    true
}

pub fn app(state: MockState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/form/sample-data", get(sample_data))
        .route("/predict/single", post(predict_single))
        .route("/model/info", get(model_info))
        .route("/prediction/bands", get(prediction_bands))
        .layer(middleware::from_fn_with_state(state.clone(), scripted_layer))
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}

/// Counts every request and serves queued scripted responses first.
async fn scripted_layer(State(state): State<MockState>, request: Request, next: Next) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);
    let Some(scripted) = state.next_scripted() else {
        return next.run(request).await;
    };
    tracing::debug!(
        path = %request.uri().path(),
        status = scripted.status,
        "serving scripted response"
    );
    let mut builder = Response::builder().status(scripted.status);
    for (name, value) in &scripted.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
        .body(Body::from(scripted.body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        model_loaded: true,
        version: "1.0.0".to_string(),
    })
}

async fn sample_data(
    State(state): State<MockState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiFailure> {
    state.authorize(&headers)?;
    Ok(Json(json!({ "sample_data": sample_record() })))
}

async fn predict_single(
    State(state): State<MockState>,
    headers: HeaderMap,
    Query(params): Query<PredictParams>,
    Json(record): Json<Map<String, Value>>,
) -> Result<Json<Prediction>, ApiFailure> {
    state.authorize(&headers)?;
    if record.is_empty() {
        return Err(ApiFailure::new(
            StatusCode::BAD_REQUEST,
            "Request body must contain adopter and dog fields",
        ));
    }
    if let Some(unknown) = record
        .keys()
        .find(|name| !name.starts_with("adopter_") && !name.starts_with("dog_"))
    {
        return Err(ApiFailure::new(
            StatusCode::BAD_REQUEST,
            format!("Unknown field: {unknown}"),
        ));
    }

    let probability = score(&record);
    let band = band_for(probability);
    let recommendation = if probability >= 0.5 { "Good Match" } else { "Poor Match" };

    Ok(Json(Prediction {
        recommendation: recommendation.to_string(),
        adoption_probability: probability,
        confidence_score: 0.64,
        model_version: MODEL_VERSION.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        simplified_band_info: params
            .include_explanation
            .then(|| json!({ "band": band, "fields_received": record.len() })),
        volunteer_guidance: params
            .include_explanation
            .then(|| json!({ "summary": format!("{band} band: review with the adopter") })),
        transaction_info: json!({ "transaction_id": Uuid::new_v4(), "credits_used": 1 }),
    }))
}

async fn model_info(
    State(state): State<MockState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiFailure> {
    state.authorize(&headers)?;
    Ok(Json(json!({
        "model_name": "fursight-adoption",
        "model_version": MODEL_VERSION,
        "features_count": 122,
    })))
}

async fn prediction_bands(
    State(state): State<MockState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiFailure> {
    state.authorize(&headers)?;
    Ok(Json(json!({
        "bands": [
            { "band": "green", "min_probability": 0.7 },
            { "band": "yellow", "min_probability": 0.4 },
            { "band": "red", "min_probability": 0.0 },
        ]
    })))
}

/// Fixed scoring so tests can predict the outcome: a household with kids
/// and a dog that is not good with kids is a poor match.
fn score(record: &Map<String, Value>) -> f64 {
    let has_kids = record.get("adopter_has_kids").and_then(Value::as_str) == Some("Yes");
    let dog_ok_with_kids = record.get("dog_kids").and_then(Value::as_str) != Some("No");
    if has_kids && !dog_ok_with_kids {
        0.21
    } else {
        0.82
    }
}

fn band_for(probability: f64) -> &'static str {
    if probability >= 0.7 {
        "green"
    } else if probability >= 0.4 {
        "yellow"
    } else {
        "red"
    }
}

/// Sample record, including one key outside both field namespaces.
pub fn sample_record() -> Value {
    json!({
        "adopter_housing_type": "Suburban Home",
        "adopter_home_ownership_status": "Own",
        "adopter_yard_type": "Fenced",
        "adopter_fence_height_ft": 6.0,
        "adopter_has_kids": "Yes",
        "adopter_num_kids": 2,
        "adopter_hours_dog_left_alone": 4,
        "adopter_monthly_dog_budget_usd": 150.5,
        "adopter_preferred_size": "Medium",
        "adopter_previous_dog_experience": "Moderate",
        "adopter_other_pets_info": null,
        "dog_breed": "Labrador Retriever",
        "dog_age": "Adult",
        "dog_sex": "Female",
        "dog_size": "Medium",
        "dog_kids": "Yes",
        "dog_energyLevel": "Moderate",
        "dog_housetrained": "Yes",
        "dog_sizeCurrent": 55,
        "shelter_id": "SH-0042",
    })
}
