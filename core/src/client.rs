//! Typed client for the FurSight pet adoption API.
//!
//! # Design
//! `FurSightClient` maps each endpoint to a `RequestExecutor::execute` call
//! and deserializes the result. Disabled endpoints are rejected here, before
//! the executor sees them, so they never cost a network attempt or a pacing
//! slot.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::endpoint::Endpoint;
use crate::error::FurSightError;
use crate::executor::RequestExecutor;
use crate::profile::{AdopterProfile, AllowedValuesTable, DogProfile, FieldMap, PredictionRecord};
use crate::types::{HealthStatus, PredictionResponse};

#[derive(Debug)]
pub struct FurSightClient {
    executor: RequestExecutor,
}

impl FurSightClient {
    /// Client for the default service URL with default retry settings.
    pub fn new(api_key: &str) -> Self {
        Self::from_config(&ClientConfig::new(api_key))
    }

    /// Client over `ureq` with the given settings.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            executor: RequestExecutor::new(config),
        }
    }

    /// Client over a preconfigured executor, e.g. one with a custom transport.
    pub fn with_executor(executor: RequestExecutor) -> Self {
        Self { executor }
    }

    /// The executor, for inspecting pacing state and settings.
    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    /// Service health. Needs no credits.
    pub fn health(&self) -> Result<HealthStatus, FurSightError> {
        let value = self.call(Endpoint::Health, None, &[])?;
        decode(value)
    }

    /// Sample values for every known field, as a flat map. Nulls and non-scalar values are dropped.
    pub fn sample_data(&self) -> Result<FieldMap, FurSightError> {
        let mut value = self.call(Endpoint::SampleData, None, &[])?;
        let sample = value
            .get_mut("sample_data")
            .map(Value::take)
            .ok_or_else(|| FurSightError::Deserialization("missing field `sample_data`".into()))?;
        let object = sample.as_object().ok_or_else(|| {
            FurSightError::Deserialization("`sample_data` is not an object".into())
        })?;
        Ok(PredictionRecord::from_json_object(object).into_fields())
    }

    /// Allowed values per field. Disabled upstream: always `EndpointUnavailable`.
    pub fn dropdown_values(&self) -> Result<AllowedValuesTable, FurSightError> {
        let value = self.call(Endpoint::DropdownValues, None, &[])?;
        decode(value)
    }

    /// Merge both profiles (dog wins on a collision) and request a prediction.
    pub fn predict_single(
        &self,
        adopter: &AdopterProfile,
        dog: &DogProfile,
        include_explanation: bool,
    ) -> Result<PredictionResponse, FurSightError> {
        self.predict(&PredictionRecord::merge(adopter, dog), include_explanation)
    }

    /// Submit an already merged record.
    pub fn predict(
        &self,
        record: &PredictionRecord,
        include_explanation: bool,
    ) -> Result<PredictionResponse, FurSightError> {
        let payload = encode(record)?;
        let value = self.call(
            Endpoint::PredictSingle,
            Some(&payload),
            &[("include_explanation", include_explanation.to_string())],
        )?;
        decode(value)
    }

    /// Disabled upstream: always `EndpointUnavailable`.
    pub fn predict_batch(
        &self,
        records: &[PredictionRecord],
    ) -> Result<Vec<PredictionResponse>, FurSightError> {
        let payload = encode(records)?;
        let value = self.call(Endpoint::PredictBatch, Some(&payload), &[])?;
        decode(value)
    }

    /// Disabled upstream: always `EndpointUnavailable`.
    pub fn generate_adopter_letter(&self, record: &PredictionRecord) -> Result<String, FurSightError> {
        let payload = encode(record)?;
        let value = self.call(Endpoint::GenerateAdopterLetter, Some(&payload), &[])?;
        decode(value)
    }

    /// Disabled upstream: always `EndpointUnavailable`.
    pub fn generate_dog_profile(&self, record: &PredictionRecord) -> Result<String, FurSightError> {
        let payload = encode(record)?;
        let value = self.call(Endpoint::GenerateDogProfile, Some(&payload), &[])?;
        decode(value)
    }

    /// Model metadata, passed through as JSON.
    pub fn model_info(&self) -> Result<Value, FurSightError> {
        self.call(Endpoint::ModelInfo, None, &[])
    }

    /// Reference guide for the green/yellow/red band system.
    pub fn prediction_bands(&self) -> Result<Value, FurSightError> {
        self.call(Endpoint::PredictionBands, None, &[])
    }

    fn call(
        &self,
        endpoint: Endpoint,
        payload: Option<&Value>,
        query: &[(&str, String)],
    ) -> Result<Value, FurSightError> {
        if !endpoint.is_available() {
            tracing::warn!(%endpoint, "endpoint is disabled upstream, not sending");
            return Err(FurSightError::EndpointUnavailable(endpoint));
        }
        self.executor
            .execute(endpoint.method(), endpoint.path(), payload, query)
    }
}

fn encode<T: serde::Serialize + ?Sized>(payload: &T) -> Result<Value, FurSightError> {
    serde_json::to_value(payload).map_err(|e| FurSightError::Serialization(e.to_string()))
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, FurSightError> {
    serde_json::from_value(value).map_err(|e| FurSightError::Deserialization(e.to_string()))
}
