//! Catalogue of the remote API's endpoints.
//!
//! Several endpoints are disabled upstream. They stay in the catalogue so
//! callers get a typed `EndpointUnavailable` error instead of a network
//! round-trip that is certain to fail.

use std::fmt;

use crate::http::HttpMethod;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Health,
    SampleData,
    DropdownValues,
    PredictSingle,
    PredictBatch,
    GenerateAdopterLetter,
    GenerateDogProfile,
    ModelInfo,
    PredictionBands,
}

impl Endpoint {
    pub const ALL: [Endpoint; 9] = [
        Endpoint::Health,
        Endpoint::SampleData,
        Endpoint::DropdownValues,
        Endpoint::PredictSingle,
        Endpoint::PredictBatch,
        Endpoint::GenerateAdopterLetter,
        Endpoint::GenerateDogProfile,
        Endpoint::ModelInfo,
        Endpoint::PredictionBands,
    ];

    pub fn method(&self) -> HttpMethod {
        match self {
            Endpoint::PredictSingle
            | Endpoint::PredictBatch
            | Endpoint::GenerateAdopterLetter
            | Endpoint::GenerateDogProfile => HttpMethod::Post,
            _ => HttpMethod::Get,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Health => "/health",
            Endpoint::SampleData => "/form/sample-data",
            Endpoint::DropdownValues => "/form/dropdown-values",
            Endpoint::PredictSingle => "/predict/single",
            Endpoint::PredictBatch => "/predict/batch",
            Endpoint::GenerateAdopterLetter => "/form/generate-adopter-letter",
            Endpoint::GenerateDogProfile => "/form/generate-dog-profile",
            Endpoint::ModelInfo => "/model/info",
            Endpoint::PredictionBands => "/prediction/bands",
        }
    }

    /// Whether the service currently serves this endpoint.
    pub fn is_available(&self) -> bool {
        !matches!(
            self,
            Endpoint::DropdownValues
                | Endpoint::PredictBatch
                | Endpoint::GenerateAdopterLetter
                | Endpoint::GenerateDogProfile
        )
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method().as_str(), self.path())
    }
}
