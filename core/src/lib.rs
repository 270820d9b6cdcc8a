//! Client SDK for the FurSight pet adoption prediction API.
//!
//! # Overview
//! Builds adopter and dog profiles, validates them against the service's
//! allowed values, and requests adoption predictions over HTTP.
//!
//! # Design
//! - `RequestExecutor` owns the request lifecycle: pacing between calls,
//!   retry on 429 and transport failures, and status classification into a
//!   closed `FurSightError` enum.
//! - The network sits behind the `Transport` trait and time behind the
//!   `Clock` trait, so retry and pacing behavior is testable without waiting.
//! - `FurSightClient` maps endpoints to executor calls and rejects endpoints
//!   disabled upstream before any I/O.
//! - `AdoptionForm` accumulates the two field partitions and submits them.
//!
//! ```no_run
//! use fursight_core::{AdoptionForm, FurSightClient, Template};
//!
//! # fn main() -> Result<(), fursight_core::FurSightError> {
//! let client = FurSightClient::new("your-api-key");
//! let mut form = AdoptionForm::from_template(&client, Template::FamilyWithKids)?;
//! form.set_dog_field("dog_breed", "Labrador Retriever");
//! let prediction = form.submit(true)?;
//! println!("{} ({:.2})", prediction.recommendation, prediction.adoption_probability);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod clock;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod executor;
pub mod fields;
pub mod form;
pub mod http;
pub mod profile;
pub mod templates;
pub mod types;

pub use crate::client::FurSightClient;
pub use crate::clock::{Clock, ManualClock, SystemClock};
pub use crate::config::ClientConfig;
pub use crate::endpoint::Endpoint;
pub use crate::error::{FurSightError, TransportError, ValidationError};
pub use crate::executor::{RequestExecutor, RetryPolicy};
pub use crate::form::{AdoptionForm, FieldInfo};
pub use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use crate::profile::{
    AdopterProfile, AllowedValuesTable, DogProfile, FieldMap, Partition, PredictionRecord,
};
pub use crate::templates::Template;
pub use crate::types::{FieldValue, HealthStatus, PredictionResponse};
