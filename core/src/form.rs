//! Form builder that collects adopter and dog fields and submits them.
//!
//! # Design
//! `AdoptionForm` accumulates two partitions through setter calls, validates
//! them against an allowed-values table, and hands the merged record to
//! `FurSightClient::predict`. The table is advisory: it is either supplied
//! by the caller or fetched once from the service and cached for the life of
//! the form. While the dropdown endpoint is disabled upstream, the fetch
//! resolves to an empty table and every value passes.

use std::collections::BTreeSet;

use crate::client::FurSightClient;
use crate::error::{FurSightError, ValidationError};
use crate::fields::{self, FieldKind};
use crate::profile::{AdopterProfile, AllowedValuesTable, DogProfile, FieldMap, Partition, PredictionRecord};
use crate::templates::Template;
use crate::types::{FieldValue, PredictionResponse};

/// Everything the form knows about one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    pub name: String,
    pub partition: Option<Partition>,
    pub kind: Option<FieldKind>,
    pub is_dropdown: bool,
    pub allowed_values: Vec<String>,
    pub current_value: Option<FieldValue>,
}

#[derive(Debug)]
pub struct AdoptionForm<'a> {
    client: &'a FurSightClient,
    adopter: AdopterProfile,
    dog: DogProfile,
    allowed_values: Option<AllowedValuesTable>,
    sample_data: Option<FieldMap>,
}

impl<'a> AdoptionForm<'a> {
    /// Empty form bound to `client`.
    pub fn new(client: &'a FurSightClient) -> Self {
        Self {
            client,
            adopter: AdopterProfile::new(),
            dog: DogProfile::new(),
            allowed_values: None,
            sample_data: None,
        }
    }

    /// Form pre-filled from a template. `Template::SampleData` fetches the
    /// service's sample record.
    pub fn from_template(
        client: &'a FurSightClient,
        template: Template,
    ) -> Result<Self, FurSightError> {
        let mut form = Self::new(client);
        match template {
            Template::SampleData => {
                form.load_sample_data()?;
            }
            preset => {
                let (adopter, dog) = preset.profiles();
                form.adopter = adopter;
                form.dog = dog;
            }
        }
        Ok(form)
    }

    /// Use a caller-supplied allowed-values table instead of fetching one.
    pub fn with_allowed_values(mut self, table: AllowedValuesTable) -> Self {
        self.allowed_values = Some(table);
        self
    }

    /// The allowed-values table, fetched on first use and cached.
    pub fn allowed_values(&mut self) -> Result<&AllowedValuesTable, FurSightError> {
        if self.allowed_values.is_none() {
            let table = match self.client.dropdown_values() {
                Ok(table) => table,
                Err(FurSightError::EndpointUnavailable(endpoint)) => {
                    tracing::debug!(%endpoint, "allowed values unavailable, fields are unconstrained");
                    AllowedValuesTable::new()
                }
                Err(err) => return Err(err),
            };
            self.allowed_values = Some(table);
        }
        Ok(self.allowed_values.get_or_insert_with(AllowedValuesTable::new))
    }

    /// The service's sample record, fetched on first use and cached.
    pub fn sample_data(&mut self) -> Result<&FieldMap, FurSightError> {
        if self.sample_data.is_none() {
            self.sample_data = Some(self.client.sample_data()?);
        }
        Ok(self.sample_data.get_or_insert_with(FieldMap::new))
    }

    /// Store or overwrite one value. Not validated until `validate`.
    pub fn set_field(
        &mut self,
        partition: Partition,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> &mut Self {
        match partition {
            Partition::Adopter => self.adopter.set(name, value),
            Partition::Dog => self.dog.set(name, value),
        }
        self
    }

    /// Set one adopter field.
    pub fn set_adopter_field(
        &mut self,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> &mut Self {
        self.set_field(Partition::Adopter, name, value)
    }

    /// Set one dog field.
    pub fn set_dog_field(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> &mut Self {
        self.set_field(Partition::Dog, name, value)
    }

    /// Set several adopter fields at once, overwriting existing values.
    pub fn set_adopter_data<K, V, I>(&mut self, data: I) -> &mut Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.adopter.extend(data);
        self
    }

    /// Set several dog fields at once, overwriting existing values.
    pub fn set_dog_data<K, V, I>(&mut self, data: I) -> &mut Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.dog.extend(data);
        self
    }

    /// Remove a field, returning its previous value.
    pub fn remove_field(&mut self, partition: Partition, name: &str) -> Option<FieldValue> {
        match partition {
            Partition::Adopter => self.adopter.remove(name),
            Partition::Dog => self.dog.remove(name),
        }
    }

    /// Split a flat record into the partitions by name prefix. Entries that
    /// match neither `adopter_` nor `dog_` are dropped.
    pub fn load_defaults(&mut self, record: &FieldMap) -> &mut Self {
        let (adopter, dog) = PredictionRecord::from(record.clone()).split();
        self.adopter.extend(adopter.fields().clone());
        self.dog.extend(dog.fields().clone());
        self
    }

    /// Fetch the service's sample record and load it into the form.
    pub fn load_sample_data(&mut self) -> Result<&mut Self, FurSightError> {
        let sample = self.sample_data()?.clone();
        Ok(self.load_defaults(&sample))
    }

    /// Check one value against the allowed-values table.
    pub fn validate_field(&mut self, name: &str, value: &FieldValue) -> Result<(), FurSightError> {
        check_field(self.allowed_values()?, name, value)?;
        Ok(())
    }

    /// Validate every field, stopping at the first violation.
    ///
    /// Fails with `ValidationError::NoData` when both partitions are empty.
    pub fn validate(&mut self) -> Result<(), FurSightError> {
        if self.adopter.is_empty() && self.dog.is_empty() {
            return Err(ValidationError::NoData.into());
        }
        self.allowed_values()?;
        if let Some(table) = &self.allowed_values {
            for (name, value) in self.adopter.fields().iter().chain(self.dog.fields()) {
                check_field(table, name, value)?;
            }
        }
        Ok(())
    }

    /// Current adopter partition.
    pub fn adopter_profile(&self) -> &AdopterProfile {
        &self.adopter
    }

    /// Current dog partition.
    pub fn dog_profile(&self) -> &DogProfile {
        &self.dog
    }

    /// Both partitions merged; dog values win on a key collision.
    pub fn to_record(&self) -> PredictionRecord {
        PredictionRecord::merge(&self.adopter, &self.dog)
    }

    /// Replace the form contents with a flat record.
    pub fn load_record(&mut self, record: &PredictionRecord) -> &mut Self {
        let (adopter, dog) = record.split();
        self.adopter = adopter;
        self.dog = dog;
        self
    }

    /// Empty both partitions. Cached lookups are kept.
    pub fn clear(&mut self) -> &mut Self {
        self.adopter.clear();
        self.dog.clear();
        self
    }

    /// Validate, merge and request a prediction.
    pub fn submit(&mut self, include_explanation: bool) -> Result<PredictionResponse, FurSightError> {
        self.validate()?;
        let record = self.to_record();
        tracing::debug!(fields = record.len(), "submitting adoption form");
        self.client.predict(&record, include_explanation)
    }

    /// Disabled upstream: always `EndpointUnavailable`.
    pub fn generate_adopter_letter(&self) -> Result<String, FurSightError> {
        self.client.generate_adopter_letter(&self.to_record())
    }

    /// Disabled upstream: always `EndpointUnavailable`.
    pub fn generate_dog_profile(&self) -> Result<String, FurSightError> {
        self.client.generate_dog_profile(&self.to_record())
    }

    /// Partition, kind, constraints and current value of one field.
    pub fn field_info(&mut self, name: &str) -> Result<FieldInfo, FurSightError> {
        let allowed = self
            .allowed_values()?
            .allowed(name)
            .map(<[String]>::to_vec);
        let current_value = self
            .adopter
            .get(name)
            .or_else(|| self.dog.get(name))
            .cloned();
        Ok(FieldInfo {
            name: name.to_string(),
            partition: Partition::of(name),
            kind: fields::lookup(name).map(|spec| spec.kind),
            is_dropdown: allowed.is_some(),
            allowed_values: allowed.unwrap_or_default(),
            current_value,
        })
    }

    /// Sorted union of catalogued, constrained and sample field names.
    pub fn all_fields(&mut self) -> Result<Vec<String>, FurSightError> {
        let mut names: BTreeSet<String> = fields::all().map(str::to_string).collect();
        names.extend(self.allowed_values()?.fields().map(str::to_string));
        names.extend(self.sample_data()?.keys().cloned());
        Ok(names.into_iter().collect())
    }

    /// Known `adopter_` field names, sorted.
    pub fn adopter_fields(&mut self) -> Result<Vec<String>, FurSightError> {
        self.fields_in(Partition::Adopter)
    }

    /// Known `dog_` field names, sorted.
    pub fn dog_fields(&mut self) -> Result<Vec<String>, FurSightError> {
        self.fields_in(Partition::Dog)
    }

    fn fields_in(&mut self, partition: Partition) -> Result<Vec<String>, FurSightError> {
        Ok(self
            .all_fields()?
            .into_iter()
            .filter(|name| Partition::of(name) == Some(partition))
            .collect())
    }
}

fn check_field(
    table: &AllowedValuesTable,
    name: &str,
    value: &FieldValue,
) -> Result<(), ValidationError> {
    if table.permits(name, value) {
        return Ok(());
    }
    Err(ValidationError::NotAllowed {
        field: name.to_string(),
        received: value.to_string(),
        allowed: table.allowed(name).map(<[String]>::to_vec).unwrap_or_default(),
    })
}
