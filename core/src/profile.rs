//! Adopter and dog field partitions and the merged prediction record.
//!
//! # Design
//! Both profiles are sparse: only fields that were set are stored and sent.
//! Maps are ordered so validation and serialization are deterministic.
//! Field names are namespaced by prefix (`adopter_`, `dog_`), which is how a
//! flat record is split back into partitions.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::FieldValue;

/// Flat, ordered field name to value map.
pub type FieldMap = BTreeMap<String, FieldValue>;

/// One of the two field groups a form is split into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Partition {
    Adopter,
    Dog,
}

impl Partition {
    pub fn prefix(&self) -> &'static str {
        match self {
            Partition::Adopter => "adopter_",
            Partition::Dog => "dog_",
        }
    }

    /// Partition a field belongs to by its prefix, if any.
    pub fn of(field: &str) -> Option<Partition> {
        if field.starts_with(Partition::Adopter.prefix()) {
            Some(Partition::Adopter)
        } else if field.starts_with(Partition::Dog.prefix()) {
            Some(Partition::Dog)
        } else {
            None
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Partition::Adopter => f.write_str("adopter"),
            Partition::Dog => f.write_str("dog"),
        }
    }
}

macro_rules! profile {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name {
            fields: FieldMap,
        }

        impl $name {
            pub fn new() -> Self {
                Self::default()
            }

            pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
                self.fields.insert(name.into(), value.into());
            }

            pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
                self.fields.remove(name)
            }

            pub fn get(&self, name: &str) -> Option<&FieldValue> {
                self.fields.get(name)
            }

            pub fn fields(&self) -> &FieldMap {
                &self.fields
            }

            pub fn is_empty(&self) -> bool {
                self.fields.is_empty()
            }

            pub fn len(&self) -> usize {
                self.fields.len()
            }

            pub fn clear(&mut self) {
                self.fields.clear();
            }
        }

        impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for $name {
            fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
                let mut profile = Self::new();
                profile.extend(iter);
                profile
            }
        }

        impl<K: Into<String>, V: Into<FieldValue>> Extend<(K, V)> for $name {
            fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
                for (name, value) in iter {
                    self.set(name, value);
                }
            }
        }
    };
}

profile!(
    /// Attributes of the prospective adopter: housing, household, budget, preferences.
    AdopterProfile
);

profile!(
    /// Attributes of the dog: breed, size, temperament, medical and behavioral flags.
    DogProfile
);

/// Flat record sent to `POST /predict/single`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredictionRecord {
    fields: FieldMap,
}

impl PredictionRecord {
    /// Union of both partitions. Dog entries are applied after adopter
    /// entries, so a colliding key resolves to the dog value.
    pub fn merge(adopter: &AdopterProfile, dog: &DogProfile) -> Self {
        let mut fields = adopter.fields().clone();
        for (name, value) in dog.fields() {
            fields.insert(name.clone(), value.clone());
        }
        Self { fields }
    }

    /// Builds a record from a JSON object, dropping nulls and non-scalar values.
    pub fn from_json_object(object: &Map<String, Value>) -> Self {
        let fields = object
            .iter()
            .filter_map(|(name, value)| FieldValue::from_json(value).map(|v| (name.clone(), v)))
            .collect();
        Self { fields }
    }

    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    pub fn into_fields(self) -> FieldMap {
        self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Splits the record by name prefix. Fields outside both namespaces are dropped.
    pub fn split(&self) -> (AdopterProfile, DogProfile) {
        let mut adopter = AdopterProfile::new();
        let mut dog = DogProfile::new();
        for (name, value) in &self.fields {
            match Partition::of(name) {
                Some(Partition::Adopter) => adopter.set(name.clone(), value.clone()),
                Some(Partition::Dog) => dog.set(name.clone(), value.clone()),
                None => tracing::trace!(field = %name, "dropping field outside both partitions"),
            }
        }
        (adopter, dog)
    }
}

impl From<FieldMap> for PredictionRecord {
    fn from(fields: FieldMap) -> Self {
        Self { fields }
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for PredictionRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let fields = iter
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        Self { fields }
    }
}

/// Server-supplied enumeration of permitted values per field.
///
/// Fields missing from the table, or mapped to an empty list, are unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllowedValuesTable {
    values: BTreeMap<String, Vec<String>>,
}

impl AllowedValuesTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<I, S>(&mut self, field: impl Into<String>, allowed: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values
            .insert(field.into(), allowed.into_iter().map(Into::into).collect());
    }

    pub fn allowed(&self, field: &str) -> Option<&[String]> {
        self.values.get(field).map(Vec::as_slice)
    }

    /// Whether `value` may be used for `field`.
    pub fn permits(&self, field: &str, value: &FieldValue) -> bool {
        match self.allowed(field) {
            Some(allowed) if !allowed.is_empty() => {
                let rendered = value.to_string();
                allowed.iter().any(|candidate| *candidate == rendered)
            }
            _ => true,
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
