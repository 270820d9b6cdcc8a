//! Preset form contents for common adopter situations.

use std::fmt;

use crate::profile::{AdopterProfile, DogProfile};
use crate::types::FieldValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    FamilyWithKids,
    ApartmentDweller,
    SeniorAdopter,
    /// A handful of neutral defaults.
    Basic,
    /// Server sample data for every field.
    SampleData,
}

impl Template {
    /// Parses a template name. Unknown names fall back to `SampleData`.
    pub fn from_name(name: &str) -> Template {
        match name {
            "family_with_kids" => Template::FamilyWithKids,
            "apartment_dweller" => Template::ApartmentDweller,
            "senior_adopter" => Template::SeniorAdopter,
            "basic" => Template::Basic,
            _ => Template::SampleData,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Template::FamilyWithKids => "family_with_kids",
            Template::ApartmentDweller => "apartment_dweller",
            Template::SeniorAdopter => "senior_adopter",
            Template::Basic => "basic",
            Template::SampleData => "sample_data",
        }
    }

    /// Static preset values. `SampleData` has none; it is loaded from the service.
    pub fn profiles(&self) -> (AdopterProfile, DogProfile) {
        let (adopter, dog): (Vec<(&str, FieldValue)>, Vec<(&str, FieldValue)>) = match self {
            Template::FamilyWithKids => (
                vec![
                    ("adopter_housing_type", "Suburban Home".into()),
                    ("adopter_has_kids", "Yes".into()),
                    ("adopter_num_kids", 2.into()),
                    ("adopter_kids_ages", "8, 12".into()),
                    ("adopter_kids_dog_experience", "Good".into()),
                    ("adopter_yard_type", "Fenced".into()),
                    ("adopter_preferred_size", "Medium".into()),
                    ("adopter_previous_dog_experience", "Moderate".into()),
                ],
                vec![
                    ("dog_kids", "Yes".into()),
                    ("dog_size", "Medium".into()),
                    ("dog_energyLevel", "Moderate".into()),
                    ("dog_housetrained", "Yes".into()),
                ],
            ),
            Template::ApartmentDweller => (
                vec![
                    ("adopter_housing_type", "Apartment".into()),
                    ("adopter_has_kids", "No".into()),
                    ("adopter_yard_type", "Shared".into()),
                    ("adopter_preferred_size", "Small".into()),
                    ("adopter_exercise_routine", "Walks".into()),
                ],
                vec![
                    ("dog_size", "Small".into()),
                    ("dog_apartment", "Yes".into()),
                    ("dog_energyLevel", "Low".into()),
                    ("dog_vocal", "Quiet".into()),
                ],
            ),
            Template::SeniorAdopter => (
                vec![
                    ("adopter_housing_type", "Condo".into()),
                    ("adopter_has_kids", "No".into()),
                    ("adopter_preferred_age", "Senior".into()),
                    ("adopter_preferred_energy_level", "Low".into()),
                    ("adopter_exercise_routine", "Walks".into()),
                ],
                vec![
                    ("dog_age", "Senior".into()),
                    ("dog_energyLevel", "Low".into()),
                    ("dog_oKForSeniors", "Yes".into()),
                    ("dog_gentle", "Yes".into()),
                ],
            ),
            Template::Basic => (
                vec![
                    ("adopter_housing_type", "Suburban Home".into()),
                    ("adopter_has_kids", "No".into()),
                    ("adopter_previous_dog_experience", "Moderate".into()),
                    ("adopter_long_term_commitment", "Yes".into()),
                ],
                vec![
                    ("dog_age", "Adult".into()),
                    ("dog_size", "Medium".into()),
                    ("dog_energyLevel", "Moderate".into()),
                ],
            ),
            Template::SampleData => (Vec::new(), Vec::new()),
        };
        (adopter.into_iter().collect(), dog.into_iter().collect())
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields;
    use crate::profile::Partition;

    #[test]
    fn unknown_names_fall_back_to_sample_data() {
        assert_eq!(Template::from_name("family_with_kids"), Template::FamilyWithKids);
        assert_eq!(Template::from_name("senior_adopter"), Template::SeniorAdopter);
        assert_eq!(Template::from_name("rural"), Template::SampleData);
        assert_eq!(Template::from_name(""), Template::SampleData);
    }

    #[test]
    fn names_round_trip_for_static_templates() {
        for template in [
            Template::FamilyWithKids,
            Template::ApartmentDweller,
            Template::SeniorAdopter,
            Template::Basic,
        ] {
            assert_eq!(Template::from_name(template.name()), template);
        }
    }

    #[test]
    fn preset_fields_are_catalogued_and_partitioned() {
        for template in [
            Template::FamilyWithKids,
            Template::ApartmentDweller,
            Template::SeniorAdopter,
            Template::Basic,
        ] {
            let (adopter, dog) = template.profiles();
            assert!(!adopter.is_empty() && !dog.is_empty(), "{template}");
            for name in adopter.fields().keys() {
                assert_eq!(Partition::of(name), Some(Partition::Adopter));
                assert!(fields::lookup(name).is_some(), "{name}");
            }
            for name in dog.fields().keys() {
                assert_eq!(Partition::of(name), Some(Partition::Dog));
                assert!(fields::lookup(name).is_some(), "{name}");
            }
        }
    }

    #[test]
    fn sample_data_template_has_no_static_values() {
        let (adopter, dog) = Template::SampleData.profiles();
        assert!(adopter.is_empty());
        assert!(dog.is_empty());
    }
}
