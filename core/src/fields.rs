//! Static catalogue of the form fields the prediction service understands.
//!
//! The catalogue lists 122 fields: 50 describing the adopter and 72
//! describing the dog. It only records each field's name and scalar kind;
//! allowed values come from the service.

use crate::profile::Partition;

/// Scalar kind a field expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }

    pub fn partition(&self) -> Option<Partition> {
        Partition::of(self.name)
    }
}

/// Looks up a field in either catalogue.
pub fn lookup(name: &str) -> Option<&'static FieldSpec> {
    ADOPTER_FIELDS
        .iter()
        .chain(DOG_FIELDS)
        .find(|spec| spec.name == name)
}

/// Every catalogued field name, adopter fields first.
pub fn all() -> impl Iterator<Item = &'static str> {
    ADOPTER_FIELDS.iter().chain(DOG_FIELDS).map(|spec| spec.name)
}

pub const ADOPTER_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("adopter_housing_type", FieldKind::Text),
    FieldSpec::new("adopter_home_ownership_status", FieldKind::Text),
    FieldSpec::new("adopter_landlord_permission", FieldKind::Text),
    FieldSpec::new("adopter_yard_type", FieldKind::Text),
    FieldSpec::new("adopter_fence_type", FieldKind::Text),
    FieldSpec::new("adopter_fence_height_ft", FieldKind::Number),
    FieldSpec::new("adopter_household_members", FieldKind::Text),
    FieldSpec::new("adopter_has_kids", FieldKind::Text),
    FieldSpec::new("adopter_num_kids", FieldKind::Number),
    FieldSpec::new("adopter_kids_ages", FieldKind::Text),
    FieldSpec::new("adopter_kids_dog_experience", FieldKind::Text),
    FieldSpec::new("adopter_household_allergies", FieldKind::Text),
    FieldSpec::new("adopter_allergy_severity", FieldKind::Text),
    FieldSpec::new("adopter_hypoallergenic_preference", FieldKind::Text),
    FieldSpec::new("adopter_hours_dog_left_alone", FieldKind::Number),
    FieldSpec::new("adopter_daytime_presence", FieldKind::Text),
    FieldSpec::new("adopter_move_plan_within_6mo", FieldKind::Text),
    FieldSpec::new("adopter_monthly_dog_budget_usd", FieldKind::Number),
    FieldSpec::new("adopter_can_afford_vet_grooming", FieldKind::Text),
    FieldSpec::new("adopter_preferred_breed", FieldKind::Text),
    FieldSpec::new("adopter_preferred_breed_status", FieldKind::Text),
    FieldSpec::new("adopter_preferred_age", FieldKind::Text),
    FieldSpec::new("adopter_preferred_size", FieldKind::Text),
    FieldSpec::new("adopter_preferred_energy_level", FieldKind::Text),
    FieldSpec::new("adopter_desired_temperament", FieldKind::Text),
    FieldSpec::new("adopter_preferred_sex", FieldKind::Text),
    FieldSpec::new("adopter_preferred_housetraining_status", FieldKind::Text),
    FieldSpec::new("adopter_okay_with_medical_needs", FieldKind::Text),
    FieldSpec::new("adopter_okay_with_behavior_issues", FieldKind::Text),
    FieldSpec::new("adopter_reason_for_adoption", FieldKind::Text),
    FieldSpec::new("adopter_exercise_routine", FieldKind::Text),
    FieldSpec::new("adopter_exercise_frequency_per_week", FieldKind::Number),
    FieldSpec::new("adopter_discipline_method", FieldKind::Text),
    FieldSpec::new("adopter_training_plan", FieldKind::Text),
    FieldSpec::new("adopter_leash_behavior", FieldKind::Text),
    FieldSpec::new("adopter_dog_sleeping_area", FieldKind::Text),
    FieldSpec::new("adopter_previous_dog_experience", FieldKind::Text),
    FieldSpec::new("adopter_pitbull_experience", FieldKind::Text),
    FieldSpec::new("adopter_owned_dogs_last_5yrs", FieldKind::Number),
    FieldSpec::new("adopter_previous_pet_outcome", FieldKind::Text),
    FieldSpec::new("adopter_has_other_pets", FieldKind::Text),
    FieldSpec::new("adopter_other_pets_info", FieldKind::Text),
    FieldSpec::new("adopter_pets_adjustment_expectation", FieldKind::Text),
    FieldSpec::new("adopter_experience_with_issues", FieldKind::Text),
    FieldSpec::new("adopter_surrender_risks", FieldKind::Text),
    FieldSpec::new("adopter_long_term_commitment", FieldKind::Text),
    FieldSpec::new("adopter_pet_loss_plan", FieldKind::Text),
    FieldSpec::new("adopter_preparation_confidence", FieldKind::Text),
    FieldSpec::new("adopter_adopter_breed_restrictions", FieldKind::Text),
    FieldSpec::new("adopter_rewritten_adopter_letter", FieldKind::Text),
];

pub const DOG_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("dog_breed", FieldKind::Text),
    FieldSpec::new("dog_primaryBreed", FieldKind::Text),
    FieldSpec::new("dog_secondaryBreed", FieldKind::Text),
    FieldSpec::new("dog_sex", FieldKind::Text),
    FieldSpec::new("dog_mixed", FieldKind::Text),
    FieldSpec::new("dog_age", FieldKind::Text),
    FieldSpec::new("dog_birthdate", FieldKind::Text),
    FieldSpec::new("dog_altered", FieldKind::Text),
    FieldSpec::new("dog_dogs", FieldKind::Text),
    FieldSpec::new("dog_cats", FieldKind::Text),
    FieldSpec::new("dog_kids", FieldKind::Text),
    FieldSpec::new("dog_oKWithAdults", FieldKind::Text),
    FieldSpec::new("dog_oKForSeniors", FieldKind::Text),
    FieldSpec::new("dog_oKWithFarmAnimals", FieldKind::Text),
    FieldSpec::new("dog_size", FieldKind::Text),
    FieldSpec::new("dog_sizeCurrent", FieldKind::Number),
    FieldSpec::new("dog_sizePotential", FieldKind::Number),
    FieldSpec::new("dog_sizeUOM", FieldKind::Text),
    FieldSpec::new("dog_color", FieldKind::Text),
    FieldSpec::new("dog_coatLength", FieldKind::Text),
    FieldSpec::new("dog_pattern", FieldKind::Text),
    FieldSpec::new("dog_earType", FieldKind::Text),
    FieldSpec::new("dog_eyeColor", FieldKind::Text),
    FieldSpec::new("dog_tailType", FieldKind::Text),
    FieldSpec::new("dog_housetrained", FieldKind::Text),
    FieldSpec::new("dog_obedienceTraining", FieldKind::Text),
    FieldSpec::new("dog_leashtrained", FieldKind::Text),
    FieldSpec::new("dog_cratetrained", FieldKind::Text),
    FieldSpec::new("dog_ownerExperience", FieldKind::Text),
    FieldSpec::new("dog_exerciseNeeds", FieldKind::Text),
    FieldSpec::new("dog_energyLevel", FieldKind::Text),
    FieldSpec::new("dog_activityLevel", FieldKind::Text),
    FieldSpec::new("dog_yardRequired", FieldKind::Text),
    FieldSpec::new("dog_fence", FieldKind::Text),
    FieldSpec::new("dog_groomingNeeds", FieldKind::Text),
    FieldSpec::new("dog_shedding", FieldKind::Text),
    FieldSpec::new("dog_hypoallergenic", FieldKind::Text),
    FieldSpec::new("dog_specialNeeds", FieldKind::Text),
    FieldSpec::new("dog_uptodate", FieldKind::Text),
    FieldSpec::new("dog_declawed", FieldKind::Text),
    FieldSpec::new("dog_hasAllergies", FieldKind::Text),
    FieldSpec::new("dog_specialDiet", FieldKind::Text),
    FieldSpec::new("dog_ongoingMedical", FieldKind::Text),
    FieldSpec::new("dog_hearingImpaired", FieldKind::Text),
    FieldSpec::new("dog_sightImpaired", FieldKind::Text),
    FieldSpec::new("dog_obedient", FieldKind::Text),
    FieldSpec::new("dog_playful", FieldKind::Text),
    FieldSpec::new("dog_timid", FieldKind::Text),
    FieldSpec::new("dog_skittish", FieldKind::Text),
    FieldSpec::new("dog_independent", FieldKind::Text),
    FieldSpec::new("dog_affectionate", FieldKind::Text),
    FieldSpec::new("dog_eagerToPlease", FieldKind::Text),
    FieldSpec::new("dog_intelligent", FieldKind::Text),
    FieldSpec::new("dog_eventempered", FieldKind::Text),
    FieldSpec::new("dog_gentle", FieldKind::Text),
    FieldSpec::new("dog_goofy", FieldKind::Text),
    FieldSpec::new("dog_newPeople", FieldKind::Text),
    FieldSpec::new("dog_vocal", FieldKind::Text),
    FieldSpec::new("dog_goodInCar", FieldKind::Text),
    FieldSpec::new("dog_fetches", FieldKind::Text),
    FieldSpec::new("dog_playsToys", FieldKind::Text),
    FieldSpec::new("dog_swims", FieldKind::Text),
    FieldSpec::new("dog_lap", FieldKind::Text),
    FieldSpec::new("dog_drools", FieldKind::Text),
    FieldSpec::new("dog_protective", FieldKind::Text),
    FieldSpec::new("dog_escapes", FieldKind::Text),
    FieldSpec::new("dog_predatory", FieldKind::Text),
    FieldSpec::new("dog_apartment", FieldKind::Text),
    FieldSpec::new("dog_noHeat", FieldKind::Text),
    FieldSpec::new("dog_noCold", FieldKind::Text),
    FieldSpec::new("dog_combined_breeds", FieldKind::Text),
    FieldSpec::new("dog_enriched_profile", FieldKind::Text),
];
