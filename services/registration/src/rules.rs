//! Field validation rules
//!
//! One entry per dotted path. A rule sees the whole form so it can depend on
//! the registration type or on other fields. These checks only guide the user;
//! the backend validates again on submit.

use chrono::Utc;
use common::validation::{validate_digits, validate_email, validate_iso_date, validate_required};

use crate::fields::Field;
use crate::models::{AthleteSection, RegistrationType, UnifiedRegistrationFormData};

/// Defensive position id of the goalkeeper
pub const GOALKEEPER_POSITION_ID: i64 = 5;

type Check = fn(&UnifiedRegistrationFormData) -> Result<(), String>;

pub struct Rule {
    pub field: Field,
    check: Check,
}

impl Rule {
    pub fn check(&self, data: &UnifiedRegistrationFormData) -> Result<(), String> {
        (self.check)(data)
    }
}

pub static RULES: &[Rule] = &[
    Rule { field: Field::FullName, check: full_name },
    Rule { field: Field::BirthDate, check: birth_date },
    Rule { field: Field::Email, check: email },
    Rule { field: Field::Cpf, check: cpf },
    Rule { field: Field::Phone, check: phone },
    Rule { field: Field::EmergencyContactPhone, check: emergency_contact_phone },
    Rule { field: Field::PostalCode, check: postal_code },
    Rule { field: Field::State, check: state },
    Rule { field: Field::MainDefensivePosition, check: main_defensive_position },
    Rule { field: Field::SecondaryDefensivePosition, check: secondary_defensive_position },
    Rule { field: Field::MainOffensivePosition, check: main_offensive_position },
    Rule { field: Field::SecondaryOffensivePosition, check: secondary_offensive_position },
    Rule { field: Field::Category, check: category },
    Rule { field: Field::Height, check: height },
    Rule { field: Field::Weight, check: weight },
    Rule { field: Field::Organization, check: organization },
    Rule { field: Field::Team, check: team },
    Rule { field: Field::JerseyNumber, check: jersey_number },
    Rule { field: Field::PhotoUrl, check: photo_url },
];

/// First error reported for `field`, if any
pub fn validate(field: Field, data: &UnifiedRegistrationFormData) -> Option<String> {
    RULES
        .iter()
        .filter(|rule| rule.field == field)
        .find_map(|rule| rule.check(data).err())
}

pub fn is_goalkeeper(data: &UnifiedRegistrationFormData) -> bool {
    athlete(data).and_then(|a| a.main_defensive_position_id) == Some(GOALKEEPER_POSITION_ID)
}

fn is_type(data: &UnifiedRegistrationFormData, registration_type: RegistrationType) -> bool {
    data.registration_type == Some(registration_type)
}

fn athlete(data: &UnifiedRegistrationFormData) -> Option<&AthleteSection> {
    data.athlete.as_ref()
}

fn optional(
    value: Option<&str>,
    check: impl FnOnce(&str) -> Result<(), String>,
) -> Result<(), String> {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => check(value),
        _ => Ok(()),
    }
}

fn in_range(value: Option<f64>, label: &str, min: f64, max: f64) -> Result<(), String> {
    match value {
        Some(value) if value < min || value > max => {
            Err(format!("{} must be between {} and {}", label, min, max))
        }
        _ => Ok(()),
    }
}

fn phone_number(value: &str, label: &str) -> Result<(), String> {
    validate_digits(value, label, 10)
        .or_else(|_| validate_digits(value, label, 11))
        .map_err(|_| format!("{} must have 10 or 11 digits", label))
}

fn full_name(data: &UnifiedRegistrationFormData) -> Result<(), String> {
    let name = data.core.as_ref().and_then(|c| c.full_name.as_deref());
    validate_required(name, "Full name", 3)
}

fn birth_date(data: &UnifiedRegistrationFormData) -> Result<(), String> {
    let value = data.core.as_ref().and_then(|c| c.birth_date.as_deref());
    validate_required(value, "Birth date", 1)?;

    let date = validate_iso_date(value.unwrap_or_default(), "Birth date")?;
    if date > Utc::now().date_naive() {
        return Err("Birth date cannot be in the future".to_string());
    }

    Ok(())
}

fn email(data: &UnifiedRegistrationFormData) -> Result<(), String> {
    optional(data.email(), validate_email)
}

fn cpf(data: &UnifiedRegistrationFormData) -> Result<(), String> {
    let value = data.documents.as_ref().and_then(|d| d.cpf.as_deref());
    optional(value, |v| validate_digits(v, "CPF", 11))
}

fn phone(data: &UnifiedRegistrationFormData) -> Result<(), String> {
    let value = data.contacts.as_ref().and_then(|c| c.phone.as_deref());
    optional(value, |v| phone_number(v, "Phone"))
}

fn emergency_contact_phone(data: &UnifiedRegistrationFormData) -> Result<(), String> {
    let value = data
        .contacts
        .as_ref()
        .and_then(|c| c.emergency_contact_phone.as_deref());
    optional(value, |v| phone_number(v, "Emergency contact phone"))
}

fn postal_code(data: &UnifiedRegistrationFormData) -> Result<(), String> {
    let value = data.address.as_ref().and_then(|a| a.postal_code.as_deref());
    optional(value, |v| validate_digits(v, "ZIP code", 8))
}

fn state(data: &UnifiedRegistrationFormData) -> Result<(), String> {
    let value = data.address.as_ref().and_then(|a| a.state.as_deref());
    optional(value, |v| {
        if v.len() == 2 && v.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(())
        } else {
            Err("State must be a two-letter code".to_string())
        }
    })
}

fn main_defensive_position(data: &UnifiedRegistrationFormData) -> Result<(), String> {
    let position = athlete(data).and_then(|a| a.main_defensive_position_id);
    if is_type(data, RegistrationType::Atleta) && position.is_none() {
        return Err("Main defensive position is required".to_string());
    }
    Ok(())
}

fn secondary_defensive_position(data: &UnifiedRegistrationFormData) -> Result<(), String> {
    let Some(athlete) = athlete(data) else {
        return Ok(());
    };
    if athlete.secondary_defensive_position_id.is_some()
        && athlete.secondary_defensive_position_id == athlete.main_defensive_position_id
    {
        return Err("Secondary defensive position must differ from the main one".to_string());
    }
    Ok(())
}

fn no_offensive_for_goalkeeper(
    data: &UnifiedRegistrationFormData,
    position: Option<i64>,
) -> Result<(), String> {
    if position.is_some() && is_goalkeeper(data) {
        return Err("Goalkeepers cannot have an offensive position".to_string());
    }
    Ok(())
}

fn main_offensive_position(data: &UnifiedRegistrationFormData) -> Result<(), String> {
    no_offensive_for_goalkeeper(data, athlete(data).and_then(|a| a.main_offensive_position_id))
}

fn secondary_offensive_position(data: &UnifiedRegistrationFormData) -> Result<(), String> {
    let Some(athlete) = athlete(data) else {
        return Ok(());
    };
    no_offensive_for_goalkeeper(data, athlete.secondary_offensive_position_id)?;

    if athlete.secondary_offensive_position_id.is_some()
        && athlete.secondary_offensive_position_id == athlete.main_offensive_position_id
    {
        return Err("Secondary offensive position must differ from the main one".to_string());
    }
    Ok(())
}

fn category(data: &UnifiedRegistrationFormData) -> Result<(), String> {
    let category = athlete(data).and_then(|a| a.category_id);
    if is_type(data, RegistrationType::Atleta) && category.is_none() {
        return Err("Category is required".to_string());
    }
    Ok(())
}

fn height(data: &UnifiedRegistrationFormData) -> Result<(), String> {
    in_range(athlete(data).and_then(|a| a.height_cm), "Height (cm)", 50.0, 250.0)
}

fn weight(data: &UnifiedRegistrationFormData) -> Result<(), String> {
    in_range(athlete(data).and_then(|a| a.weight_kg), "Weight (kg)", 20.0, 200.0)
}

fn organization(data: &UnifiedRegistrationFormData) -> Result<(), String> {
    let organization = data.organization.as_ref().and_then(|o| o.organization_id);
    let is_staff = data.registration_type.is_some_and(|t| t.is_staff());
    if is_staff && organization.is_none() {
        return Err("Organization is required".to_string());
    }
    Ok(())
}

fn team(data: &UnifiedRegistrationFormData) -> Result<(), String> {
    let team = data.team.as_ref().and_then(|t| t.team_id);
    if is_type(data, RegistrationType::Treinador) && team.is_none() {
        return Err("Team is required".to_string());
    }
    Ok(())
}

fn jersey_number(data: &UnifiedRegistrationFormData) -> Result<(), String> {
    match data.team.as_ref().and_then(|t| t.jersey_number) {
        Some(number) if !(0..=99).contains(&number) => {
            Err("Jersey number must be between 0 and 99".to_string())
        }
        _ => Ok(()),
    }
}

fn photo_url(data: &UnifiedRegistrationFormData) -> Result<(), String> {
    let value = data.photo.as_ref().and_then(|p| p.url.as_deref());
    optional(value, |v| {
        if v.starts_with("http://") || v.starts_with("https://") {
            Ok(())
        } else {
            Err("Photo must be an http(s) URL".to_string())
        }
    })
}
