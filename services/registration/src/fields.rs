//! Typed addressing of form fields
//!
//! Every writable field is a `Field` variant. The dotted path (`"athlete.category_id"`)
//! is only used at the edges: parsing input and keying errors.

use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::FormError;
use crate::models::{
    AddressSection, AthleteSection, ContactsSection, CoreSection, DocumentsSection, Section,
    TeamSection, UnifiedRegistrationFormData,
};

/// What a field accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Integer identifier or count
    Integer,
    Decimal,
}

impl FieldKind {
    fn describe(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Integer => "an integer",
            FieldKind::Decimal => "a number",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    FullName,
    BirthDate,
    Gender,
    Email,
    Cpf,
    Rg,
    Phone,
    EmergencyContactName,
    EmergencyContactPhone,
    PostalCode,
    Street,
    Number,
    Complement,
    Neighborhood,
    City,
    State,
    MainDefensivePosition,
    SecondaryDefensivePosition,
    MainOffensivePosition,
    SecondaryOffensivePosition,
    Category,
    SchoolingLevel,
    Height,
    Weight,
    DominantHand,
    Organization,
    Team,
    Season,
    JerseyNumber,
    PhotoUrl,
}

static FIELDS: [(Field, Section, &str, FieldKind); 30] = [
    (Field::FullName, Section::Core, "full_name", FieldKind::Text),
    (Field::BirthDate, Section::Core, "birth_date", FieldKind::Text),
    (Field::Gender, Section::Core, "gender", FieldKind::Text),
    (Field::Email, Section::Core, "email", FieldKind::Text),
    (Field::Cpf, Section::Documents, "cpf", FieldKind::Text),
    (Field::Rg, Section::Documents, "rg", FieldKind::Text),
    (Field::Phone, Section::Contacts, "phone", FieldKind::Text),
    (Field::EmergencyContactName, Section::Contacts, "emergency_contact_name", FieldKind::Text),
    (Field::EmergencyContactPhone, Section::Contacts, "emergency_contact_phone", FieldKind::Text),
    (Field::PostalCode, Section::Address, "postal_code", FieldKind::Text),
    (Field::Street, Section::Address, "street", FieldKind::Text),
    (Field::Number, Section::Address, "number", FieldKind::Text),
    (Field::Complement, Section::Address, "complement", FieldKind::Text),
    (Field::Neighborhood, Section::Address, "neighborhood", FieldKind::Text),
    (Field::City, Section::Address, "city", FieldKind::Text),
    (Field::State, Section::Address, "state", FieldKind::Text),
    (
        Field::MainDefensivePosition,
        Section::Athlete,
        "main_defensive_position_id",
        FieldKind::Integer,
    ),
    (
        Field::SecondaryDefensivePosition,
        Section::Athlete,
        "secondary_defensive_position_id",
        FieldKind::Integer,
    ),
    (
        Field::MainOffensivePosition,
        Section::Athlete,
        "main_offensive_position_id",
        FieldKind::Integer,
    ),
    (
        Field::SecondaryOffensivePosition,
        Section::Athlete,
        "secondary_offensive_position_id",
        FieldKind::Integer,
    ),
    (Field::Category, Section::Athlete, "category_id", FieldKind::Integer),
    (Field::SchoolingLevel, Section::Athlete, "schooling_level_id", FieldKind::Integer),
    (Field::Height, Section::Athlete, "height_cm", FieldKind::Decimal),
    (Field::Weight, Section::Athlete, "weight_kg", FieldKind::Decimal),
    (Field::DominantHand, Section::Athlete, "dominant_hand", FieldKind::Text),
    (Field::Organization, Section::Organization, "organization_id", FieldKind::Integer),
    (Field::Team, Section::Team, "team_id", FieldKind::Integer),
    (Field::Season, Section::Team, "season_id", FieldKind::Integer),
    (Field::JerseyNumber, Section::Team, "jersey_number", FieldKind::Integer),
    (Field::PhotoUrl, Section::Photo, "url", FieldKind::Text),
];

impl Field {
    pub fn all() -> impl Iterator<Item = Field> {
        FIELDS.iter().map(|(field, ..)| *field)
    }

    fn entry(&self) -> &'static (Field, Section, &'static str, FieldKind) {
        // FIELDS lists the variants in declaration order
        &FIELDS[*self as usize]
    }

    pub fn section(&self) -> Section {
        self.entry().1
    }

    /// Field name within its section
    pub fn name(&self) -> &'static str {
        self.entry().2
    }

    pub fn kind(&self) -> FieldKind {
        self.entry().3
    }

    /// Dotted path, e.g. `"athlete.main_defensive_position_id"`
    pub fn path(&self) -> String {
        format!("{}.{}", self.section().as_str(), self.name())
    }

    pub fn in_section(section: Section) -> impl Iterator<Item = Field> {
        Field::all().filter(move |field| field.section() == section)
    }

    pub fn is_offensive_position(&self) -> bool {
        matches!(
            self,
            Field::MainOffensivePosition | Field::SecondaryOffensivePosition
        )
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section(), self.name())
    }
}

impl FromStr for Field {
    type Err = FormError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let (section, name) = path
            .split_once('.')
            .ok_or_else(|| FormError::UnknownField(path.to_string()))?;
        let section: Section = section.parse()?;

        Field::in_section(section)
            .find(|field| field.name() == name)
            .ok_or_else(|| FormError::UnknownField(path.to_string()))
    }
}

/// A value checked against the kind of the field it is written to
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Clears the field
    Empty,
    Text(String),
    Integer(i64),
    Decimal(f64),
}

impl FieldValue {
    /// Convert raw input for `field`. `null` and blank text clear the field;
    /// integer fields also accept whole-number decimals.
    pub fn parse(field: Field, value: Value) -> Result<Self, FormError> {
        let invalid = || FormError::InvalidValue {
            path: field.path(),
            expected: field.kind().describe(),
        };

        match (field.kind(), value) {
            (_, Value::Null) => Ok(FieldValue::Empty),
            (FieldKind::Text, Value::String(text)) if text.trim().is_empty() => {
                Ok(FieldValue::Empty)
            }
            (FieldKind::Text, Value::String(text)) => Ok(FieldValue::Text(text)),
            (FieldKind::Integer, Value::Number(number)) => match number.as_i64() {
                Some(integer) => Ok(FieldValue::Integer(integer)),
                None => number
                    .as_f64()
                    .filter(|decimal| decimal.fract() == 0.0 && decimal.abs() < i64::MAX as f64)
                    .map(|decimal| FieldValue::Integer(decimal as i64))
                    .ok_or_else(invalid),
            },
            (FieldKind::Decimal, Value::Number(number)) => {
                number.as_f64().map(FieldValue::Decimal).ok_or_else(invalid)
            }
            _ => Err(invalid()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, FieldValue::Empty)
    }

    fn text(self) -> Option<String> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    fn integer(self) -> Option<i64> {
        match self {
            FieldValue::Integer(integer) => Some(integer),
            _ => None,
        }
    }

    fn decimal(self) -> Option<f64> {
        match self {
            FieldValue::Decimal(decimal) => Some(decimal),
            FieldValue::Integer(integer) => Some(integer as f64),
            _ => None,
        }
    }
}

/// Store `value` in `data`, creating the field's section when missing.
/// Section activation and value kinds are checked by the caller.
pub(crate) fn write(data: &mut UnifiedRegistrationFormData, field: Field, value: FieldValue) {
    fn core(data: &mut UnifiedRegistrationFormData) -> &mut CoreSection {
        data.core.get_or_insert_with(Default::default)
    }
    fn documents(data: &mut UnifiedRegistrationFormData) -> &mut DocumentsSection {
        data.documents.get_or_insert_with(Default::default)
    }
    fn contacts(data: &mut UnifiedRegistrationFormData) -> &mut ContactsSection {
        data.contacts.get_or_insert_with(Default::default)
    }
    fn address(data: &mut UnifiedRegistrationFormData) -> &mut AddressSection {
        data.address.get_or_insert_with(Default::default)
    }
    fn athlete(data: &mut UnifiedRegistrationFormData) -> &mut AthleteSection {
        data.athlete.get_or_insert_with(Default::default)
    }
    fn team(data: &mut UnifiedRegistrationFormData) -> &mut TeamSection {
        data.team.get_or_insert_with(Default::default)
    }

    match field {
        Field::FullName => core(data).full_name = value.text(),
        Field::BirthDate => core(data).birth_date = value.text(),
        Field::Gender => core(data).gender = value.text(),
        Field::Email => core(data).email = value.text(),
        Field::Cpf => documents(data).cpf = value.text(),
        Field::Rg => documents(data).rg = value.text(),
        Field::Phone => contacts(data).phone = value.text(),
        Field::EmergencyContactName => contacts(data).emergency_contact_name = value.text(),
        Field::EmergencyContactPhone => contacts(data).emergency_contact_phone = value.text(),
        Field::PostalCode => address(data).postal_code = value.text(),
        Field::Street => address(data).street = value.text(),
        Field::Number => address(data).number = value.text(),
        Field::Complement => address(data).complement = value.text(),
        Field::Neighborhood => address(data).neighborhood = value.text(),
        Field::City => address(data).city = value.text(),
        Field::State => address(data).state = value.text(),
        Field::MainDefensivePosition => athlete(data).main_defensive_position_id = value.integer(),
        Field::SecondaryDefensivePosition => {
            athlete(data).secondary_defensive_position_id = value.integer()
        }
        Field::MainOffensivePosition => athlete(data).main_offensive_position_id = value.integer(),
        Field::SecondaryOffensivePosition => {
            athlete(data).secondary_offensive_position_id = value.integer()
        }
        Field::Category => athlete(data).category_id = value.integer(),
        Field::SchoolingLevel => athlete(data).schooling_level_id = value.integer(),
        Field::Height => athlete(data).height_cm = value.decimal(),
        Field::Weight => athlete(data).weight_kg = value.decimal(),
        Field::DominantHand => athlete(data).dominant_hand = value.text(),
        Field::Organization => {
            data.organization.get_or_insert_with(Default::default).organization_id = value.integer()
        }
        Field::Team => team(data).team_id = value.integer(),
        Field::Season => team(data).season_id = value.integer(),
        Field::JerseyNumber => team(data).jersey_number = value.integer(),
        Field::PhotoUrl => data.photo.get_or_insert_with(Default::default).url = value.text(),
    }
}
