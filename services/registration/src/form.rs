//! Unified registration form state
//!
//! Holds the form data, the set of fields the user has interacted with, and
//! the rules that decide which sections exist. The registration type is the
//! only thing that adds or removes the `athlete` and `team` sections.

use common::validation::is_valid_email;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::error::FormError;
use crate::fields::{self, Field, FieldValue};
use crate::models::{
    AthleteSection, OrganizationSection, RegistrationType, Section, TeamSection,
    UnifiedRegistrationFormData,
};
use crate::rules::{self, GOALKEEPER_POSITION_ID, RULES};

/// Path accepted by `update_nested_field` to change the registration type
pub const REGISTRATION_TYPE_PATH: &str = "registration_type";

#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    data: UnifiedRegistrationFormData,
    touched: BTreeSet<Field>,
}

impl RegistrationForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing data, e.g. a person being edited. Sections are
    /// normalised to the registration type and derived values recomputed.
    pub fn from_data(data: UnifiedRegistrationFormData) -> Self {
        let mut form = Self {
            data,
            touched: BTreeSet::new(),
        };
        if let Some(registration_type) = form.data.registration_type {
            form.apply_sections(registration_type);
        }
        form.refresh_derived();
        form
    }

    pub fn data(&self) -> &UnifiedRegistrationFormData {
        &self.data
    }

    pub fn registration_type(&self) -> Option<RegistrationType> {
        self.data.registration_type
    }

    pub fn touched(&self) -> &BTreeSet<Field> {
        &self.touched
    }

    /// Write one field.
    ///
    /// Fails when the field's section is not active for the registration
    /// type, when the value has the wrong kind, or when an offensive position
    /// is set for a goalkeeper. A failed write leaves the form unchanged.
    pub fn update_field(&mut self, field: Field, value: impl Into<Value>) -> Result<(), FormError> {
        let value = FieldValue::parse(field, value.into())?;
        let section = field.section();

        if section.is_role_section() && !self.data.has_section(section) {
            return Err(FormError::SectionInactive(section));
        }

        if field.is_offensive_position() && !value.is_empty() && self.is_goalkeeper() {
            return Err(FormError::GoalkeeperOffensivePosition);
        }

        let selects_goalkeeper = field == Field::MainDefensivePosition
            && value == FieldValue::Integer(GOALKEEPER_POSITION_ID);

        fields::write(&mut self.data, field, value);

        if selects_goalkeeper {
            self.clear_offensive_positions();
        }

        self.refresh_derived();
        Ok(())
    }

    /// Write a field addressed by its dotted path, or the registration type
    /// through `"registration_type"`
    pub fn update_nested_field(
        &mut self,
        path: &str,
        value: impl Into<Value>,
    ) -> Result<(), FormError> {
        if path == REGISTRATION_TYPE_PATH {
            let value = value.into();
            let registration_type = value
                .as_str()
                .ok_or_else(|| FormError::InvalidValue {
                    path: path.to_string(),
                    expected: "text",
                })?
                .parse()?;
            self.set_registration_type(registration_type);
            return Ok(());
        }

        let field: Field = path.parse()?;
        self.update_field(field, value)
    }

    /// Select the registration type, creating the sections it uses and
    /// dropping the ones it does not
    pub fn set_registration_type(&mut self, registration_type: RegistrationType) {
        debug!(
            "Registration type {:?} -> {}",
            self.data.registration_type.map(|t| t.as_str()),
            registration_type
        );
        self.data.registration_type = Some(registration_type);
        self.apply_sections(registration_type);
        self.refresh_derived();
    }

    pub fn set_touched(&mut self, field: Field) {
        self.touched.insert(field);
    }

    /// Mark every field as touched so that all errors become visible
    pub fn touch_all(&mut self) {
        self.touched.extend(Field::all());
    }

    /// Error for `path` regardless of touched state. Unknown paths have none.
    pub fn validate_field(&self, path: &str) -> Option<String> {
        let field: Field = path.parse().ok()?;
        rules::validate(field, &self.data)
    }

    /// Every current error, keyed by dotted path
    pub fn errors(&self) -> BTreeMap<String, String> {
        RULES
            .iter()
            .filter_map(|rule| {
                rule.check(&self.data)
                    .err()
                    .map(|message| (rule.field.path(), message))
            })
            .fold(BTreeMap::new(), |mut errors, (path, message)| {
                errors.entry(path).or_insert(message);
                errors
            })
    }

    /// Errors the user should see: only those of touched fields
    pub fn visible_errors(&self) -> BTreeMap<String, String> {
        self.touched
            .iter()
            .filter_map(|field| {
                rules::validate(*field, &self.data).map(|message| (field.path(), message))
            })
            .collect()
    }

    pub fn is_section_valid(&self, section: Section) -> bool {
        RULES
            .iter()
            .filter(|rule| rule.field.section() == section)
            .all(|rule| rule.check(&self.data).is_ok())
    }

    pub fn is_form_valid(&self) -> bool {
        RULES.iter().all(|rule| rule.check(&self.data).is_ok())
    }

    pub fn can_save(&self) -> bool {
        self.data.registration_type.is_some() && self.is_form_valid()
    }

    pub fn is_goalkeeper(&self) -> bool {
        rules::is_goalkeeper(&self.data)
    }

    /// Whether submitting will also create a login account
    pub fn will_create_user(&self) -> bool {
        self.data.create_user
    }

    pub fn into_payload(self) -> UnifiedRegistrationFormData {
        self.data
    }

    fn apply_sections(&mut self, registration_type: RegistrationType) {
        if registration_type.uses_athlete() {
            self.data.athlete.get_or_insert_with(AthleteSection::default);
        } else {
            self.data.athlete = None;
        }

        if registration_type.uses_team() {
            self.data.team.get_or_insert_with(TeamSection::default);
        } else {
            self.data.team = None;
        }

        self.data
            .organization
            .get_or_insert_with(OrganizationSection::default);
    }

    fn clear_offensive_positions(&mut self) {
        if let Some(athlete) = self.data.athlete.as_mut() {
            athlete.main_offensive_position_id = None;
            athlete.secondary_offensive_position_id = None;
        }
    }

    fn refresh_derived(&mut self) {
        self.data.create_user = self.data.email().is_some_and(is_valid_email);
    }
}
