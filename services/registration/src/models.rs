//! Unified registration form data

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FormError;

/// Role a person is being registered for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationType {
    /// Athlete
    Atleta,
    /// Coach
    Treinador,
    /// Coordinator
    Coordenador,
    /// Director
    Dirigente,
}

impl RegistrationType {
    pub const ALL: [RegistrationType; 4] = [
        RegistrationType::Atleta,
        RegistrationType::Treinador,
        RegistrationType::Coordenador,
        RegistrationType::Dirigente,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationType::Atleta => "atleta",
            RegistrationType::Treinador => "treinador",
            RegistrationType::Coordenador => "coordenador",
            RegistrationType::Dirigente => "dirigente",
        }
    }

    pub fn is_staff(&self) -> bool {
        !matches!(self, RegistrationType::Atleta)
    }

    /// Whether the `athlete` section belongs to this type
    pub fn uses_athlete(&self) -> bool {
        matches!(self, RegistrationType::Atleta)
    }

    /// Whether the `team` section belongs to this type
    pub fn uses_team(&self) -> bool {
        matches!(self, RegistrationType::Atleta | RegistrationType::Treinador)
    }
}

impl fmt::Display for RegistrationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegistrationType {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RegistrationType::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| FormError::UnknownRegistrationType(s.to_string()))
    }
}

/// Top-level sections of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    Core,
    Documents,
    Contacts,
    Address,
    Athlete,
    Organization,
    Team,
    Photo,
}

impl Section {
    pub const ALL: [Section; 8] = [
        Section::Core,
        Section::Documents,
        Section::Contacts,
        Section::Address,
        Section::Athlete,
        Section::Organization,
        Section::Team,
        Section::Photo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Core => "core",
            Section::Documents => "documents",
            Section::Contacts => "contacts",
            Section::Address => "address",
            Section::Athlete => "athlete",
            Section::Organization => "organization",
            Section::Team => "team",
            Section::Photo => "photo",
        }
    }

    /// Sections that only exist while the registration type asks for them
    pub fn is_role_section(&self) -> bool {
        matches!(self, Section::Athlete | Section::Team)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| FormError::UnknownSection(s.to_string()))
    }
}

/// Identity of the person being registered
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoreSection {
    pub full_name: Option<String>,
    /// ISO `YYYY-MM-DD`
    pub birth_date: Option<String>,
    pub gender: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentsSection {
    pub cpf: Option<String>,
    pub rg: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactsSection {
    pub phone: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressSection {
    pub postal_code: Option<String>,
    pub street: Option<String>,
    pub number: Option<String>,
    pub complement: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

/// Sport-specific data, present only for athletes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AthleteSection {
    pub main_defensive_position_id: Option<i64>,
    pub secondary_defensive_position_id: Option<i64>,
    pub main_offensive_position_id: Option<i64>,
    pub secondary_offensive_position_id: Option<i64>,
    pub category_id: Option<i64>,
    pub schooling_level_id: Option<i64>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub dominant_hand: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganizationSection {
    pub organization_id: Option<i64>,
}

/// Team and season the person joins, for athletes and coaches
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamSection {
    pub team_id: Option<i64>,
    pub season_id: Option<i64>,
    pub jersey_number: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhotoSection {
    pub url: Option<String>,
}

/// Everything the unified registration endpoint accepts in one submission
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnifiedRegistrationFormData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_type: Option<RegistrationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub core: Option<CoreSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documents: Option<DocumentsSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contacts: Option<ContactsSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<AddressSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub athlete: Option<AthleteSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<OrganizationSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<TeamSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<PhotoSection>,
    /// Derived: a login account is created when the core email is valid
    #[serde(default)]
    pub create_user: bool,
}

impl UnifiedRegistrationFormData {
    pub fn has_section(&self, section: Section) -> bool {
        match section {
            Section::Core => self.core.is_some(),
            Section::Documents => self.documents.is_some(),
            Section::Contacts => self.contacts.is_some(),
            Section::Address => self.address.is_some(),
            Section::Athlete => self.athlete.is_some(),
            Section::Organization => self.organization.is_some(),
            Section::Team => self.team.is_some(),
            Section::Photo => self.photo.is_some(),
        }
    }

    pub fn email(&self) -> Option<&str> {
        self.core.as_ref().and_then(|core| core.email.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_registration_type_parsing() {
        assert_eq!("atleta".parse::<RegistrationType>(), Ok(RegistrationType::Atleta));
        assert_eq!(" dirigente ".parse::<RegistrationType>(), Ok(RegistrationType::Dirigente));
        assert!(matches!(
            "goleiro".parse::<RegistrationType>(),
            Err(FormError::UnknownRegistrationType(_))
        ));
        assert!(RegistrationType::Treinador.uses_team());
        assert!(!RegistrationType::Treinador.uses_athlete());
        assert!(!RegistrationType::Coordenador.uses_team());
    }

    #[test]
    fn test_empty_sections_are_omitted_from_payload() {
        let data = UnifiedRegistrationFormData {
            registration_type: Some(RegistrationType::Treinador),
            team: Some(TeamSection::default()),
            ..Default::default()
        };

        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(value["registration_type"], json!("treinador"));
        assert!(value["team"].is_object());
        assert!(value.get("athlete").is_none());
        assert_eq!(value["create_user"], json!(false));
    }
}
