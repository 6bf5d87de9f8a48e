//! Organizations, teams and the links between people and them

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Club or federation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub acronym: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Team of an organization in a given category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub organization_id: i64,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub coach_id: Option<i64>,
}

/// A person's affiliation with an organization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    pub id: i64,
    pub person_id: i64,
    pub organization_id: i64,
    #[serde(default)]
    pub role_code: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

/// An athlete enrolled in a team for a season
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamRegistration {
    pub id: i64,
    pub team_id: i64,
    pub athlete_id: i64,
    #[serde(default)]
    pub season_id: Option<i64>,
    #[serde(default)]
    pub jersey_number: Option<u32>,
}
