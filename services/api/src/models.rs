//! API models for request and response payloads

use serde::{Deserialize, Serialize};

pub mod club;
pub mod people;
pub mod reference;

pub use club::{Membership, Organization, Team, TeamRegistration};
pub use people::{Athlete, Person, Staff, User};
pub use reference::{Category, Position, SchoolingLevel, Season};

/// Paginated list envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub size: Option<u32>,
}

/// List payloads come either as a bare array or wrapped in a page envelope
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Items(Vec<T>),
    Page(Page<T>),
}

impl<T> ListResponse<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            ListResponse::Items(items) => items,
            ListResponse::Page(page) => page.items,
        }
    }
}

/// Generic creation acknowledgement carrying the new record id
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Created {
    pub id: i64,
}
