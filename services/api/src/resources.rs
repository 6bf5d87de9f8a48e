//! Typed CRUD bindings for the backend resources

use common::ApiResult;
use serde::{Serialize, de::DeserializeOwned};
use std::marker::PhantomData;

use crate::{
    client::ApiClient,
    models::{
        Athlete, Category, ListResponse, Membership, Organization, Person, Position,
        SchoolingLevel, Season, Staff, Team, TeamRegistration, User,
    },
};

/// Backend resource paths
pub mod paths {
    pub const ORGANIZATIONS: &str = "/organizations";
    pub const TEAMS: &str = "/teams";
    pub const ATHLETES: &str = "/athletes";
    pub const MEMBERSHIPS: &str = "/memberships";
    pub const TEAM_REGISTRATIONS: &str = "/team-registrations";
    pub const SEASONS: &str = "/seasons";
    pub const CATEGORIES: &str = "/categories";
    pub const DEFENSIVE_POSITIONS: &str = "/defensive-positions";
    pub const OFFENSIVE_POSITIONS: &str = "/offensive-positions";
    pub const SCHOOLING_LEVELS: &str = "/schooling-levels";
    pub const PERSONS: &str = "/persons";
    pub const USERS: &str = "/users";
    pub const STAFF: &str = "/staff";
}

/// One backend collection bound to a path prefix
pub struct Resource<'a, T> {
    client: &'a ApiClient,
    path: &'static str,
    _marker: PhantomData<T>,
}

impl<'a, T: DeserializeOwned> Resource<'a, T> {
    pub fn new(client: &'a ApiClient, path: &'static str) -> Self {
        Self {
            client,
            path,
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    /// List records, optionally filtered by query parameters
    pub async fn list(&self, params: &[(&str, &str)]) -> ApiResult<Vec<T>> {
        let response: ListResponse<T> = self.client.get_json(self.path, params).await?;
        Ok(response.into_items())
    }

    pub async fn get(&self, id: i64) -> ApiResult<T> {
        self.client.get_json(&self.item_path(id), &[]).await
    }

    pub async fn create<B: Serialize + ?Sized>(&self, body: &B) -> ApiResult<T> {
        self.client.post_json(self.path, body).await
    }

    pub async fn update<B: Serialize + ?Sized>(&self, id: i64, body: &B) -> ApiResult<T> {
        self.client.patch_json(&self.item_path(id), body).await
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        self.client.delete(&self.item_path(id)).await?;
        Ok(())
    }

    fn item_path(&self, id: i64) -> String {
        format!("{}/{}", self.path, id)
    }
}

impl ApiClient {
    pub fn organizations(&self) -> Resource<'_, Organization> {
        Resource::new(self, paths::ORGANIZATIONS)
    }

    pub fn teams(&self) -> Resource<'_, Team> {
        Resource::new(self, paths::TEAMS)
    }

    pub fn athletes(&self) -> Resource<'_, Athlete> {
        Resource::new(self, paths::ATHLETES)
    }

    pub fn memberships(&self) -> Resource<'_, Membership> {
        Resource::new(self, paths::MEMBERSHIPS)
    }

    pub fn team_registrations(&self) -> Resource<'_, TeamRegistration> {
        Resource::new(self, paths::TEAM_REGISTRATIONS)
    }

    pub fn seasons(&self) -> Resource<'_, Season> {
        Resource::new(self, paths::SEASONS)
    }

    pub fn categories(&self) -> Resource<'_, Category> {
        Resource::new(self, paths::CATEGORIES)
    }

    pub fn defensive_positions(&self) -> Resource<'_, Position> {
        Resource::new(self, paths::DEFENSIVE_POSITIONS)
    }

    pub fn offensive_positions(&self) -> Resource<'_, Position> {
        Resource::new(self, paths::OFFENSIVE_POSITIONS)
    }

    pub fn schooling_levels(&self) -> Resource<'_, SchoolingLevel> {
        Resource::new(self, paths::SCHOOLING_LEVELS)
    }

    pub fn persons(&self) -> Resource<'_, Person> {
        Resource::new(self, paths::PERSONS)
    }

    pub fn users(&self) -> Resource<'_, User> {
        Resource::new(self, paths::USERS)
    }

    pub fn staff(&self) -> Resource<'_, Staff> {
        Resource::new(self, paths::STAFF)
    }
}
