//! Reference data used to populate the registration form

use common::ApiResult;
use serde::Serialize;
use tracing::warn;

use crate::{
    client::ApiClient,
    models::{Category, Position, SchoolingLevel, Season, Team},
    resources::paths,
};

/// The season currently open for registrations, or `None` when there is none
/// or the backend could not be reached. Errors are logged and swallowed: the
/// callers render a "no active season" state rather than an error banner.
pub async fn active_season(client: &ApiClient) -> Option<Season> {
    let path = format!("{}/active", paths::SEASONS);

    match client.get_json::<Option<Season>>(&path, &[]).await {
        Ok(season) => season,
        Err(e) => {
            warn!("Failed to fetch active season: {}", e);
            None
        }
    }
}

/// Every reference list the registration form offers as choices
#[derive(Debug, Clone, Serialize)]
pub struct Lookups {
    pub categories: Vec<Category>,
    pub defensive_positions: Vec<Position>,
    pub offensive_positions: Vec<Position>,
    pub schooling_levels: Vec<SchoolingLevel>,
    pub seasons: Vec<Season>,
    pub teams: Vec<Team>,
}

impl Lookups {
    /// Fetch all lists concurrently; each one goes through the lookup cache
    pub async fn load(client: &ApiClient) -> ApiResult<Self> {
        let categories = client.categories();
        let defensive_positions = client.defensive_positions();
        let offensive_positions = client.offensive_positions();
        let schooling_levels = client.schooling_levels();
        let seasons = client.seasons();
        let teams = client.teams();

        let (
            categories,
            defensive_positions,
            offensive_positions,
            schooling_levels,
            seasons,
            teams,
        ) = tokio::try_join!(
            categories.list(&[]),
            defensive_positions.list(&[]),
            offensive_positions.list(&[]),
            schooling_levels.list(&[]),
            seasons.list(&[]),
            teams.list(&[]),
        )?;

        Ok(Self {
            categories,
            defensive_positions,
            offensive_positions,
            schooling_levels,
            seasons,
            teams,
        })
    }
}
