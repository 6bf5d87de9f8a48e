//! Sending a completed form to the backend

use api::ApiClient;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::SubmitError;
use crate::form::RegistrationForm;

pub const UNIFIED_REGISTRATION_PATH: &str = "/registrations/unified";

/// Records created by a unified registration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationResult {
    pub person_id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub athlete_id: Option<i64>,
    #[serde(default)]
    pub staff_id: Option<i64>,
    #[serde(default)]
    pub membership_id: Option<i64>,
    #[serde(default)]
    pub team_registration_id: Option<i64>,
}

/// Validate and submit `form`.
///
/// Every field is marked touched first so the caller can show all errors.
/// Nothing is sent while the form has errors or no registration type.
pub async fn submit(
    form: &mut RegistrationForm,
    client: &ApiClient,
) -> Result<RegistrationResult, SubmitError> {
    form.touch_all();

    let errors = form.errors();
    if !errors.is_empty() {
        warn!("Registration not submitted: {} invalid field(s)", errors.len());
        return Err(SubmitError::Invalid(errors));
    }

    let Some(registration_type) = form.registration_type() else {
        return Err(SubmitError::MissingRegistrationType);
    };

    let result: RegistrationResult = client
        .post_json(UNIFIED_REGISTRATION_PATH, form.data())
        .await?;

    info!(
        "Registered person {} as {} (user created: {})",
        result.person_id,
        registration_type,
        result.user_id.is_some()
    );
    Ok(result)
}
