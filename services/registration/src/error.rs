//! Form mutation and submission errors

use common::ApiError;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::models::Section;

/// Why a field write was refused
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Unknown section: {0}")]
    UnknownSection(String),

    #[error("Unknown registration type: {0}")]
    UnknownRegistrationType(String),

    #[error("The {0} section is not active for the selected registration type")]
    SectionInactive(Section),

    #[error("Invalid value for {path}: expected {expected}")]
    InvalidValue { path: String, expected: &'static str },

    #[error("Goalkeepers cannot have an offensive position")]
    GoalkeeperOffensivePosition,
}

#[derive(Error, Debug)]
pub enum SubmitError {
    /// Local validation failed; errors keyed by dotted path
    #[error("The form has {} invalid field(s)", .0.len())]
    Invalid(BTreeMap<String, String>),

    #[error("Select a registration type before saving")]
    MissingRegistrationType,

    #[error(transparent)]
    Api(#[from] ApiError),
}
