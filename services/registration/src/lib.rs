//! Unified registration form engine
//!
//! One form registers a person and, depending on the registration type, the
//! athlete, staff, team and organization records attached to them.
//!
//! ```
//! use registration::{Field, RegistrationForm, RegistrationType};
//!
//! let mut form = RegistrationForm::new();
//! form.set_registration_type(RegistrationType::Atleta);
//! form.update_nested_field("athlete.main_defensive_position_id", 5).unwrap();
//!
//! assert!(form.is_goalkeeper());
//! assert!(form.update_field(Field::MainOffensivePosition, 3).is_err());
//! ```

pub mod error;
pub mod fields;
pub mod form;
pub mod models;
pub mod rules;
pub mod submit;

pub use error::{FormError, SubmitError};
pub use fields::{Field, FieldKind, FieldValue};
pub use form::RegistrationForm;
pub use models::{RegistrationType, Section, UnifiedRegistrationFormData};
pub use submit::{RegistrationResult, submit};
