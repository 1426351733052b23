//! Form validation and submission engine
//!
//! Declarative field schemas, derived validity state, per-field error
//! surfacing and guarded async submission, plus password strength scoring.
//!
//! # Features
//!
//! - `async` (default): Enables cancellation-aware submission and debounced strength scoring
//! - `tracing`: Enables logging via tracing crate
//!
//! # Environment Variables
//!
//! - `FORM_VALIDATION_MODE`: `on_touch` (default) or `on_change`
//! - `FORM_SUBMIT_FALLBACK_MESSAGE`: message used when a submit handler fails silently
//! - `FORM_SCHEMA_PATH`: schema file read by [`load_schema`]
//!   (default: `./assets/form-schema.json`)
//!
//! # Example
//!
//! ```rust,no_run
//! use form_engine::{forms, score_password};
//!
//! # async fn run() {
//! let form = forms::register();
//! form.set_value("name", "Ada Lovelace").unwrap();
//! form.set_value("email", "ada@example.com").unwrap();
//! form.set_value("password", "Abc12345").unwrap();
//! form.set_value("confirmPassword", "Abc12345").unwrap();
//! form.set_touched("confirmPassword").unwrap();
//!
//! println!("Strength: {}", score_password("Abc12345").label);
//!
//! let outcome = form
//!     .submit(|values| async move {
//!         // hand the payload to the auth client here
//!         Ok::<_, String>(values.pick(&["name", "email", "password"]))
//!     })
//!     .await;
//! println!("{:?}", outcome);
//! # }
//! ```

mod config;
mod error;
mod loader;
mod rules;
mod schema;
mod sections;
mod store;
mod strength;
mod submit;
mod values;

pub mod forms;

// Public API
pub use config::{FormOptions, ValidationMode, DEFAULT_FALLBACK_ERROR};
pub use error::{FormError, SchemaError, SubmitError};
pub use loader::{get_schema_path, load_schema, load_schema_from_path};
pub use rules::{evaluate, Pattern, RuleResult, Validator};
pub use schema::{validate, FieldErrors, FieldRule, FormSchema};
pub use store::{FormState, FormStore};
pub use strength::{
    evaluate_password_strength, score_password, PasswordStrengthResult, Severity,
    StrengthLevel,
};
pub use submit::SubmitOutcome;
pub use values::FormValues;

#[cfg(feature = "async")]
pub use strength::score_password_tx;
