//! Built-in forms: login, registration and contact.
//!
//! Schemas are built once and shared; every call to [`login`], [`register`]
//! or [`contact`] creates a fresh store for one form mount.

use std::sync::{Arc, LazyLock};

use crate::config::FormOptions;
use crate::error::SchemaError;
use crate::rules::Pattern;
use crate::schema::{FieldRule, FormSchema};
use crate::store::FormStore;

pub const LOGIN_FALLBACK_ERROR: &str = "Login failed. Please try again.";
pub const REGISTER_FALLBACK_ERROR: &str = "Registration failed. Please try again.";
pub const CONTACT_FALLBACK_ERROR: &str = "Failed to send message. Please try again.";

static LOGIN_SCHEMA: LazyLock<Arc<FormSchema>> =
    LazyLock::new(|| Arc::new(build_login().expect("login schema is well-formed")));

static REGISTER_SCHEMA: LazyLock<Arc<FormSchema>> =
    LazyLock::new(|| Arc::new(build_register().expect("register schema is well-formed")));

static CONTACT_SCHEMA: LazyLock<Arc<FormSchema>> =
    LazyLock::new(|| Arc::new(build_contact().expect("contact schema is well-formed")));

fn build_login() -> Result<FormSchema, SchemaError> {
    FormSchema::new(vec![
        FieldRule::new("email")
            .required("Email is required")
            .email("Please enter a valid email"),
        FieldRule::new("password")
            .required("Password is required")
            .min_length(6, "Password must be at least 6 characters"),
    ])
}

fn build_register() -> Result<FormSchema, SchemaError> {
    FormSchema::new(vec![
        FieldRule::new("name")
            .required("Full name is required")
            .min_length(2, "Name must be at least 2 characters")
            .max_length(50, "Name must be less than 50 characters"),
        FieldRule::new("email")
            .required("Email is required")
            .email("Invalid email address"),
        FieldRule::new("password")
            .required("Password is required")
            .min_length(8, "Password must be at least 8 characters")
            .max_length(50, "Password must be less than 50 characters")
            .pattern(
                Pattern::all_of(["[a-z]", "[A-Z]", "[0-9]"])?,
                "Password must contain at least one uppercase, one lowercase letter and one number",
            ),
        FieldRule::new("confirmPassword")
            .required("Please confirm your password")
            .equals_field("password", "Passwords must match"),
    ])
}

fn build_contact() -> Result<FormSchema, SchemaError> {
    FormSchema::new(vec![
        FieldRule::new("name")
            .required("Name is required")
            .min_length(2, "Name must be at least 2 characters"),
        FieldRule::new("email")
            .required("Email is required")
            .email("Invalid email address"),
        FieldRule::new("subject")
            .required("Subject is required")
            .min_length(5, "Subject must be at least 5 characters"),
        FieldRule::new("message")
            .required("Message is required")
            .min_length(10, "Message must be at least 10 characters"),
        FieldRule::new("phone")
            .nullable()
            .pattern(Pattern::new("^[0-9]{10,15}$")?, "Phone number must be 10-15 digits"),
    ])
}

pub fn login_schema() -> Arc<FormSchema> {
    Arc::clone(&LOGIN_SCHEMA)
}

pub fn register_schema() -> Arc<FormSchema> {
    Arc::clone(&REGISTER_SCHEMA)
}

pub fn contact_schema() -> Arc<FormSchema> {
    Arc::clone(&CONTACT_SCHEMA)
}

/// Login form: submittable only once edited.
pub fn login() -> FormStore {
    let options = FormOptions::from_env()
        .require_dirty(true)
        .fallback_error(LOGIN_FALLBACK_ERROR);
    FormStore::new(login_schema(), options)
}

/// Registration form: submittable only once edited.
pub fn register() -> FormStore {
    let options = FormOptions::from_env()
        .require_dirty(true)
        .fallback_error(REGISTER_FALLBACK_ERROR);
    FormStore::new(register_schema(), options)
}

/// Contact form: cleared after the message is sent.
pub fn contact() -> FormStore {
    let options = FormOptions::from_env()
        .reset_on_success(true)
        .fallback_error(CONTACT_FALLBACK_ERROR);
    FormStore::new(contact_schema(), options)
}
