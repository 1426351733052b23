//! Form state store - single source of truth for one form instance.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::{FormOptions, ValidationMode};
use crate::error::{FormError, SubmitError};
use crate::schema::{FieldErrors, FormSchema};
use crate::values::FormValues;

/// Snapshot of a form.
///
/// `is_valid` and `is_dirty` are derived and recomputed together with
/// every mutation, so a snapshot is always self-consistent. `is_valid`
/// reflects the current values even while `errors` is still hidden.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormState {
    pub values: FormValues,
    pub touched: BTreeSet<String>,
    pub errors: FieldErrors,
    pub is_submitting: bool,
    pub submit_count: u32,
    pub is_valid: bool,
    pub is_dirty: bool,
}

impl FormState {
    pub fn submit_attempted(&self) -> bool {
        self.submit_count > 0
    }

    /// Error to display next to `field`.
    ///
    /// Hidden until the field is touched or a submit was attempted.
    pub fn visible_error(&self, field: &str) -> Option<&str> {
        if !self.touched.contains(field) && !self.submit_attempted() {
            return None;
        }
        self.errors.get(field).map(String::as_str)
    }

    pub fn visible_errors(&self) -> FieldErrors {
        self.errors
            .iter()
            .filter(|(field, _)| self.visible_error(field).is_some())
            .map(|(f, m)| (f.clone(), m.clone()))
            .collect()
    }
}

struct Inner {
    state: FormState,
    initial: FormValues,
    /// Ticket of the submission currently holding `is_submitting`.
    in_flight: Option<u64>,
    next_ticket: u64,
}

impl Inner {
    fn settle(&mut self, schema: &FormSchema) {
        let values = &self.state.values;
        self.state.is_valid = schema.validate(values).is_empty() && schema.required_filled(values);
        self.state.is_dirty = self.state.values != self.initial;
    }

    fn restore(&mut self, schema: &FormSchema) {
        self.state = FormState {
            values: self.initial.clone(),
            ..FormState::default()
        };
        self.in_flight = None;
        self.settle(schema);
    }
}

/// Holds values, touched flags and derived errors of one form.
///
/// Every operation takes the store's lock once, so a value change and the
/// error recomputation it triggers are observed together.
pub struct FormStore {
    schema: Arc<FormSchema>,
    options: FormOptions,
    inner: Mutex<Inner>,
}

impl FormStore {
    /// Creates a store whose initial values are all empty.
    pub fn new(schema: Arc<FormSchema>, options: FormOptions) -> Self {
        Self::with_initial(schema, FormValues::new(), options)
    }

    /// Creates a store with the given initial values; fields left out start empty.
    /// Values for fields outside the schema are dropped.
    pub fn with_initial(schema: Arc<FormSchema>, initial: FormValues, options: FormOptions) -> Self {
        let initial = merge_initial(&schema, initial);
        let mut inner = Inner {
            state: FormState {
                values: initial.clone(),
                ..FormState::default()
            },
            initial,
            in_flight: None,
            next_ticket: 0,
        };
        inner.settle(&schema);
        Self {
            schema,
            options,
            inner: Mutex::new(inner),
        }
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_field(&self, field: &str) -> Result<(), FormError> {
        if self.schema.contains(field) {
            Ok(())
        } else {
            Err(FormError::UnknownField(field.to_string()))
        }
    }

    /// Updates one value.
    ///
    /// The whole form is re-validated when the field was touched, a submit
    /// was attempted, or the form validates on change. Otherwise errors that
    /// no longer hold are dropped but no new error appears.
    pub fn set_value(&self, field: &str, value: impl Into<String>) -> Result<(), FormError> {
        self.ensure_field(field)?;
        let mut inner = self.lock();
        inner.state.values.insert(field, value);

        let fresh = self.schema.validate(&inner.state.values);
        let eligible = self.options.validation_mode == ValidationMode::OnChange
            || inner.state.touched.contains(field)
            || inner.state.submit_attempted();
        if eligible {
            inner.state.errors = fresh;
        } else {
            let stale = std::mem::take(&mut inner.state.errors);
            inner.state.errors = fresh
                .into_iter()
                .filter(|(f, _)| stale.contains_key(f))
                .collect();
        }
        inner.settle(&self.schema);

        #[cfg(feature = "tracing")]
        tracing::debug!(field, revalidated = eligible, "form value changed");

        Ok(())
    }

    /// Marks `field` touched and re-validates the whole form.
    pub fn set_touched(&self, field: &str) -> Result<(), FormError> {
        self.ensure_field(field)?;
        let mut inner = self.lock();
        inner.state.touched.insert(field.to_string());
        inner.state.errors = self.schema.validate(&inner.state.values);
        inner.settle(&self.schema);

        #[cfg(feature = "tracing")]
        tracing::debug!(field, errors = inner.state.errors.len(), "form field touched");

        Ok(())
    }

    pub fn state(&self) -> FormState {
        self.lock().state.clone()
    }

    pub fn values(&self) -> FormValues {
        self.lock().state.values.clone()
    }

    pub fn is_valid(&self) -> bool {
        self.lock().state.is_valid
    }

    pub fn is_dirty(&self) -> bool {
        self.lock().state.is_dirty
    }

    pub fn is_submitting(&self) -> bool {
        self.lock().state.is_submitting
    }

    pub fn visible_error(&self, field: &str) -> Option<String> {
        self.lock().state.visible_error(field).map(str::to_string)
    }

    /// Whether the submit button is enabled.
    pub fn can_submit(&self) -> bool {
        let inner = self.lock();
        let state = &inner.state;
        !state.is_submitting && state.is_valid && (!self.options.require_dirty || state.is_dirty)
    }

    /// Restores the form.
    ///
    /// With `Some(values)` those become both the current values and the new
    /// initial snapshot; with `None` the existing snapshot is restored.
    /// A submission still in flight no longer owns the submitting flag.
    pub fn reset(&self, values: Option<FormValues>) {
        let mut inner = self.lock();
        if let Some(values) = values {
            inner.initial = merge_initial(&self.schema, values);
        }
        inner.restore(&self.schema);

        #[cfg(feature = "tracing")]
        tracing::debug!("form reset");
    }

    /// Touches every field, counts the attempt and validates.
    ///
    /// # Returns
    /// - `Ok((ticket, values))` with the submission flag raised
    /// - `Err(Busy)` if a submission is already in flight
    /// - `Err(ValidationFailed)` if any field fails
    pub(crate) fn begin_submit(&self) -> Result<(u64, FormValues), SubmitError> {
        let mut inner = self.lock();
        let fields: Vec<String> = self.schema.field_names().map(str::to_string).collect();
        inner.state.touched.extend(fields);
        inner.state.submit_count += 1;
        inner.state.errors = self.schema.validate(&inner.state.values);
        inner.settle(&self.schema);

        if inner.state.is_submitting {
            return Err(SubmitError::Busy);
        }
        if !inner.state.errors.is_empty() {
            return Err(SubmitError::ValidationFailed(inner.state.errors.clone()));
        }

        let ticket = inner.next_ticket;
        inner.next_ticket += 1;
        inner.in_flight = Some(ticket);
        inner.state.is_submitting = true;
        Ok((ticket, inner.state.values.clone()))
    }

    /// Lowers the submission flag; resets the form too when `reset` is set.
    ///
    /// Does nothing unless `ticket` still owns the flag, i.e. the form was
    /// not reset and resubmitted while that submission was in flight.
    pub(crate) fn end_submit(&self, ticket: u64, reset: bool) {
        let mut inner = self.lock();
        if inner.in_flight != Some(ticket) {
            #[cfg(feature = "tracing")]
            tracing::debug!(ticket, "stale submission finished");
            return;
        }
        if reset {
            inner.restore(&self.schema);
            return;
        }
        inner.in_flight = None;
        inner.state.is_submitting = false;
    }
}

fn merge_initial(schema: &FormSchema, values: FormValues) -> FormValues {
    let mut merged = schema.empty_values();
    for (field, value) in values.iter() {
        if schema.contains(field) {
            merged.insert(field, value);
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldRule;

    fn login_like() -> Arc<FormSchema> {
        Arc::new(
            FormSchema::new(vec![
                FieldRule::new("email")
                    .required("Email is required")
                    .email("Please enter a valid email"),
                FieldRule::new("password")
                    .required("Password is required")
                    .min_length(6, "Password must be at least 6 characters"),
                FieldRule::new("nickname"),
            ])
            .unwrap(),
        )
    }

    fn store() -> FormStore {
        FormStore::new(login_like(), FormOptions::default())
    }

    #[test]
    fn test_new_store_is_pristine() {
        let state = store().state();
        assert!(state.errors.is_empty());
        assert!(state.touched.is_empty());
        assert!(!state.is_dirty);
        assert!(!state.is_valid, "required fields are empty");
        assert_eq!(state.values.get("email"), "");
        assert_eq!(state.values.len(), 3);
    }

    #[test]
    fn test_no_error_before_touch() {
        let store = store();
        store.set_value("email", "not-an-email").unwrap();
        let state = store.state();
        assert!(state.errors.is_empty());
        assert_eq!(state.visible_error("email"), None);
        assert!(state.is_dirty);
    }

    #[test]
    fn test_touch_reveals_error_and_edit_clears_it() {
        let store = store();
        store.set_value("email", "not-an-email").unwrap();
        store.set_touched("email").unwrap();
        assert_eq!(
            store.visible_error("email").as_deref(),
            Some("Please enter a valid email")
        );

        store.set_value("email", "a@b.com").unwrap();
        assert_eq!(store.visible_error("email"), None);
    }

    #[test]
    fn test_touch_validates_whole_form_but_hides_untouched() {
        let store = store();
        store.set_touched("email").unwrap();
        let state = store.state();
        assert!(state.errors.contains_key("password"));
        assert_eq!(state.visible_error("password"), None);
        assert_eq!(state.visible_error("email"), Some("Email is required"));
        assert_eq!(state.visible_errors().len(), 1);
    }

    #[test]
    fn test_untouched_edit_only_drops_errors() {
        let store = store();
        store.set_touched("email").unwrap();
        assert!(store.state().errors.contains_key("password"));

        // still failing: keeps existing entry
        store.set_value("password", "abc").unwrap();
        assert_eq!(
            store.state().errors.get("password").map(String::as_str),
            Some("Password must be at least 6 characters")
        );

        store.set_value("password", "abcdef").unwrap();
        assert!(!store.state().errors.contains_key("password"));
    }

    #[test]
    fn test_on_change_mode_validates_immediately() {
        let store = FormStore::new(
            login_like(),
            FormOptions::default().validation_mode(ValidationMode::OnChange),
        );
        store.set_value("email", "nope").unwrap();
        let state = store.state();
        assert!(state.errors.contains_key("email"));
        // still hidden until touched
        assert_eq!(state.visible_error("email"), None);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let store = store();
        assert_eq!(
            store.set_value("age", "3"),
            Err(FormError::UnknownField("age".to_string()))
        );
        assert!(store.set_touched("age").is_err());
        assert!(!store.values().contains("age"));
    }

    #[test]
    fn test_untouched_invalid_value_keeps_form_invalid() {
        let store = store();
        store.set_value("email", "not-an-email").unwrap();
        store.set_value("password", "secret1").unwrap();

        let state = store.state();
        assert!(state.errors.is_empty(), "nothing shown yet");
        assert!(!state.is_valid);
        assert!(!store.can_submit());

        store.set_value("email", "a@b.com").unwrap();
        assert!(store.is_valid());
        assert!(store.can_submit());
    }

    #[test]
    fn test_validity_and_dirty_flags() {
        let store = store();
        store.set_value("email", "a@b.com").unwrap();
        store.set_value("password", "secret1").unwrap();
        assert!(store.is_valid());
        assert!(store.is_dirty());
        assert!(store.can_submit());

        store.set_value("email", "").unwrap();
        store.set_value("password", "").unwrap();
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_can_submit_respects_require_dirty() {
        let initial = FormValues::from([("email", "a@b.com"), ("password", "secret1")]);
        let lenient = FormStore::with_initial(login_like(), initial.clone(), FormOptions::default());
        assert!(lenient.can_submit());

        let strict = FormStore::with_initial(
            login_like(),
            initial,
            FormOptions::default().require_dirty(true),
        );
        assert!(!strict.can_submit());
        strict.set_value("password", "secret2").unwrap();
        assert!(strict.can_submit());
    }

    #[test]
    fn test_reset_to_snapshot_and_to_new_values() {
        let store = store();
        store.set_value("email", "x").unwrap();
        store.set_touched("email").unwrap();

        store.reset(None);
        let state = store.state();
        assert_eq!(state.values, login_like().empty_values());
        assert!(state.touched.is_empty());
        assert!(state.errors.is_empty());
        assert!(!state.is_dirty);

        store.reset(Some(FormValues::from([("email", "a@b.com"), ("bogus", "1")])));
        let state = store.state();
        assert_eq!(state.values.get("email"), "a@b.com");
        assert!(!state.values.contains("bogus"));
        assert!(!state.is_dirty, "reset values become the new snapshot");
    }

    #[test]
    fn test_begin_submit_touches_everything() {
        let store = store();
        let result = store.begin_submit();
        assert!(matches!(result, Err(SubmitError::ValidationFailed(ref e)) if e.len() == 2));
        let state = store.state();
        assert_eq!(state.touched.len(), 3);
        assert_eq!(state.submit_count, 1);
        assert_eq!(state.visible_error("password"), Some("Password is required"));
        assert!(!state.is_submitting);
    }

    #[test]
    fn test_edit_after_submit_attempt_revalidates() {
        let store = store();
        let _ = store.begin_submit();
        store.reset(None);
        store.set_value("email", "bad").unwrap();
        assert!(store.state().errors.is_empty(), "reset clears the attempt");

        let _ = store.begin_submit();
        store.set_value("email", "still bad").unwrap();
        assert!(store.state().errors.contains_key("email"));
    }

    #[test]
    fn test_stale_submission_does_not_release_newer_one() {
        let store = store();
        store.set_value("email", "a@b.com").unwrap();
        store.set_value("password", "secret1").unwrap();
        let (first, _) = store.begin_submit().unwrap();

        store.reset(None);
        assert!(!store.is_submitting());
        store.set_value("email", "b@c.com").unwrap();
        store.set_value("password", "secret2").unwrap();
        let (second, _) = store.begin_submit().unwrap();
        assert_ne!(first, second);

        store.end_submit(first, true);
        assert!(store.is_submitting());
        assert_eq!(store.values().get("email"), "b@c.com");
        assert_eq!(store.begin_submit(), Err(SubmitError::Busy));

        store.end_submit(second, false);
        assert!(!store.is_submitting());
    }
}
