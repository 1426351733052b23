//! Per-form behavior options.

/// Generic message shown when a submit handler fails without one.
pub const DEFAULT_FALLBACK_ERROR: &str = "Something went wrong. Please try again.";

/// When value changes trigger a full re-validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Only after the field was touched or a submit was attempted.
    #[default]
    OnTouch,
    /// On every change.
    OnChange,
}

impl ValidationMode {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "on_touch" | "touch" | "lazy" => Some(ValidationMode::OnTouch),
            "on_change" | "change" | "eager" => Some(ValidationMode::OnChange),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormOptions {
    pub validation_mode: ValidationMode,
    /// Keep the submit button disabled while the form is pristine.
    pub require_dirty: bool,
    /// Restore the initial snapshot after a successful submit.
    pub reset_on_success: bool,
    pub fallback_error: String,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            validation_mode: ValidationMode::default(),
            require_dirty: false,
            reset_on_success: false,
            fallback_error: DEFAULT_FALLBACK_ERROR.to_string(),
        }
    }
}

impl FormOptions {
    /// Defaults overridden by the environment.
    ///
    /// # Environment Variables
    ///
    /// - `FORM_VALIDATION_MODE`: `on_touch` (default) or `on_change`
    /// - `FORM_SUBMIT_FALLBACK_MESSAGE`: generic submit failure message
    pub fn from_env() -> Self {
        let mut options = Self::default();

        if let Ok(raw) = std::env::var("FORM_VALIDATION_MODE") {
            match ValidationMode::parse(&raw) {
                Some(mode) => options.validation_mode = mode,
                None => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!("Unknown FORM_VALIDATION_MODE {:?}, keeping on_touch", raw);
                }
            }
        }

        if let Ok(message) = std::env::var("FORM_SUBMIT_FALLBACK_MESSAGE") {
            if !message.trim().is_empty() {
                options.fallback_error = message;
            }
        }

        options
    }

    pub fn validation_mode(mut self, mode: ValidationMode) -> Self {
        self.validation_mode = mode;
        self
    }

    pub fn require_dirty(mut self, yes: bool) -> Self {
        self.require_dirty = yes;
        self
    }

    pub fn reset_on_success(mut self, yes: bool) -> Self {
        self.reset_on_success = yes;
        self
    }

    pub fn fallback_error(mut self, message: impl Into<String>) -> Self {
        self.fallback_error = message.into();
        self
    }
}
