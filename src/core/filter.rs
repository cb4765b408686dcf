//! Window filter specification
//!
//! A [`FilterSpec`] carries everything the caller wants to match for one
//! invocation. It is validated before any host interaction happens.

use thiserror::Error;

/// Returned when a filter cannot select anything meaningful
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("you need to specify a window filter (-f, -a, or -r)")]
    Missing,
}

/// Matching criteria for one invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    /// Resource class, compared exactly and case-sensitively
    pub exact_class: Option<String>,
    /// Caption regex, searched case-insensitively
    pub caption_pattern: Option<String>,
    /// Resource class regex, searched case-sensitively
    pub class_regex: Option<String>,
    /// Only consider windows on the current virtual desktop
    pub current_desktop_only: bool,
    /// Minimize the window again when it is already the active one
    pub toggle_on_active: bool,
}

impl FilterSpec {
    /// Build a filter from optional CLI values, dropping empty strings
    pub fn new(
        exact_class: Option<String>,
        caption_pattern: Option<String>,
        class_regex: Option<String>,
    ) -> Self {
        Self {
            exact_class: non_empty(exact_class),
            caption_pattern: non_empty(caption_pattern),
            class_regex: non_empty(class_regex),
            current_desktop_only: false,
            toggle_on_active: false,
        }
    }

    pub fn with_current_desktop_only(mut self, enabled: bool) -> Self {
        self.current_desktop_only = enabled;
        self
    }

    pub fn with_toggle_on_active(mut self, enabled: bool) -> Self {
        self.toggle_on_active = enabled;
        self
    }

    /// At least one of the three filters must be set
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.exact_class().is_none()
            && self.caption_pattern().is_none()
            && self.class_regex().is_none()
        {
            return Err(FilterError::Missing);
        }
        Ok(())
    }

    pub fn exact_class(&self) -> Option<&str> {
        self.exact_class.as_deref().filter(|s| !s.is_empty())
    }

    pub fn caption_pattern(&self) -> Option<&str> {
        self.caption_pattern.as_deref().filter(|s| !s.is_empty())
    }

    pub fn class_regex(&self) -> Option<&str> {
        self.class_regex.as_deref().filter(|s| !s.is_empty())
    }

    /// Caption matching only applies when neither class filter is set
    pub fn uses_caption(&self) -> bool {
        self.exact_class().is_none() && self.class_regex().is_none()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
