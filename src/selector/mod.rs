//! Window selection
//!
//! [`Matcher`] turns a [`FilterSpec`] into compiled patterns once per
//! invocation and picks the matching windows out of the live window list.
//! The rendered KWin script applies the same rules inside the compositor,
//! but with JavaScript `RegExp` semantics: patterns the two dialects
//! disagree on (inline flags, lookaround) behave differently there.

mod cycler;

pub use cycler::{Action, activate_or_signal, decide};

use regex::{Regex, RegexBuilder};

use crate::core::filter::FilterSpec;
use crate::core::workspace::{WindowHandle, Workspace};

/// Compiled form of a [`FilterSpec`]
#[derive(Debug, Clone)]
pub struct Matcher {
    exact_class: Option<String>,
    class_regex: Option<Regex>,
    /// Only present when neither class filter is set
    caption: Option<Regex>,
    current_desktop_only: bool,
}

impl Matcher {
    pub fn compile(spec: &FilterSpec) -> Result<Self, regex::Error> {
        let class_regex = spec.class_regex().map(Regex::new).transpose()?;

        let caption = if spec.uses_caption() {
            let pattern = spec.caption_pattern().unwrap_or("");
            Some(RegexBuilder::new(pattern).case_insensitive(true).build()?)
        } else {
            None
        };

        Ok(Self {
            exact_class: spec.exact_class().map(str::to_string),
            class_regex,
            caption,
            current_desktop_only: spec.current_desktop_only,
        })
    }

    /// Filter criteria only, desktop restriction not applied
    pub fn matches(&self, window: &WindowHandle) -> bool {
        if self
            .exact_class
            .as_deref()
            .is_some_and(|class| window.resource_class == class)
        {
            return true;
        }

        if self
            .class_regex
            .as_ref()
            .is_some_and(|re| re.is_match(&window.resource_class))
        {
            return true;
        }

        self.caption
            .as_ref()
            .is_some_and(|re| re.is_match(&window.caption))
    }

    /// Build the MatchSet, preserving host enumeration order
    pub fn select<'a>(&self, windows: &'a [WindowHandle], current_desktop: Option<&str>) -> Vec<&'a WindowHandle> {
        windows
            .iter()
            .filter(|w| self.matches(w))
            .filter(|w| self.passes_desktop_filter(w, current_desktop))
            .collect()
    }

    pub fn select_in<'a, W: Workspace + ?Sized>(&self, workspace: &'a W) -> Vec<&'a WindowHandle> {
        self.select(workspace.windows(), workspace.current_desktop())
    }

    fn passes_desktop_filter(&self, window: &WindowHandle, current_desktop: Option<&str>) -> bool {
        if !self.current_desktop_only {
            return true;
        }
        // Fail open when the host cannot tell us the current desktop
        current_desktop.is_none_or(|desktop| window.is_on_desktop(desktop))
    }
}
