//! KWin script generation
//!
//! The selector and cycler run inside KWin as JavaScript. The script is
//! produced from a fixed template and a typed [`ScriptParams`]: string
//! values go through [`escape_js_string`] and booleans are emitted as
//! literals. Substitution is a single pass over the template, so a value
//! that itself looks like a placeholder is never expanded.

mod escape;

pub use escape::escape_js_string;

use std::io::Write;

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::backend::listener::{LISTENER_INTERFACE, LISTENER_METHOD, LISTENER_PATH};
use crate::core::filter::FilterSpec;

const TEMPLATE: &str = include_str!("activate.js");

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unknown placeholder `{0}` in script template")]
    UnknownPlaceholder(String),
    #[error("unterminated placeholder in script template")]
    Unterminated,
}

/// Everything substituted into the script template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptParams {
    pub class_name: String,
    pub caption_pattern: String,
    pub class_regex: String,
    pub toggle: bool,
    pub current_desktop_only: bool,
    /// Unique bus name of this process, empty when no callback is wanted
    pub callback_address: String,
}

impl ScriptParams {
    pub fn new(filter: &FilterSpec, callback_address: Option<&str>) -> Self {
        Self {
            class_name: filter.exact_class().unwrap_or_default().to_string(),
            caption_pattern: filter.caption_pattern().unwrap_or_default().to_string(),
            class_regex: filter.class_regex().unwrap_or_default().to_string(),
            toggle: filter.toggle_on_active,
            current_desktop_only: filter.current_desktop_only,
            callback_address: callback_address.unwrap_or_default().to_string(),
        }
    }

    fn lookup(&self, name: &str) -> Option<String> {
        let value = match name {
            "class_name" => escape_js_string(&self.class_name),
            "caption_pattern" => escape_js_string(&self.caption_pattern),
            "class_regex" => escape_js_string(&self.class_regex),
            "callback_address" => escape_js_string(&self.callback_address),
            "toggle" => bool_literal(self.toggle).to_string(),
            "current_desktop_only" => bool_literal(self.current_desktop_only).to_string(),
            "listener_path" => escape_js_string(LISTENER_PATH),
            "listener_interface" => escape_js_string(LISTENER_INTERFACE),
            "listener_method" => escape_js_string(LISTENER_METHOD),
            _ => return None,
        };
        Some(value)
    }
}

fn bool_literal(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// Render the activation script for `params`
pub fn render(params: &ScriptParams) -> Result<String, RenderError> {
    render_template(TEMPLATE, params)
}

fn render_template(template: &str, params: &ScriptParams) -> Result<String, RenderError> {
    let mut out = String::with_capacity(template.len() + 256);
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after.find("}}").ok_or(RenderError::Unterminated)?;
        let name = after[..end].trim();
        let value = params
            .lookup(name)
            .ok_or_else(|| RenderError::UnknownPlaceholder(name.to_string()))?;
        out.push_str(&value);
        rest = &after[end + 2..];
    }
    out.push_str(rest);

    Ok(out)
}

/// Write `source` to a private, uniquely named temp file.
///
/// The file is removed when the returned handle is dropped.
pub fn persist(source: &str) -> std::io::Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("kwinjump-")
        .suffix(".js")
        .tempfile()?;
    file.write_all(source.as_bytes())?;
    file.flush()?;
    Ok(file)
}
