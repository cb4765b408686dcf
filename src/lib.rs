//! kwinjump - jump to, cycle through or launch KWin windows
//!
//! This library backs a small command meant to sit behind a keyboard
//! shortcut: activate the window matching a filter, cycle through the
//! matching windows on repeated presses, or launch a fallback command
//! when nothing matches.
//!
//! ## How it works
//!
//! - A KWin script is rendered from the filter and loaded over D-Bus
//! - The script selects and focuses windows inside the compositor
//! - When a fallback command is configured, the script calls back with a
//!   single "no match" / "handled" decision
//! - The script is always stopped again before the process exits

pub mod backend;
pub mod cli;
pub mod core;
pub mod decision;
pub mod error;
pub mod launch;
pub mod orchestrator;
pub mod script;
pub mod selector;
