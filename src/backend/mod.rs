//! Script host abstraction
//!
//! This module provides the interface the orchestrator drives to install,
//! run and stop a script inside the compositor, with a D-Bus
//! implementation for KWin.

mod kwin;
pub mod listener;

pub use kwin::KWinHost;

use async_trait::async_trait;
use std::fmt;
use std::path::Path;
use thiserror::Error;

use crate::decision::DecisionSender;

/// Identifier KWin assigns to a loaded script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScriptId(pub i32);

impl ScriptId {
    /// Object path of the loaded script instance
    pub fn object_path(&self) -> String {
        format!("/Scripting/Script{}", self.0)
    }
}

impl fmt::Display for ScriptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Failure of a single host call
#[derive(Debug, Error)]
pub enum HostError {
    #[error("D-Bus error: {0}")]
    DBus(#[from] zbus::Error),

    #[error("invalid object path: {0}")]
    ObjectPath(#[from] zbus::zvariant::Error),

    #[error("connection does not have a unique bus name yet")]
    NoUniqueName,

    #[error("script path is not valid UTF-8: {0}")]
    NonUtf8Path(String),

    #[error("KWin rejected the script (id {0})")]
    Rejected(i32),

    #[error("listener already registered at {0}")]
    ListenerBusy(&'static str),

    #[error("{0}")]
    Other(String),
}

/// Trait for compositor scripting hosts
#[async_trait]
pub trait ScriptHost: Send + Sync {
    /// Bus address the script should call back on
    async fn callback_address(&self) -> Result<String, HostError>;

    /// Load the script stored at `path`
    async fn load_script(&self, path: &Path) -> Result<ScriptId, HostError>;

    /// Start a loaded script
    async fn run_script(&self, id: ScriptId) -> Result<(), HostError>;

    /// Stop and unload a script
    async fn stop_script(&self, id: ScriptId) -> Result<(), HostError>;

    /// Export the decision callback, routing deliveries into `sender`
    async fn register_listener(&self, sender: DecisionSender) -> Result<(), HostError>;

    /// Remove the decision callback
    async fn unregister_listener(&self) -> Result<(), HostError>;
}

/// Connect to the compositor for the current session
pub async fn connect() -> Result<KWinHost, HostError> {
    KWinHost::new().await
}
