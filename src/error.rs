//! Error taxonomy for one invocation

use std::time::Duration;

use thiserror::Error;

use crate::backend::HostError;
use crate::core::filter::FilterError;
use crate::decision::WaitError;
use crate::script::RenderError;

#[derive(Debug, Error)]
pub enum JumpError {
    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("connect to session bus: {0}")]
    Connect(#[source] HostError),

    #[error("get unique bus name: {0}")]
    UniqueName(#[source] HostError),

    #[error("render KWin script: {0}")]
    Render(#[from] RenderError),

    #[error("write temp script: {0}")]
    TempScript(#[source] std::io::Error),

    #[error("load KWin script: {0}")]
    Load(#[source] HostError),

    #[error("export listener on D-Bus: {0}")]
    Register(#[source] HostError),

    #[error("run KWin script: {0}")]
    Run(#[source] HostError),

    #[error("wait for KWin response: {0}")]
    Wait(#[from] WaitError),

    #[error("stop KWin script: {0}")]
    Stop(#[source] HostError),
}

impl JumpError {
    pub fn timeout(&self) -> Option<Duration> {
        match self {
            JumpError::Wait(WaitError::Timeout(after)) => Some(*after),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, JumpError>;
