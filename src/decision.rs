//! Decision signal and the single-slot mailbox that carries it
//!
//! The script inside KWin reports one boolean back to this process. The
//! callback can arrive from KWin before the `run` call has even returned,
//! and KWin must never be blocked by it, so the write side never waits:
//! the first decision is kept, anything after it is dropped.

use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;

/// Outcome reported by the script for one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Nothing matched, the caller should launch its fallback command
    NoMatch,
    /// A window was focused or toggled
    Handled,
}

impl Decision {
    /// Parse the string argument of `ShouldLaunch`
    pub fn from_wire(value: &str) -> Self {
        if value.eq_ignore_ascii_case("true") {
            Decision::NoMatch
        } else {
            Decision::Handled
        }
    }

    /// String argument the script passes to `ShouldLaunch`
    pub fn as_wire(self) -> &'static str {
        match self {
            Decision::NoMatch => "true",
            Decision::Handled => "false",
        }
    }

    pub fn should_launch(self) -> bool {
        matches!(self, Decision::NoMatch)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WaitError {
    #[error("timeout waiting for response from KWin script after {0:?}")]
    Timeout(Duration),
    #[error("decision listener closed before KWin responded")]
    Closed,
}

/// Write side, owned by the D-Bus listener
#[derive(Debug, Clone)]
pub struct DecisionSender {
    tx: mpsc::Sender<Decision>,
}

impl DecisionSender {
    /// Deliver a decision without blocking. Returns `false` when it was
    /// dropped because one is already queued or the reader is gone.
    pub fn offer(&self, decision: Decision) -> bool {
        match self.tx.try_send(decision) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(dropped)) => {
                tracing::debug!(?dropped, "Decision already pending, dropping duplicate");
                false
            }
            Err(mpsc::error::TrySendError::Closed(dropped)) => {
                tracing::debug!(?dropped, "Decision arrived after the wait ended");
                false
            }
        }
    }
}

/// Read side, owned by the orchestrator
#[derive(Debug)]
pub struct DecisionReceiver {
    rx: mpsc::Receiver<Decision>,
}

impl DecisionReceiver {
    /// Block until one decision arrives or `timeout` elapses
    pub async fn wait(mut self, timeout: Duration) -> Result<Decision, WaitError> {
        match tokio::time::timeout(timeout, self.rx.recv()).await {
            Ok(Some(decision)) => Ok(decision),
            Ok(None) => Err(WaitError::Closed),
            Err(_) => Err(WaitError::Timeout(timeout)),
        }
    }
}

/// Create a mailbox with room for exactly one decision
pub fn mailbox() -> (DecisionSender, DecisionReceiver) {
    let (tx, rx) = mpsc::channel(1);
    (DecisionSender { tx }, DecisionReceiver { rx })
}
