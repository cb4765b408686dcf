//! D-Bus object the KWin script calls back into

use crate::decision::{Decision, DecisionSender};

pub const LISTENER_PATH: &str = "/org/kwinjump/Listener";
pub const LISTENER_INTERFACE: &str = "org.kwinjump.Listener";
pub const LISTENER_METHOD: &str = "ShouldLaunch";

/// Receives `ShouldLaunch` from the script and feeds the mailbox
pub struct DecisionListener {
    sender: DecisionSender,
}

impl DecisionListener {
    pub fn new(sender: DecisionSender) -> Self {
        Self { sender }
    }
}

#[zbus::interface(name = "org.kwinjump.Listener")]
impl DecisionListener {
    /// `ShouldLaunch`, called from KWin; must never block
    fn should_launch(&self, decision: &str) {
        let decision = Decision::from_wire(decision);
        tracing::debug!(?decision, "KWin script reported");
        self.sender.offer(decision);
    }
}
