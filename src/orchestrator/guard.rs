//! Scoped teardown for host-side resources
//!
//! Each guard releases its resource at most once. The explicit async
//! paths are the normal route; `Drop` only fires when an owner unwinds
//! without having released, and then schedules a best-effort release on
//! the current runtime.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::backend::{HostError, ScriptHost, ScriptId};

/// Owns an installed script until it is stopped
pub struct ScriptGuard {
    host: Arc<dyn ScriptHost>,
    script: Option<ScriptId>,
}

impl ScriptGuard {
    pub fn new(host: Arc<dyn ScriptHost>, script: ScriptId) -> Self {
        Self {
            host,
            script: Some(script),
        }
    }

    /// Still installed, i.e. no stop has been issued yet
    pub fn is_armed(&self) -> bool {
        self.script.is_some()
    }

    /// Stop the script now. A second call is a no-op.
    pub async fn stop(&mut self) -> Result<(), HostError> {
        match self.script.take() {
            Some(id) => {
                tracing::debug!(script = %id, "Stopping KWin script");
                self.host.stop_script(id).await
            }
            None => Ok(()),
        }
    }

    /// Stop the script after `delay` in a background task.
    ///
    /// Host-side effects of the script (a pending activation) are given
    /// `delay` to settle first. The delay is a heuristic, not a
    /// synchronisation point.
    pub fn stop_later(mut self, delay: Duration) -> Option<JoinHandle<()>> {
        let id = self.script.take()?;
        let host = Arc::clone(&self.host);
        Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = host.stop_script(id).await {
                tracing::warn!(script = %id, "Deferred stop of KWin script failed: {}", e);
            }
        }))
    }
}

impl Drop for ScriptGuard {
    fn drop(&mut self) {
        let Some(id) = self.script.take() else {
            return;
        };
        tracing::warn!(script = %id, "KWin script still installed on unwind, stopping");
        let host = Arc::clone(&self.host);
        if let Ok(runtime) = tokio::runtime::Handle::try_current() {
            runtime.spawn(async move {
                if let Err(e) = host.stop_script(id).await {
                    tracing::warn!(script = %id, "Failed to stop KWin script on unwind: {}", e);
                }
            });
        }
    }
}

/// Owns the exported decision listener until it is removed
pub struct ListenerGuard {
    host: Arc<dyn ScriptHost>,
    registered: bool,
}

impl ListenerGuard {
    pub fn new(host: Arc<dyn ScriptHost>) -> Self {
        Self {
            host,
            registered: true,
        }
    }

    /// Remove the listener. Failures are logged, never propagated.
    pub async fn release(&mut self) {
        if !std::mem::take(&mut self.registered) {
            return;
        }
        if let Err(e) = self.host.unregister_listener().await {
            tracing::warn!("Failed to unregister decision listener: {}", e);
        }
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if !std::mem::take(&mut self.registered) {
            return;
        }
        let host = Arc::clone(&self.host);
        if let Ok(runtime) = tokio::runtime::Handle::try_current() {
            runtime.spawn(async move {
                if let Err(e) = host.unregister_listener().await {
                    tracing::warn!("Failed to unregister decision listener on unwind: {}", e);
                }
            });
        }
    }
}
