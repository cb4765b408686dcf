//! Invocation lifecycle
//!
//! One [`Orchestrator::run`] walks a single invocation through
//! `Idle → Rendered → Installed → Armed → Running → Decided → Stopped →
//! Exited`. Once a script is installed every path, including errors,
//! leads through exactly one stop of that script.

mod guard;

pub use guard::{ListenerGuard, ScriptGuard};

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::backend::{ScriptHost, ScriptId};
use crate::core::filter::FilterSpec;
use crate::decision::{self, Decision, DecisionReceiver};
use crate::error::{JumpError, Result};
use crate::launch;
use crate::script::{self, ScriptParams};

/// How long to wait for the script to report back
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Grace period before stopping a script nobody waits on
pub const DEFAULT_TEARDOWN_DELAY: Duration = Duration::from_millis(150);

/// Shell the fallback command is handed to with `-c`
pub const DEFAULT_SHELL: &str = "sh";

/// Tunables for the orchestrator
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub response_timeout: Duration,
    pub teardown_delay: Duration,
    pub shell: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            response_timeout: DEFAULT_RESPONSE_TIMEOUT,
            teardown_delay: DEFAULT_TEARDOWN_DELAY,
            shell: DEFAULT_SHELL.to_string(),
        }
    }
}

impl OrchestratorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.response_timeout.is_zero() {
            return Err(JumpError::Config("response timeout must be greater than zero".into()));
        }
        if self.shell.trim().is_empty() {
            return Err(JumpError::Config("shell must not be empty".into()));
        }
        Ok(())
    }
}

/// What the user asked for
#[derive(Debug, Clone)]
pub struct Invocation {
    pub filter: FilterSpec,
    /// Shell command to launch when nothing matches
    pub fallback: Option<String>,
}

impl Invocation {
    pub fn new(filter: FilterSpec, fallback: Option<&str>) -> Self {
        Self {
            filter,
            fallback: launch::normalize_command(fallback),
        }
    }
}

/// Lifecycle stages, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Idle,
    Rendered,
    Installed,
    Armed,
    Running,
    Decided,
    Stopped,
    Exited,
}

struct Lifecycle {
    stage: Stage,
}

impl Lifecycle {
    fn new() -> Self {
        Self { stage: Stage::Idle }
    }

    fn advance(&mut self, next: Stage) {
        debug_assert!(next > self.stage, "{:?} cannot follow {:?}", next, self.stage);
        tracing::debug!(from = ?self.stage, to = ?next, "Invocation stage");
        self.stage = next;
    }
}

/// Result of a successful invocation
#[derive(Debug)]
pub struct Outcome {
    /// `None` when no fallback was configured and nobody waited
    pub decision: Option<Decision>,
    /// Stage the invocation finished in
    pub stage: Stage,
    /// Pid of the fallback command, if one was started
    pub fallback_pid: Option<u32>,
    /// Launching the fallback failed; the focus decision still stands
    pub launch_error: Option<std::io::Error>,
    pending_teardown: Option<JoinHandle<()>>,
}

impl Outcome {
    /// A deferred stop is still scheduled in the background
    pub fn teardown_pending(&self) -> bool {
        self.pending_teardown.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Let a deferred stop finish before the process exits
    pub async fn settle(self) {
        if let Some(handle) = self.pending_teardown {
            if let Err(e) = handle.await {
                tracing::warn!("Deferred stop task did not complete: {}", e);
            }
        }
    }
}

/// Drives one invocation against a script host
pub struct Orchestrator {
    host: Arc<dyn ScriptHost>,
    config: OrchestratorConfig,
}

impl Orchestrator {
    pub fn new(host: Arc<dyn ScriptHost>, config: OrchestratorConfig) -> Self {
        Self { host, config }
    }

    pub async fn run(&self, invocation: &Invocation) -> Result<Outcome> {
        let mut lifecycle = Lifecycle::new();

        invocation.filter.validate()?;
        self.config.validate()?;

        let callback = match invocation.fallback {
            Some(_) => Some(self.host.callback_address().await.map_err(JumpError::UniqueName)?),
            None => None,
        };

        let source = script::render(&ScriptParams::new(&invocation.filter, callback.as_deref()))?;
        lifecycle.advance(Stage::Rendered);

        // Removed when this function returns
        let script_file = script::persist(&source).map_err(JumpError::TempScript)?;
        let id = self
            .host
            .load_script(script_file.path())
            .await
            .map_err(JumpError::Load)?;
        lifecycle.advance(Stage::Installed);

        let mut script = ScriptGuard::new(Arc::clone(&self.host), id);

        let Some(command) = invocation.fallback.as_deref() else {
            return self.run_detached(&mut lifecycle, script, id).await;
        };

        let decision = match self.run_and_wait(&mut lifecycle, id).await {
            Ok(decision) => decision,
            Err(e) => {
                if let Err(stop_err) = script.stop().await {
                    tracing::warn!(script = %id, "Failed to stop KWin script after error: {}", stop_err);
                }
                return Err(e);
            }
        };
        lifecycle.advance(Stage::Decided);
        tracing::debug!(?decision, "KWin script decided");

        script.stop().await.map_err(JumpError::Stop)?;
        lifecycle.advance(Stage::Stopped);

        let mut outcome = Outcome {
            decision: Some(decision),
            stage: Stage::Stopped,
            fallback_pid: None,
            launch_error: None,
            pending_teardown: None,
        };

        if decision.should_launch() {
            match launch::spawn_fallback(&self.config.shell, command) {
                Ok(pid) => outcome.fallback_pid = pid,
                Err(e) => {
                    tracing::error!(command, "Failed to launch fallback command: {}", e);
                    outcome.launch_error = Some(e);
                }
            }
        }

        lifecycle.advance(Stage::Exited);
        outcome.stage = Stage::Exited;
        Ok(outcome)
    }

    /// No fallback: run the script and leave it to finish on its own
    async fn run_detached(&self, lifecycle: &mut Lifecycle, mut script: ScriptGuard, id: ScriptId) -> Result<Outcome> {
        lifecycle.advance(Stage::Running);
        if let Err(e) = self.host.run_script(id).await {
            if let Err(stop_err) = script.stop().await {
                tracing::warn!(script = %id, "Failed to stop KWin script after error: {}", stop_err);
            }
            return Err(JumpError::Run(e));
        }

        let pending_teardown = script.stop_later(self.config.teardown_delay);
        lifecycle.advance(Stage::Exited);

        Ok(Outcome {
            decision: None,
            stage: Stage::Exited,
            fallback_pid: None,
            launch_error: None,
            pending_teardown,
        })
    }

    /// Arm the listener, run the script and wait for its one decision
    async fn run_and_wait(&self, lifecycle: &mut Lifecycle, id: ScriptId) -> Result<Decision> {
        let (sender, receiver) = decision::mailbox();

        self.host
            .register_listener(sender)
            .await
            .map_err(JumpError::Register)?;
        let mut listener = ListenerGuard::new(Arc::clone(&self.host));
        lifecycle.advance(Stage::Armed);

        let result = self.run_armed(lifecycle, id, receiver).await;

        listener.release().await;
        result
    }

    async fn run_armed(&self, lifecycle: &mut Lifecycle, id: ScriptId, receiver: DecisionReceiver) -> Result<Decision> {
        self.host.run_script(id).await.map_err(JumpError::Run)?;
        lifecycle.advance(Stage::Running);
        Ok(receiver.wait(self.config.response_timeout).await?)
    }
}
