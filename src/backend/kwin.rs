//! KWin scripting host for KDE Plasma
//!
//! Loads, runs and stops scripts through KWin's D-Bus scripting API and
//! exports the decision listener on the same session connection.

use async_trait::async_trait;
use std::path::Path;
use zbus::Connection;
use zbus::zvariant::ObjectPath;

use super::listener::{DecisionListener, LISTENER_PATH};
use super::{HostError, ScriptHost, ScriptId};
use crate::decision::DecisionSender;

const KWIN_SERVICE: &str = "org.kde.KWin";
const SCRIPTING_PATH: &str = "/Scripting";
const SCRIPTING_INTERFACE: &str = "org.kde.kwin.Scripting";
const SCRIPT_INTERFACE: &str = "org.kde.kwin.Script";

/// KWin host speaking D-Bus on the session bus
pub struct KWinHost {
    dbus: Connection,
}

impl KWinHost {
    /// Connect to the session bus
    pub async fn new() -> Result<Self, HostError> {
        let dbus = Connection::session().await?;
        Ok(Self { dbus })
    }

    async fn call_script(&self, id: ScriptId, method: &str) -> Result<(), HostError> {
        let path = id.object_path();
        let path = ObjectPath::try_from(path.as_str())?;

        tracing::debug!(script = %id, method, "Calling KWin script");
        self.dbus
            .call_method(Some(KWIN_SERVICE), path, Some(SCRIPT_INTERFACE), method, &())
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ScriptHost for KWinHost {
    async fn callback_address(&self) -> Result<String, HostError> {
        self.dbus
            .unique_name()
            .map(|name| name.to_string())
            .ok_or(HostError::NoUniqueName)
    }

    async fn load_script(&self, path: &Path) -> Result<ScriptId, HostError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| HostError::NonUtf8Path(path.display().to_string()))?;

        let reply = self
            .dbus
            .call_method(
                Some(KWIN_SERVICE),
                SCRIPTING_PATH,
                Some(SCRIPTING_INTERFACE),
                "loadScript",
                &(path_str,),
            )
            .await?;

        let script_id: i32 = reply.body().deserialize()?;
        if script_id < 0 {
            return Err(HostError::Rejected(script_id));
        }

        tracing::debug!(script = script_id, path = path_str, "Loaded KWin script");
        Ok(ScriptId(script_id))
    }

    async fn run_script(&self, id: ScriptId) -> Result<(), HostError> {
        self.call_script(id, "run").await
    }

    async fn stop_script(&self, id: ScriptId) -> Result<(), HostError> {
        self.call_script(id, "stop").await
    }

    async fn register_listener(&self, sender: DecisionSender) -> Result<(), HostError> {
        let added = self
            .dbus
            .object_server()
            .at(LISTENER_PATH, DecisionListener::new(sender))
            .await?;
        if !added {
            return Err(HostError::ListenerBusy(LISTENER_PATH));
        }
        Ok(())
    }

    async fn unregister_listener(&self) -> Result<(), HostError> {
        self.dbus
            .object_server()
            .remove::<DecisionListener, _>(LISTENER_PATH)
            .await?;
        Ok(())
    }
}
