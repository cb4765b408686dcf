//! Workspace model - the window-facing side of the KWin script sandbox
//!
//! The script rendered by [`crate::script`] talks to KWin's `workspace`
//! object. [`Workspace`] captures exactly the part of that API the
//! selector and cycler rely on, so the decision logic can be exercised
//! against [`MemoryWorkspace`] without a running compositor.

use crate::decision::Decision;

/// Opaque reference to a host window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u32);

/// A host window as seen from inside the script sandbox
#[derive(Debug, Clone)]
pub struct WindowHandle {
    pub id: WindowId,
    /// `resourceClass` in KWin terms
    pub resource_class: String,
    pub caption: String,
    pub on_all_desktops: bool,
    /// Ids of the virtual desktops the window lives on
    pub desktops: Vec<String>,
    pub minimized: bool,
    /// Host-assigned, grows from back to front
    pub stacking_order: i64,
}

impl WindowHandle {
    pub fn new(id: WindowId, resource_class: impl Into<String>, caption: impl Into<String>) -> Self {
        Self {
            id,
            resource_class: resource_class.into(),
            caption: caption.into(),
            on_all_desktops: false,
            desktops: Vec::new(),
            minimized: false,
            stacking_order: 0,
        }
    }

    pub fn is_on_desktop(&self, desktop: &str) -> bool {
        self.on_all_desktops || self.desktops.iter().any(|d| d == desktop)
    }
}

/// Host-visible side effect, recorded in call order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Activated(WindowId),
    Minimized(WindowId, bool),
    CalledBack { address: String, decision: Decision },
}

/// The subset of KWin's `workspace` object the cycler drives
pub trait Workspace {
    /// Windows in host enumeration order
    fn windows(&self) -> &[WindowHandle];

    fn active_window(&self) -> Option<WindowId>;

    /// `None` when the host has no notion of a current desktop
    fn current_desktop(&self) -> Option<&str>;

    fn set_active_window(&mut self, id: WindowId);

    fn set_minimized(&mut self, id: WindowId, minimized: bool);

    /// `callDBus` back into the orchestrator
    fn call_back(&mut self, address: &str, decision: Decision);
}

/// In-memory workspace that behaves like KWin for activation purposes
#[derive(Debug, Default)]
pub struct MemoryWorkspace {
    windows: Vec<WindowHandle>,
    active: Option<WindowId>,
    current_desktop: Option<String>,
    next_id: u32,
    events: Vec<HostEvent>,
}

impl MemoryWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_current_desktop(mut self, desktop: impl Into<String>) -> Self {
        self.current_desktop = Some(desktop.into());
        self
    }

    /// Add a window on top of the stack and return its id
    pub fn open(&mut self, resource_class: &str, caption: &str) -> WindowId {
        let id = WindowId(self.next_id);
        self.next_id += 1;

        let mut handle = WindowHandle::new(id, resource_class, caption);
        handle.stacking_order = self.top_stacking_order() + 1;
        self.windows.push(handle);
        id
    }

    pub fn window(&self, id: WindowId) -> Option<&WindowHandle> {
        self.windows.iter().find(|w| w.id == id)
    }

    pub fn window_mut(&mut self, id: WindowId) -> Option<&mut WindowHandle> {
        self.windows.iter_mut().find(|w| w.id == id)
    }

    /// Focus a window without recording a host event
    pub fn focus(&mut self, id: WindowId) {
        self.active = Some(id);
    }

    pub fn events(&self) -> &[HostEvent] {
        &self.events
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    fn top_stacking_order(&self) -> i64 {
        self.windows.iter().map(|w| w.stacking_order).max().unwrap_or(0)
    }
}

impl Workspace for MemoryWorkspace {
    fn windows(&self) -> &[WindowHandle] {
        &self.windows
    }

    fn active_window(&self) -> Option<WindowId> {
        self.active
    }

    fn current_desktop(&self) -> Option<&str> {
        self.current_desktop.as_deref()
    }

    fn set_active_window(&mut self, id: WindowId) {
        // KWin unminimizes and raises whatever it activates
        let top = self.top_stacking_order();
        if let Some(window) = self.window_mut(id) {
            window.minimized = false;
            if window.stacking_order != top {
                window.stacking_order = top + 1;
            }
            self.active = Some(id);
        }
        self.events.push(HostEvent::Activated(id));
    }

    fn set_minimized(&mut self, id: WindowId, minimized: bool) {
        if let Some(window) = self.window_mut(id) {
            window.minimized = minimized;
        }
        if minimized && self.active == Some(id) {
            self.active = None;
        }
        self.events.push(HostEvent::Minimized(id, minimized));
    }

    fn call_back(&mut self, address: &str, decision: Decision) {
        self.events.push(HostEvent::CalledBack {
            address: address.to_string(),
            decision,
        });
    }
}
