//! Runs the rendered KWin script in a JavaScript engine against a stub
//! `workspace` and `callDBus`, and checks it against the selector model

use boa_engine::{Context, Source};
use kwinjump::core::filter::FilterSpec;
use kwinjump::core::workspace::{MemoryWorkspace, WindowId, Workspace};
use kwinjump::script::{self, ScriptParams, escape_js_string};
use kwinjump::selector::{Matcher, activate_or_signal};

const ADDR: &str = ":1.42";

/// Minimal KWin 6 scripting surface. Activation unminimizes and raises
/// like KWin does; every host-visible effect is appended to `events`.
const STUB_WORKSPACE: &str = r#"
var events = [];
var windows = [];
var active = null;
var nextId = 0;

function topOrder() {
    var top = 0;
    for (var i = 0; i < windows.length; i++) {
        top = Math.max(top, windows[i].stackingOrder);
    }
    return top;
}

function openWindow(resourceClass, caption) {
    var window = {
        id: nextId++,
        resourceClass: resourceClass,
        caption: caption,
        stackingOrder: topOrder() + 1,
        onAllDesktops: false,
        desktops: []
    };
    // Minimizing the active window leaves nothing active
    var minimized = false;
    Object.defineProperty(window, 'minimized', {
        get: function () {
            return minimized;
        },
        set: function (value) {
            minimized = value;
            if (value && active === window) {
                active = null;
            }
        }
    });
    windows.push(window);
    return window.id;
}

function byId(id) {
    for (var i = 0; i < windows.length; i++) {
        if (windows[i].id === id) {
            return windows[i];
        }
    }
    return null;
}

var workspace = {
    windowList: function () {
        return windows.slice();
    }
};

Object.defineProperty(workspace, 'activeWindow', {
    get: function () {
        return active;
    },
    set: function (window) {
        events.push('activate:' + window.id);
        window.minimized = false;
        var top = topOrder();
        if (window.stackingOrder !== top) {
            window.stackingOrder = top + 1;
        }
        active = window;
    }
});

function callDBus(service, path, iface, method, arg) {
    events.push('call:' + service + ' ' + path + ' ' + iface + '.' + method + ' ' + arg);
}
"#;

struct KWinSandbox {
    context: Context,
}

impl KWinSandbox {
    fn new() -> Self {
        let mut context = Context::default();
        context.eval(Source::from_bytes(STUB_WORKSPACE)).unwrap();
        Self { context }
    }

    fn eval(&mut self, code: &str) -> String {
        let value = self.context.eval(Source::from_bytes(code)).unwrap();
        value.to_string(&mut self.context).unwrap().to_std_string_escaped()
    }

    fn open(&mut self, class: &str, caption: &str) -> WindowId {
        let id = self.eval(&format!(
            "openWindow('{}', '{}')",
            escape_js_string(class),
            escape_js_string(caption)
        ));
        WindowId(id.parse().unwrap())
    }

    fn focus(&mut self, id: WindowId) {
        self.eval(&format!("active = byId({});", id.0));
    }

    fn set_stacking_order(&mut self, id: WindowId, order: i64) {
        self.eval(&format!("byId({}).stackingOrder = {};", id.0, order));
    }

    /// Render the script for `filter` and evaluate it once
    fn run(&mut self, filter: &FilterSpec, callback: Option<&str>) {
        let source = script::render(&ScriptParams::new(filter, callback)).unwrap();
        self.eval("events = [];");
        self.context.eval(Source::from_bytes(&source)).unwrap();
    }

    fn events(&mut self) -> Vec<String> {
        let joined = self.eval("events.join('\\n')");
        joined.lines().map(str::to_string).collect()
    }

    fn active_window(&mut self) -> Option<WindowId> {
        self.eval("active === null ? '' : String(active.id)")
            .parse()
            .ok()
            .map(WindowId)
    }

    fn is_minimized(&mut self, id: WindowId) -> bool {
        self.eval(&format!("String(byId({}).minimized)", id.0)) == "true"
    }
}

fn class(name: &str) -> FilterSpec {
    FilterSpec::new(Some(name.into()), None, None)
}

fn called_back(arg: &str) -> String {
    format!("call:{} /org/kwinjump/Listener org.kwinjump.Listener.ShouldLaunch {}", ADDR, arg)
}

fn activated(id: WindowId) -> String {
    format!("activate:{}", id.0)
}

#[test]
fn test_konsole_scenario_activates_highest_stacking_match() {
    let mut kwin = KWinSandbox::new();
    let first = kwin.open("Konsole", "one");
    let second = kwin.open("Konsole", "two");
    kwin.open("Dolphin", "files");
    kwin.set_stacking_order(first, 10);

    kwin.run(&class("Konsole"), None);

    assert_eq!(kwin.active_window(), Some(first));
    assert_ne!(kwin.active_window(), Some(second));
}

#[test]
fn test_no_match_reports_and_never_activates() {
    let mut kwin = KWinSandbox::new();
    let dolphin = kwin.open("Dolphin", "files");
    kwin.focus(dolphin);

    kwin.run(&class("Konsole"), Some(ADDR));

    assert_eq!(kwin.events(), vec![called_back("true")]);
    assert_eq!(kwin.active_window(), Some(dolphin));
}

#[test]
fn test_no_callback_without_address() {
    let mut kwin = KWinSandbox::new();
    kwin.run(&class("Konsole"), None);
    assert!(kwin.events().is_empty());
}

#[test]
fn test_handled_is_reported_before_activation() {
    let mut kwin = KWinSandbox::new();
    let konsole = kwin.open("Konsole", "shell");

    kwin.run(&class("Konsole"), Some(ADDR));

    assert_eq!(kwin.events(), vec![called_back("false"), activated(konsole)]);
}

#[test]
fn test_active_single_match_is_idempotent_without_toggle() {
    let mut kwin = KWinSandbox::new();
    let konsole = kwin.open("Konsole", "shell");
    kwin.focus(konsole);

    kwin.run(&class("Konsole"), None);
    kwin.run(&class("Konsole"), None);

    assert!(kwin.events().is_empty());
    assert_eq!(kwin.active_window(), Some(konsole));
    assert!(!kwin.is_minimized(konsole));
}

#[test]
fn test_toggle_flips_minimized_on_active_single_match() {
    let mut kwin = KWinSandbox::new();
    let konsole = kwin.open("Konsole", "shell");
    kwin.focus(konsole);
    let filter = class("Konsole").with_toggle_on_active(true);

    kwin.run(&filter, None);
    assert!(kwin.is_minimized(konsole));
    assert_eq!(kwin.active_window(), None);
    assert!(kwin.events().is_empty());

    // Minimized and no longer active: the next press brings it back
    kwin.run(&filter, None);
    assert!(!kwin.is_minimized(konsole));
    assert_eq!(kwin.events(), vec![activated(konsole)]);
}

#[test]
fn test_cycles_to_bottom_when_active_is_in_group() {
    let mut kwin = KWinSandbox::new();
    let bottom = kwin.open("Konsole", "one");
    kwin.open("Konsole", "two");
    let top = kwin.open("Konsole", "three");
    kwin.focus(top);

    kwin.run(&class("Konsole"), None);
    assert_eq!(kwin.active_window(), Some(bottom));
}

#[test]
fn test_activates_top_when_active_is_outside_group() {
    let mut kwin = KWinSandbox::new();
    kwin.open("Konsole", "one");
    let top = kwin.open("Konsole", "two");
    let dolphin = kwin.open("Dolphin", "files");
    kwin.focus(dolphin);

    kwin.run(&class("Konsole"), None);
    assert_eq!(kwin.active_window(), Some(top));
}

#[test]
fn test_exact_class_is_case_sensitive() {
    let mut kwin = KWinSandbox::new();
    kwin.open("konsole", "shell");

    kwin.run(&class("Konsole"), Some(ADDR));
    assert_eq!(kwin.events(), vec![called_back("true")]);
}

#[test]
fn test_caption_is_case_insensitive_and_ignored_with_class_filter() {
    let mut kwin = KWinSandbox::new();
    let mail = kwin.open("Thunderbird", "Inbox - MAIL");
    kwin.open("Firefox", "web");

    kwin.run(&FilterSpec::new(None, Some("mail".into()), None), None);
    assert_eq!(kwin.active_window(), Some(mail));

    // Class filter wins, the caption pattern is not consulted
    kwin.run(&FilterSpec::new(Some("Nope".into()), Some("mail".into()), None), Some(ADDR));
    assert_eq!(kwin.events(), vec![called_back("true")]);
}

#[test]
fn test_class_regex_is_unanchored_search() {
    let mut kwin = KWinSandbox::new();
    let fox = kwin.open("org.mozilla.firefox", "web");
    kwin.open("Dolphin", "files");

    kwin.run(&FilterSpec::new(None, None, Some("fire".into())), None);
    assert_eq!(kwin.active_window(), Some(fox));
}

#[test]
fn test_desktop_filter() {
    let mut kwin = KWinSandbox::new();
    let here = kwin.open("Konsole", "here");
    let there = kwin.open("Konsole", "there");
    kwin.eval(&format!("byId({}).desktops = ['d1'];", here.0));
    kwin.eval(&format!("byId({}).desktops = ['d2'];", there.0));
    kwin.eval("workspace.currentDesktop = 'd1';");

    kwin.run(&class("Konsole").with_current_desktop_only(true), None);
    assert_eq!(kwin.active_window(), Some(here));
}

#[test]
fn test_desktop_filter_fails_open_without_current_desktop() {
    let mut kwin = KWinSandbox::new();
    kwin.open("Konsole", "one");
    let top = kwin.open("Konsole", "two");
    kwin.eval("byId(0).desktops = ['d1']; byId(1).desktops = ['d2'];");

    kwin.run(&class("Konsole").with_current_desktop_only(true), Some(ADDR));

    assert_eq!(kwin.events(), vec![called_back("false"), activated(top)]);
}

#[test]
fn test_quoted_values_survive_rendering() {
    let mut kwin = KWinSandbox::new();
    let odd = kwin.open("it's\\a\nclass", "odd");

    kwin.run(&class("it's\\a\nclass"), None);
    assert_eq!(kwin.active_window(), Some(odd));
}

#[test]
fn test_kwin5_api_fallback() {
    let mut kwin = KWinSandbox::new();
    let konsole = kwin.open("Konsole", "shell");
    kwin.eval(
        "workspace = {
             clientList: function () { return windows.slice(); },
             activeClient: null
         };",
    );

    kwin.run(&class("Konsole"), None);
    assert_eq!(kwin.eval("String(workspace.activeClient.id)"), konsole.0.to_string());
}

/// The script and the Rust selector model walk the same windows identically
#[test]
fn test_script_agrees_with_selector_model() {
    let layouts: &[&[(&str, &str)]] = &[
        &[("Konsole", "a"), ("Konsole", "b"), ("Konsole", "c")],
        &[("Konsole", "a"), ("Dolphin", "files"), ("Konsole", "b")],
        &[("Dolphin", "files")],
        &[("Konsole", "only")],
    ];
    let filters = [
        class("Konsole"),
        class("Konsole").with_toggle_on_active(true),
        FilterSpec::new(None, Some("^[ab]$".into()), None),
    ];

    for layout in layouts {
        for filter in &filters {
            let mut kwin = KWinSandbox::new();
            let mut model = MemoryWorkspace::new();
            for (resource_class, caption) in layout.iter() {
                assert_eq!(kwin.open(resource_class, caption), model.open(resource_class, caption));
            }
            let matcher = Matcher::compile(filter).unwrap();

            for round in 0..4 {
                kwin.run(filter, Some(ADDR));
                model.clear_events();
                let decision = activate_or_signal(&mut model, &matcher, filter.toggle_on_active, Some(ADDR));

                let context = format!("layout {:?}, filter {:?}, round {}", layout, filter, round);
                assert_eq!(kwin.events()[0], called_back(decision.as_wire()), "{}", context);
                assert_eq!(kwin.active_window(), model.active_window(), "{}", context);
                for window in model.windows() {
                    assert_eq!(kwin.is_minimized(window.id), window.minimized, "{}", context);
                }
            }
        }
    }
}
