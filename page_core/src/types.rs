// Strong typing over strings. Event descriptions, observer settings, severities and page config.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Browser events the enhancers listen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    DomContentLoaded,
    Submit,
    Blur,
    Click,
    KeyDown,
}

impl EventKind {
    /// DOM event type string.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::DomContentLoaded => "DOMContentLoaded",
            EventKind::Submit => "submit",
            EventKind::Blur => "blur",
            EventKind::Click => "click",
            EventKind::KeyDown => "keydown",
        }
    }
}

/// Modifier keys held while an event fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub alt: bool,
    pub ctrl: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn alt() -> Self {
        Modifiers {
            alt: true,
            ..Modifiers::default()
        }
    }
}

/// Host-independent snapshot of a DOM event handed to listeners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomEvent {
    pub kind: EventKind,
    /// `KeyboardEvent.key`, only set for key events.
    pub key: Option<String>,
    pub modifiers: Modifiers,
}

impl DomEvent {
    pub fn new(kind: EventKind) -> Self {
        DomEvent {
            kind,
            key: None,
            modifiers: Modifiers::default(),
        }
    }

    pub fn key_down(key: &str, modifiers: Modifiers) -> Self {
        DomEvent {
            kind: EventKind::KeyDown,
            key: Some(key.to_string()),
            modifiers,
        }
    }
}

/// What a listener asks the host to do with the event it handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventResponse {
    pub prevent_default: bool,
    pub stop_propagation: bool,
}

impl EventResponse {
    /// Let the browser carry on with the default action.
    pub const PROCEED: EventResponse = EventResponse {
        prevent_default: false,
        stop_propagation: false,
    };

    pub fn prevent_default() -> Self {
        EventResponse {
            prevent_default: true,
            stop_propagation: false,
        }
    }

    /// Prevent the default action and stop propagation.
    pub fn cancel() -> Self {
        EventResponse {
            prevent_default: true,
            stop_propagation: true,
        }
    }

    /// Combine responses from several listeners on the same dispatch.
    pub fn merge(self, other: EventResponse) -> Self {
        EventResponse {
            prevent_default: self.prevent_default || other.prevent_default,
            stop_propagation: self.stop_propagation || other.stop_propagation,
        }
    }
}

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ListenTarget<'a, N> {
    Document,
    Element(&'a N),
}

/// Intersection observer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObserverOptions {
    /// Fraction of the target that must be visible (0.0 to 1.0).
    pub threshold: f64,
    /// CSS margin applied to the root bounds.
    pub root_margin: String,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        ObserverOptions {
            threshold: 0.1,
            root_margin: "0px 0px -50px 0px".to_string(),
        }
    }
}

/// One report delivered to an intersection callback.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionEntry<N> {
    pub target: N,
    pub is_intersecting: bool,
}

/// Notification category, rendered as the `alert-<severity>` class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Primary,
    Secondary,
    Success,
    Danger,
    Warning,
    #[default]
    Info,
    Light,
    Dark,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Primary => "primary",
            Severity::Secondary => "secondary",
            Severity::Success => "success",
            Severity::Danger => "danger",
            Severity::Warning => "warning",
            Severity::Info => "info",
            Severity::Light => "light",
            Severity::Dark => "dark",
        }
    }

    /// Parse a category name; unknown names fall back to `Info`.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "primary" => Severity::Primary,
            "secondary" => Severity::Secondary,
            "success" => Severity::Success,
            "danger" | "error" => Severity::Danger,
            "warning" => Severity::Warning,
            "light" => Severity::Light,
            "dark" => Severity::Dark,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Console verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// Page configuration passed from JS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    #[serde(default)]
    pub log_level: LogLevel,
    /// Print the welcome lines to the console on install.
    #[serde(default = "default_true")]
    pub console_banner: bool,
    #[serde(default)]
    pub features: FeatureSet,
}

impl Default for PageConfig {
    fn default() -> Self {
        PageConfig {
            log_level: LogLevel::default(),
            console_banner: true,
            features: FeatureSet::default(),
        }
    }
}

/// Which enhancers `install` wires up. Everything is on unless switched off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSet {
    #[serde(default = "default_true")]
    pub forms: bool,
    #[serde(default = "default_true")]
    pub navigation: bool,
    #[serde(default = "default_true")]
    pub animations: bool,
    #[serde(default = "default_true")]
    pub tooltips: bool,
    #[serde(default = "default_true")]
    pub shortcuts: bool,
}

impl Default for FeatureSet {
    fn default() -> Self {
        FeatureSet {
            forms: true,
            navigation: true,
            animations: true,
            tooltips: true,
            shortcuts: true,
        }
    }
}

fn default_true() -> bool {
    true
}
