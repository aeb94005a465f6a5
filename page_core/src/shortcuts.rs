// Global keyboard shortcuts: Alt+letter jumps to a fixed page.

use std::rc::Rc;

use tracing::debug;

use crate::page::Page;
use crate::types::{DomEvent, EventKind, EventResponse, ListenTarget};

/// A fixed Alt+key binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortcut {
    pub key: char,
    pub path: &'static str,
    pub label: &'static str,
}

pub const SHORTCUTS: [Shortcut; 3] = [
    Shortcut { key: 'h', path: "/", label: "Home" },
    Shortcut { key: 'a', path: "/about", label: "About" },
    Shortcut { key: 'f', path: "/finger", label: "Finger" },
];

/// Path bound to the pressed combination, if any. Only Alt plus the exact
/// lowercase letter counts, so Alt+Shift+H reaches the browser untouched.
pub fn resolve(event: &DomEvent) -> Option<&'static str> {
    if event.kind != EventKind::KeyDown || !event.modifiers.alt {
        return None;
    }
    let mut chars = event.key.as_deref()?.chars();
    let key = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    SHORTCUTS
        .iter()
        .find(|shortcut| shortcut.key == key)
        .map(|shortcut| shortcut.path)
}

/// Human-readable list, e.g. `Alt+H (Home), Alt+A (About), Alt+F (Finger)`.
pub fn summary() -> String {
    SHORTCUTS
        .iter()
        .map(|shortcut| format!("Alt+{} ({})", shortcut.key.to_ascii_uppercase(), shortcut.label))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Registers the document-level key listener.
pub struct ShortcutHandler;

impl ShortcutHandler {
    pub fn install<P: Page>(page: &Rc<P>) {
        let weak = Rc::downgrade(page);
        page.listen(
            ListenTarget::Document,
            EventKind::KeyDown,
            Box::new(move |event: &DomEvent| {
                let (Some(path), Some(page)) = (resolve(event), weak.upgrade()) else {
                    return EventResponse::PROCEED;
                };
                debug!(path, "keyboard shortcut");
                page.navigate(path);
                EventResponse::prevent_default()
            }),
        );
    }
}
