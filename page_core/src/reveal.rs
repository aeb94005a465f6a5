// Scroll-triggered reveal of cards.
// Cards start hidden and fade/slide in the first time they intersect the viewport.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::error::PageError;
use crate::page::Page;
use crate::types::{IntersectionEntry, ObserverOptions};

pub const CARD_SELECTOR: &str = ".card";

pub const HIDDEN_OPACITY: &str = "0";
pub const HIDDEN_TRANSFORM: &str = "translateY(20px)";
pub const REVEALED_OPACITY: &str = "1";
pub const REVEALED_TRANSFORM: &str = "translateY(0)";
pub const REVEAL_TRANSITION: &str = "opacity 0.6s ease, transform 0.6s ease";

/// Sets up the card observer.
pub struct ScrollAnimator;

impl ScrollAnimator {
    /// Hide every card and observe it with the default options.
    pub fn install<P: Page>(page: &Rc<P>) -> Result<RevealHandle<P>, PageError> {
        Self::install_with(page, &ObserverOptions::default())
    }

    pub fn install_with<P: Page>(
        page: &Rc<P>,
        options: &ObserverOptions,
    ) -> Result<RevealHandle<P>, PageError> {
        let cards = page.query_all(None, CARD_SELECTOR);
        for card in &cards {
            page.set_style(card, "opacity", HIDDEN_OPACITY);
            page.set_style(card, "transform", HIDDEN_TRANSFORM);
            page.set_style(card, "transition", REVEAL_TRANSITION);
        }

        // The callback needs the observer to unobserve revealed cards, but the
        // observer only exists once the callback has been handed over.
        let slot: Rc<RefCell<Option<P::Observer>>> = Rc::new(RefCell::new(None));
        let weak = Rc::downgrade(page);
        let callback_slot = Rc::downgrade(&slot);
        let observer = page.observe_intersections(
            options,
            &cards,
            Box::new(move |entries: Vec<IntersectionEntry<P::Node>>| {
                if let Some(page) = weak.upgrade() {
                    reveal_entries(page.as_ref(), &callback_slot, entries);
                }
            }),
        )?;
        *slot.borrow_mut() = Some(observer);

        debug!(cards = cards.len(), "scroll animator installed");
        Ok(RevealHandle {
            page: Rc::downgrade(page),
            observer: slot,
        })
    }
}

fn reveal_entries<P: Page>(
    page: &P,
    observer: &Weak<RefCell<Option<P::Observer>>>,
    entries: Vec<IntersectionEntry<P::Node>>,
) {
    let observer = observer.upgrade();
    for entry in entries.into_iter().filter(|entry| entry.is_intersecting) {
        reveal(page, &entry.target);
        if let Some(slot) = &observer {
            if let Some(observer) = slot.borrow().as_ref() {
                page.unobserve(observer, &entry.target);
            }
        }
    }
}

/// Put a card in its resting, visible state.
pub fn reveal<P: Page>(page: &P, card: &P::Node) {
    page.set_style(card, "opacity", REVEALED_OPACITY);
    page.set_style(card, "transform", REVEALED_TRANSFORM);
}

/// Owns the card observer. Dropping the handle keeps the observer alive for
/// the page lifetime; call [`RevealHandle::dispose`] to tear it down.
pub struct RevealHandle<P: Page> {
    page: Weak<P>,
    observer: Rc<RefCell<Option<P::Observer>>>,
}

impl<P: Page> RevealHandle<P> {
    /// Disconnect the observer. Later calls do nothing.
    pub fn dispose(&self) {
        let Some(observer) = self.observer.borrow_mut().take() else {
            return;
        };
        if let Some(page) = self.page.upgrade() {
            page.disconnect(&observer);
            debug!("scroll animator disposed");
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.observer.borrow().is_none()
    }

    /// Observer handle, while connected.
    pub fn observer(&self) -> Option<std::cell::Ref<'_, P::Observer>> {
        std::cell::Ref::filter_map(self.observer.borrow(), Option::as_ref).ok()
    }
}
