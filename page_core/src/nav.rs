// Navigation: active-link highlighting and smooth scrolling for fragment links.

use std::rc::Rc;

use tracing::debug;

use crate::page::Page;
use crate::types::{DomEvent, EventKind, EventResponse, ListenTarget};

pub const NAV_LINK_SELECTOR: &str = ".navbar-nav .nav-link";
pub const ANCHOR_LINK_SELECTOR: &str = r##"a[href^="#"]"##;
pub const ACTIVE_CLASS: &str = "active";

/// Highlights the current page's nav link and intercepts fragment links.
pub struct NavigationEnhancer;

impl NavigationEnhancer {
    pub fn install<P: Page>(page: &Rc<P>) {
        let highlighted = highlight_active_links(page.as_ref());

        let anchors = page.query_all(None, ANCHOR_LINK_SELECTOR);
        for anchor in &anchors {
            let weak = Rc::downgrade(page);
            let link = anchor.clone();
            page.listen(
                ListenTarget::Element(anchor),
                EventKind::Click,
                Box::new(move |_: &DomEvent| {
                    if let Some(page) = weak.upgrade() {
                        on_anchor_click(page.as_ref(), &link);
                    }
                    EventResponse::prevent_default()
                }),
            );
        }
        debug!(highlighted, anchors = anchors.len(), "navigation enhancer installed");
    }
}

/// Exact comparison between a link's href and the current path.
pub fn is_active_link(href: Option<&str>, current_path: &str) -> bool {
    href == Some(current_path)
}

/// Mark every nav link pointing at the current path. Returns how many matched.
pub fn highlight_active_links<P: Page>(page: &P) -> usize {
    let current_path = page.location_path();
    let mut highlighted = 0;
    for link in page.query_all(None, NAV_LINK_SELECTOR) {
        let href = page.attribute(&link, "href");
        if is_active_link(href.as_deref(), &current_path) {
            page.add_class(&link, ACTIVE_CLASS);
            highlighted += 1;
        }
    }
    highlighted
}

/// Scroll to the element named by the link's fragment, if there is one.
/// Returns whether a target was found.
pub fn on_anchor_click<P: Page>(page: &P, link: &P::Node) -> bool {
    let Some(href) = page.attribute(link, "href") else {
        return false;
    };
    // `#` alone names no element and is not a valid selector.
    if href.len() <= 1 {
        return false;
    }
    match page.query(None, &href) {
        Some(target) => {
            page.scroll_into_view(&target);
            true
        }
        None => false,
    }
}
