// Host seam. Every enhancer talks to the page through this trait;
// the browser implementation lives in `web`, the in-memory one in `sim`.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::error::PageError;
use crate::types::{DomEvent, EventKind, EventResponse, IntersectionEntry, ListenTarget, ObserverOptions};

/// Event callback. Returns what the host should do with the event.
pub type Listener = Box<dyn FnMut(&DomEvent) -> EventResponse>;

/// Callback fed with batches of intersection reports.
pub type IntersectionCallback<N> = Box<dyn FnMut(Vec<IntersectionEntry<N>>)>;

/// Host future. `!Send`, the page runs on a single event loop.
pub type PageFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, PageError>> + 'a>>;

/// DOM and browser operations used by the enhancers.
pub trait Page: 'static {
    /// Element handle. Cheap to clone.
    type Node: Clone + PartialEq + fmt::Debug + 'static;
    /// Intersection observer handle.
    type Observer: 'static;

    /// All elements matching `selector` in document order, searched below
    /// `scope` or the whole document.
    fn query_all(&self, scope: Option<&Self::Node>, selector: &str) -> Vec<Self::Node>;

    /// First match for `selector`. Invalid selectors match nothing.
    fn query(&self, scope: Option<&Self::Node>, selector: &str) -> Option<Self::Node> {
        self.query_all(scope, selector).into_iter().next()
    }

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str);

    /// Native constraint validation (`checkValidity()`).
    fn check_validity(&self, node: &Self::Node) -> bool;

    fn add_class(&self, node: &Self::Node, class: &str);
    fn remove_class(&self, node: &Self::Node, class: &str);
    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    fn set_disabled(&self, node: &Self::Node, disabled: bool);
    fn set_style(&self, node: &Self::Node, property: &str, value: &str);

    /// Smooth-scroll `node` to the start of the viewport.
    fn scroll_into_view(&self, node: &Self::Node);

    /// `location.pathname`.
    fn location_path(&self) -> String;
    /// Point `location.href` at `href`.
    fn navigate(&self, href: &str);

    /// True once the initial document has been parsed.
    fn is_ready(&self) -> bool;

    fn create_element(&self, tag: &str) -> Result<Self::Node, PageError>;
    fn set_text(&self, node: &Self::Node, text: &str);
    fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<(), PageError>;
    fn append_to_body(&self, child: &Self::Node) -> Result<(), PageError>;
    fn remove(&self, node: &Self::Node);
    /// Whether `node` currently has a parent.
    fn is_attached(&self, node: &Self::Node) -> bool;

    /// Run `callback` once after `delay`.
    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>);

    fn listen(&self, target: ListenTarget<'_, Self::Node>, kind: EventKind, listener: Listener);

    fn observe_intersections(
        &self,
        options: &ObserverOptions,
        targets: &[Self::Node],
        callback: IntersectionCallback<Self::Node>,
    ) -> Result<Self::Observer, PageError>;
    fn unobserve(&self, observer: &Self::Observer, node: &Self::Node);
    fn disconnect(&self, observer: &Self::Observer);

    /// POST the form's fields to its action URL and decode the JSON reply.
    /// The HTTP status is not checked.
    fn post_form(&self, form: &Self::Node) -> PageFuture<'_, serde_json::Value>;

    /// GET `endpoint`; non-2xx statuses fail with `PageError::Http`.
    fn get_json(&self, endpoint: &str) -> PageFuture<'_, serde_json::Value>;
}
