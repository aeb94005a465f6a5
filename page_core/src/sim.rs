// In-memory page. Deterministic stand-in for the browser used by the tests:
// element tree, selector matching, listener dispatch, virtual timers,
// scripted intersection reports and canned JSON responses.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::time::Duration;

use crate::error::PageError;
use crate::page::{IntersectionCallback, Listener, Page, PageFuture};
use crate::types::{
    DomEvent, EventKind, EventResponse, IntersectionEntry, ListenTarget, Modifiers,
    ObserverOptions,
};

/// Element handle inside a [`SimPage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Observer handle inside a [`SimPage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimObserverId(usize);

/// A request the page issued.
#[derive(Debug, Clone, PartialEq)]
pub struct SimRequest {
    pub method: &'static str,
    pub url: String,
    pub fields: Vec<(String, String)>,
}

#[derive(Debug, Default)]
struct SimElement {
    tag: String,
    attrs: Vec<(String, String)>,
    classes: Vec<String>,
    styles: Vec<(String, String)>,
    text: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    disabled: bool,
    invalid: bool,
}

struct Registered {
    target: Option<NodeId>,
    kind: EventKind,
    listener: Rc<RefCell<Listener>>,
}

struct SimObserver {
    options: ObserverOptions,
    targets: Vec<NodeId>,
    callback: Rc<RefCell<IntersectionCallback<NodeId>>>,
    connected: bool,
}

struct Timer {
    due: Duration,
    seq: u64,
    callback: Box<dyn FnOnce()>,
}

/// Simulated document.
pub struct SimPage {
    elements: RefCell<Vec<SimElement>>,
    root: NodeId,
    body: NodeId,
    path: RefCell<String>,
    ready: Cell<bool>,
    navigations: RefCell<Vec<String>>,
    submissions: RefCell<Vec<NodeId>>,
    scrolled: RefCell<Vec<NodeId>>,
    listeners: RefCell<Vec<Registered>>,
    observers: RefCell<Vec<SimObserver>>,
    timers: RefCell<Vec<Timer>>,
    now: Cell<Duration>,
    next_timer_seq: Cell<u64>,
    responses: RefCell<HashMap<String, VecDeque<Result<serde_json::Value, PageError>>>>,
    requests: RefCell<Vec<SimRequest>>,
}

impl SimPage {
    /// Empty parsed document (`<html><body></body></html>`) served at `path`.
    pub fn new(path: &str) -> Self {
        let root = SimElement {
            tag: "html".to_string(),
            children: vec![NodeId(1)],
            ..SimElement::default()
        };
        let body = SimElement {
            tag: "body".to_string(),
            parent: Some(NodeId(0)),
            ..SimElement::default()
        };

        SimPage {
            elements: RefCell::new(vec![root, body]),
            root: NodeId(0),
            body: NodeId(1),
            path: RefCell::new(path.to_string()),
            ready: Cell::new(true),
            navigations: RefCell::new(Vec::new()),
            submissions: RefCell::new(Vec::new()),
            scrolled: RefCell::new(Vec::new()),
            listeners: RefCell::new(Vec::new()),
            observers: RefCell::new(Vec::new()),
            timers: RefCell::new(Vec::new()),
            now: Cell::new(Duration::ZERO),
            next_timer_seq: Cell::new(0),
            responses: RefCell::new(HashMap::new()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Build `<tag attrs...>` under `parent`. A `class` attribute also
    /// populates the class list.
    pub fn element(&self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let node = self.new_node(tag);
        for (name, value) in attrs {
            self.set_attribute(&node, name, value);
        }
        self.attach(parent, node);
        node
    }

    /// Mark a field as failing (or passing) constraint validation.
    pub fn set_valid(&self, node: NodeId, valid: bool) {
        self.elements.borrow_mut()[node.0].invalid = !valid;
    }

    /// Mark the document as still loading or parsed.
    pub fn set_ready(&self, ready: bool) {
        self.ready.set(ready);
    }

    /// Finish parsing and fire `DOMContentLoaded` on the document.
    pub fn finish_loading(&self) -> EventResponse {
        self.ready.set(true);
        self.dispatch(None, &DomEvent::new(EventKind::DomContentLoaded))
    }

    pub fn tag(&self, node: NodeId) -> String {
        self.elements.borrow()[node.0].tag.clone()
    }

    pub fn classes(&self, node: NodeId) -> Vec<String> {
        self.elements.borrow()[node.0].classes.clone()
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.elements.borrow()[node.0]
            .styles
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.clone())
    }

    pub fn is_disabled(&self, node: NodeId) -> bool {
        self.elements.borrow()[node.0].disabled
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.elements.borrow()[node.0].children.clone()
    }

    /// Concatenated text of `node` and its descendants.
    pub fn text_content(&self, node: NodeId) -> String {
        let elements = self.elements.borrow();
        let mut out = String::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            let element = &elements[current.0];
            out.push_str(&element.text);
            stack.extend(element.children.iter().rev());
        }
        out
    }

    /// Deliver `event` to listeners registered on `target` (`None` for the
    /// document) and merge their responses.
    pub fn dispatch(&self, target: Option<NodeId>, event: &DomEvent) -> EventResponse {
        let matching: Vec<Rc<RefCell<Listener>>> = self
            .listeners
            .borrow()
            .iter()
            .filter(|registered| registered.target == target && registered.kind == event.kind)
            .map(|registered| registered.listener.clone())
            .collect();

        matching.iter().fold(EventResponse::PROCEED, |acc, listener| {
            acc.merge((&mut *listener.borrow_mut())(event))
        })
    }

    /// Submit `form`. Unless a listener prevents it, the submission is recorded.
    pub fn submit(&self, form: NodeId) -> EventResponse {
        let response = self.dispatch(Some(form), &DomEvent::new(EventKind::Submit));
        if !response.prevent_default {
            self.submissions.borrow_mut().push(form);
        }
        response
    }

    pub fn blur(&self, node: NodeId) -> EventResponse {
        self.dispatch(Some(node), &DomEvent::new(EventKind::Blur))
    }

    /// Click `node`. Unprevented clicks on links follow their href.
    pub fn click(&self, node: NodeId) -> EventResponse {
        let response = self.dispatch(Some(node), &DomEvent::new(EventKind::Click));
        if !response.prevent_default {
            if let Some(href) = self.attribute(&node, "href") {
                self.navigate(&href);
            }
        }
        response
    }

    pub fn key_down(&self, key: &str, modifiers: Modifiers) -> EventResponse {
        self.dispatch(None, &DomEvent::key_down(key, modifiers))
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Report `node` entering or leaving the viewport to every connected
    /// observer watching it.
    pub fn report_intersection(&self, node: NodeId, is_intersecting: bool) {
        let callbacks: Vec<_> = self
            .observers
            .borrow()
            .iter()
            .filter(|observer| observer.connected && observer.targets.contains(&node))
            .map(|observer| observer.callback.clone())
            .collect();

        for callback in callbacks {
            (&mut *callback.borrow_mut())(vec![IntersectionEntry {
                target: node,
                is_intersecting,
            }]);
        }
    }

    pub fn is_observed(&self, node: NodeId) -> bool {
        self.observers
            .borrow()
            .iter()
            .any(|observer| observer.connected && observer.targets.contains(&node))
    }

    pub fn observer_options(&self, observer: SimObserverId) -> ObserverOptions {
        self.observers.borrow()[observer.0].options.clone()
    }

    pub fn is_connected(&self, observer: SimObserverId) -> bool {
        self.observers.borrow()[observer.0].connected
    }

    /// Queue the reply for the next request to `url`.
    pub fn respond(&self, url: &str, reply: Result<serde_json::Value, PageError>) {
        self.responses
            .borrow_mut()
            .entry(url.to_string())
            .or_default()
            .push_back(reply);
    }

    pub fn requests(&self) -> Vec<SimRequest> {
        self.requests.borrow().clone()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.borrow().clone()
    }

    pub fn submissions(&self) -> Vec<NodeId> {
        self.submissions.borrow().clone()
    }

    pub fn scrolled(&self) -> Vec<NodeId> {
        self.scrolled.borrow().clone()
    }

    pub fn now(&self) -> Duration {
        self.now.get()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Move the virtual clock forward, firing due timers in order.
    pub fn advance(&self, by: Duration) {
        let target = self.now.get() + by;
        loop {
            let next = {
                let mut timers = self.timers.borrow_mut();
                let index = timers
                    .iter()
                    .enumerate()
                    .filter(|(_, timer)| timer.due <= target)
                    .min_by_key(|(_, timer)| (timer.due, timer.seq))
                    .map(|(index, _)| index);
                index.map(|index| timers.remove(index))
            };
            match next {
                Some(timer) => {
                    self.now.set(timer.due);
                    (timer.callback)();
                }
                None => break,
            }
        }
        self.now.set(target);
    }

    fn new_node(&self, tag: &str) -> NodeId {
        let mut elements = self.elements.borrow_mut();
        elements.push(SimElement {
            tag: tag.to_ascii_lowercase(),
            ..SimElement::default()
        });
        NodeId(elements.len() - 1)
    }

    fn attach(&self, parent: NodeId, child: NodeId) {
        self.detach(child);
        let mut elements = self.elements.borrow_mut();
        elements[child.0].parent = Some(parent);
        elements[parent.0].children.push(child);
    }

    fn detach(&self, node: NodeId) {
        let mut elements = self.elements.borrow_mut();
        if let Some(parent) = elements[node.0].parent.take() {
            elements[parent.0].children.retain(|child| *child != node);
        }
    }

    /// Pre-order walk below `scope` (exclusive) or the whole document.
    fn descendants(&self, scope: Option<NodeId>) -> Vec<NodeId> {
        let elements = self.elements.borrow();
        let mut out = Vec::new();
        let mut stack = match scope {
            Some(scope) => elements[scope.0].children.iter().rev().copied().collect(),
            None => vec![self.root],
        };
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(elements[node.0].children.iter().rev());
        }
        out
    }

    fn is_field(&self, node: NodeId) -> bool {
        matches!(
            self.elements.borrow()[node.0].tag.as_str(),
            "input" | "textarea" | "select"
        )
    }

    fn form_fields(&self, form: NodeId) -> Vec<(String, String)> {
        self.descendants(Some(form))
            .into_iter()
            .filter(|node| self.is_field(*node))
            .filter_map(|node| {
                let name = self.attribute(&node, "name")?;
                let value = self.attribute(&node, "value").unwrap_or_default();
                Some((name, value))
            })
            .collect()
    }

    fn take_response(&self, url: &str) -> Result<serde_json::Value, PageError> {
        self.responses
            .borrow_mut()
            .get_mut(url)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(PageError::Network(format!("no route to {url}"))))
    }

    fn matches(&self, node: NodeId, complex: &[Compound]) -> bool {
        let elements = self.elements.borrow();
        let Some((last, ancestors)) = complex.split_last() else {
            return false;
        };
        if !last.matches(&elements[node.0]) {
            return false;
        }

        let mut current = elements[node.0].parent;
        for compound in ancestors.iter().rev() {
            loop {
                let Some(candidate) = current else {
                    return false;
                };
                current = elements[candidate.0].parent;
                if compound.matches(&elements[candidate.0]) {
                    break;
                }
            }
        }
        true
    }
}

impl Page for SimPage {
    type Node = NodeId;
    type Observer = SimObserverId;

    fn query_all(&self, scope: Option<&NodeId>, selector: &str) -> Vec<NodeId> {
        let Some(list) = parse_selector_list(selector) else {
            return Vec::new();
        };
        self.descendants(scope.copied())
            .into_iter()
            .filter(|node| list.iter().any(|complex| self.matches(*node, complex)))
            .collect()
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.elements.borrow()[node.0]
            .attrs
            .iter()
            .find(|(attr, _)| attr == name)
            .map(|(_, value)| value.clone())
    }

    fn set_attribute(&self, node: &NodeId, name: &str, value: &str) {
        let mut elements = self.elements.borrow_mut();
        let element = &mut elements[node.0];
        match element.attrs.iter_mut().find(|(attr, _)| attr == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => element.attrs.push((name.to_string(), value.to_string())),
        }
        match name {
            "class" => {
                element.classes = value.split_whitespace().map(str::to_string).collect();
            }
            "disabled" => element.disabled = true,
            _ => {}
        }
    }

    fn check_validity(&self, node: &NodeId) -> bool {
        if self.elements.borrow()[node.0].invalid {
            return false;
        }
        if self.tag(*node) != "form" {
            return true;
        }
        let elements = self.elements.borrow();
        self.descendants(Some(*node))
            .into_iter()
            .all(|field| !elements[field.0].invalid)
    }

    fn add_class(&self, node: &NodeId, class: &str) {
        let mut elements = self.elements.borrow_mut();
        let classes = &mut elements[node.0].classes;
        if !classes.iter().any(|existing| existing == class) {
            classes.push(class.to_string());
        }
    }

    fn remove_class(&self, node: &NodeId, class: &str) {
        self.elements.borrow_mut()[node.0]
            .classes
            .retain(|existing| existing != class);
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.elements.borrow()[node.0]
            .classes
            .iter()
            .any(|existing| existing == class)
    }

    fn set_disabled(&self, node: &NodeId, disabled: bool) {
        self.elements.borrow_mut()[node.0].disabled = disabled;
    }

    fn set_style(&self, node: &NodeId, property: &str, value: &str) {
        let mut elements = self.elements.borrow_mut();
        let styles = &mut elements[node.0].styles;
        match styles.iter_mut().find(|(name, _)| name == property) {
            Some((_, existing)) => *existing = value.to_string(),
            None => styles.push((property.to_string(), value.to_string())),
        }
    }

    fn scroll_into_view(&self, node: &NodeId) {
        self.scrolled.borrow_mut().push(*node);
    }

    fn location_path(&self) -> String {
        self.path.borrow().clone()
    }

    fn navigate(&self, href: &str) {
        self.navigations.borrow_mut().push(href.to_string());
        if href.starts_with('/') {
            *self.path.borrow_mut() = href.to_string();
        }
    }

    fn is_ready(&self) -> bool {
        self.ready.get()
    }

    fn create_element(&self, tag: &str) -> Result<NodeId, PageError> {
        Ok(self.new_node(tag))
    }

    fn set_text(&self, node: &NodeId, text: &str) {
        let children = {
            let mut elements = self.elements.borrow_mut();
            elements[node.0].text = text.to_string();
            elements[node.0].children.clone()
        };
        for child in children {
            self.detach(child);
        }
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> Result<(), PageError> {
        if parent == child {
            return Err(PageError::Dom("cannot append a node to itself".to_string()));
        }
        self.attach(*parent, *child);
        Ok(())
    }

    fn append_to_body(&self, child: &NodeId) -> Result<(), PageError> {
        self.attach(self.body, *child);
        Ok(())
    }

    fn remove(&self, node: &NodeId) {
        self.detach(*node);
    }

    fn is_attached(&self, node: &NodeId) -> bool {
        self.elements.borrow()[node.0].parent.is_some()
    }

    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) {
        let seq = self.next_timer_seq.get();
        self.next_timer_seq.set(seq + 1);
        self.timers.borrow_mut().push(Timer {
            due: self.now.get() + delay,
            seq,
            callback,
        });
    }

    fn listen(&self, target: ListenTarget<'_, NodeId>, kind: EventKind, listener: Listener) {
        let target = match target {
            ListenTarget::Document => None,
            ListenTarget::Element(node) => Some(*node),
        };
        self.listeners.borrow_mut().push(Registered {
            target,
            kind,
            listener: Rc::new(RefCell::new(listener)),
        });
    }

    fn observe_intersections(
        &self,
        options: &ObserverOptions,
        targets: &[NodeId],
        callback: IntersectionCallback<NodeId>,
    ) -> Result<SimObserverId, PageError> {
        let mut observers = self.observers.borrow_mut();
        observers.push(SimObserver {
            options: options.clone(),
            targets: targets.to_vec(),
            callback: Rc::new(RefCell::new(callback)),
            connected: true,
        });
        Ok(SimObserverId(observers.len() - 1))
    }

    fn unobserve(&self, observer: &SimObserverId, node: &NodeId) {
        self.observers.borrow_mut()[observer.0]
            .targets
            .retain(|target| target != node);
    }

    fn disconnect(&self, observer: &SimObserverId) {
        let mut observers = self.observers.borrow_mut();
        let observer = &mut observers[observer.0];
        observer.connected = false;
        observer.targets.clear();
    }

    fn post_form(&self, form: &NodeId) -> PageFuture<'_, serde_json::Value> {
        let url = self
            .attribute(form, "action")
            .unwrap_or_else(|| self.location_path());
        self.requests.borrow_mut().push(SimRequest {
            method: "POST",
            url: url.clone(),
            fields: self.form_fields(*form),
        });
        Box::pin(std::future::ready(self.take_response(&url)))
    }

    fn get_json(&self, endpoint: &str) -> PageFuture<'_, serde_json::Value> {
        self.requests.borrow_mut().push(SimRequest {
            method: "GET",
            url: endpoint.to_string(),
            fields: Vec::new(),
        });
        Box::pin(std::future::ready(self.take_response(endpoint)))
    }
}

// Selector subset: tag, `*`, `.class`, `#id`, `[attr]`, `[attr="v"]`,
// `[attr^="v"]`, descendant combinator, comma lists.

#[derive(Debug, Clone, PartialEq)]
enum AttrOp {
    Exists,
    Equals(String),
    Prefix(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
struct Compound {
    tag: Option<String>,
    ids: Vec<String>,
    classes: Vec<String>,
    attrs: Vec<(String, AttrOp)>,
}

impl Compound {
    fn matches(&self, element: &SimElement) -> bool {
        let attr = |name: &str| {
            element
                .attrs
                .iter()
                .find(|(attr, _)| attr == name)
                .map(|(_, value)| value.as_str())
        };

        self.tag.as_ref().map_or(true, |tag| *tag == element.tag)
            && self.ids.iter().all(|id| attr("id") == Some(id.as_str()))
            && self
                .classes
                .iter()
                .all(|class| element.classes.iter().any(|existing| existing == class))
            && self.attrs.iter().all(|(name, op)| match (op, attr(name)) {
                (_, None) => false,
                (AttrOp::Exists, Some(_)) => true,
                (AttrOp::Equals(expected), Some(value)) => value == expected,
                (AttrOp::Prefix(prefix), Some(value)) => value.starts_with(prefix.as_str()),
            })
    }
}

fn parse_selector_list(selector: &str) -> Option<Vec<Vec<Compound>>> {
    split_outside_brackets(selector, |c| c == ',')
        .into_iter()
        .map(|complex| {
            let compounds: Option<Vec<Compound>> =
                split_outside_brackets(complex, char::is_whitespace)
                    .into_iter()
                    .filter(|part| !part.is_empty())
                    .map(parse_compound)
                    .collect();
            compounds.filter(|compounds| !compounds.is_empty())
        })
        .collect()
}

fn split_outside_brackets(input: &str, is_separator: impl Fn(char) -> bool) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (index, c) in input.char_indices() {
        match (quote, c) {
            (Some(open), c) if c == open => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, c) if depth == 0 && is_separator(c) => {
                parts.push(&input[start..index]);
                start = index + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts.into_iter().map(str::trim).collect()
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn take_ident(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<String> {
    let mut ident = String::new();
    while let Some(&c) = chars.peek() {
        if !is_ident_char(c) {
            break;
        }
        ident.push(c);
        chars.next();
    }
    (!ident.is_empty()).then_some(ident)
}

fn parse_compound(input: &str) -> Option<Compound> {
    let mut compound = Compound::default();
    let mut chars = input.chars().peekable();

    if chars.peek() == Some(&'*') {
        chars.next();
    } else if chars.peek().copied().is_some_and(is_ident_char) {
        compound.tag = Some(take_ident(&mut chars)?.to_ascii_lowercase());
    }

    while let Some(c) = chars.next() {
        match c {
            '.' => compound.classes.push(take_ident(&mut chars)?),
            '#' => compound.ids.push(take_ident(&mut chars)?),
            '[' => {
                let body: String = chars.by_ref().take_while(|c| *c != ']').collect();
                compound.attrs.push(parse_attribute(&body)?);
            }
            _ => return None,
        }
    }
    Some(compound)
}

fn parse_attribute(body: &str) -> Option<(String, AttrOp)> {
    let unquote = |value: &str| {
        let value = value.trim();
        value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
            .unwrap_or(value)
            .to_string()
    };

    if let Some((name, value)) = body.split_once("^=") {
        return Some((name.trim().to_string(), AttrOp::Prefix(unquote(value))));
    }
    if let Some((name, value)) = body.split_once('=') {
        return Some((name.trim().to_string(), AttrOp::Equals(unquote(value))));
    }
    let name = body.trim();
    (!name.is_empty() && name.chars().all(is_ident_char))
        .then(|| (name.to_string(), AttrOp::Exists))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descendant_selectors_respect_ancestry() {
        let page = SimPage::new("/");
        let nav = page.element(page.body(), "ul", &[("class", "navbar-nav")]);
        let inside = page.element(nav, "a", &[("class", "nav-link"), ("href", "/")]);
        let outside = page.element(page.body(), "a", &[("class", "nav-link")]);

        assert_eq!(page.query_all(None, ".navbar-nav .nav-link"), vec![inside]);
        assert_eq!(page.query_all(None, "a.nav-link"), vec![inside, outside]);
    }

    #[test]
    fn attribute_selectors() {
        let page = SimPage::new("/");
        let fragment = page.element(page.body(), "a", &[("href", "#top")]);
        let _absolute = page.element(page.body(), "a", &[("href", "/about")]);
        let tip = page.element(page.body(), "span", &[("data-bs-toggle", "tooltip")]);

        assert_eq!(page.query_all(None, r##"a[href^="#"]"##), vec![fragment]);
        assert_eq!(page.query_all(None, r#"[data-bs-toggle="tooltip"]"#), vec![tip]);
        assert_eq!(page.query_all(None, "[data-bs-toggle]"), vec![tip]);
    }

    #[test]
    fn selector_lists_keep_document_order() {
        let page = SimPage::new("/");
        let form = page.element(page.body(), "form", &[]);
        let area = page.element(form, "textarea", &[]);
        let input = page.element(form, "input", &[]);

        assert_eq!(page.query_all(Some(&form), "input, textarea"), vec![area, input]);
    }

    #[test]
    fn invalid_selectors_match_nothing() {
        let page = SimPage::new("/");
        page.element(page.body(), "div", &[("id", "x")]);
        assert!(page.query(None, "#").is_none());
        assert!(page.query(None, "div > p").is_none());
        assert!(page.query(None, "#x").is_some());
    }

    #[test]
    fn timers_fire_in_due_order() {
        let page = SimPage::new("/");
        let fired = Rc::new(RefCell::new(Vec::new()));
        for (delay, label) in [(300u64, "late"), (100, "early")] {
            let fired = fired.clone();
            page.set_timeout(
                Duration::from_millis(delay),
                Box::new(move || fired.borrow_mut().push(label)),
            );
        }

        page.advance(Duration::from_millis(99));
        assert!(fired.borrow().is_empty());
        page.advance(Duration::from_millis(300));
        assert_eq!(*fired.borrow(), vec!["early", "late"]);
        assert_eq!(page.pending_timers(), 0);
    }

    #[test]
    fn form_validity_covers_fields() {
        let page = SimPage::new("/");
        let form = page.element(page.body(), "form", &[]);
        let input = page.element(form, "input", &[]);
        assert!(page.check_validity(&form));
        page.set_valid(input, false);
        assert!(!page.check_validity(&form));
    }
}
