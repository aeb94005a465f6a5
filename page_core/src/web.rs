// Browser host: `Page` over web-sys. Listener closures and observers are
// owned here so they can be released on dispose.

use std::cell::RefCell;
use std::time::Duration;

use gloo_timers::callback::Timeout;
use js_sys::{Array, Function, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Document, Element, Event, EventTarget, FormData, HtmlButtonElement,
    HtmlElement, HtmlFormElement, HtmlInputElement, HtmlTextAreaElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, KeyboardEvent, RequestInit, Response,
    ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition, Window,
};

use crate::error::PageError;
use crate::page::{IntersectionCallback, Listener, Page, PageFuture};
use crate::tooltips::TooltipToolkit;
use crate::types::{
    DomEvent, EventKind, IntersectionEntry, ListenTarget, Modifiers, ObserverOptions,
};

/// Best-effort text for a thrown JS value.
fn describe(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

fn dom_err(value: JsValue) -> PageError {
    PageError::Dom(describe(&value))
}

fn network_err(value: JsValue) -> PageError {
    PageError::Network(describe(&value))
}

fn decode_err(value: JsValue) -> PageError {
    PageError::Decode(describe(&value))
}

fn dom_event(kind: EventKind, event: &Event) -> DomEvent {
    match event.dyn_ref::<KeyboardEvent>() {
        Some(key) => DomEvent {
            kind,
            key: Some(key.key()),
            modifiers: Modifiers {
                alt: key.alt_key(),
                ctrl: key.ctrl_key(),
                shift: key.shift_key(),
                meta: key.meta_key(),
            },
        },
        None => DomEvent::new(kind),
    }
}

struct Registration {
    target: EventTarget,
    kind: EventKind,
    closure: Closure<dyn FnMut(Event)>,
}

/// Live observer plus the closure it calls back into.
pub struct WebObserver {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

/// The page this module was loaded into.
pub struct WebPage {
    window: Window,
    document: Document,
    listeners: RefCell<Vec<Registration>>,
}

impl WebPage {
    pub fn new() -> Result<Self, PageError> {
        let window =
            web_sys::window().ok_or_else(|| PageError::Dom("no global window".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| PageError::Dom("window has no document".to_string()))?;

        Ok(WebPage {
            window,
            document,
            listeners: RefCell::new(Vec::new()),
        })
    }

    /// Remove every listener registered through this page.
    pub fn detach_listeners(&self) {
        for registration in self.listeners.borrow_mut().drain(..) {
            let _ = registration.target.remove_event_listener_with_callback(
                registration.kind.as_str(),
                registration.closure.as_ref().unchecked_ref(),
            );
        }
    }

    async fn fetch(&self, url: &str, init: &RequestInit) -> Result<Response, PageError> {
        let response = JsFuture::from(self.window.fetch_with_str_and_init(url, init))
            .await
            .map_err(network_err)?;
        response.dyn_into::<Response>().map_err(network_err)
    }
}

async fn read_json(response: Response) -> Result<serde_json::Value, PageError> {
    let body = JsFuture::from(response.json().map_err(decode_err)?)
        .await
        .map_err(decode_err)?;
    let text: String = js_sys::JSON::stringify(&body).map_err(decode_err)?.into();
    Ok(serde_json::from_str(&text)?)
}

impl Page for WebPage {
    type Node = Element;
    type Observer = WebObserver;

    fn query_all(&self, scope: Option<&Element>, selector: &str) -> Vec<Element> {
        let list = match scope {
            Some(scope) => scope.query_selector_all(selector),
            None => self.document.query_selector_all(selector),
        };
        let Ok(list) = list else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|index| list.get(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn query(&self, scope: Option<&Element>, selector: &str) -> Option<Element> {
        let found = match scope {
            Some(scope) => scope.query_selector(selector),
            None => self.document.query_selector(selector),
        };
        found.ok().flatten()
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&self, node: &Element, name: &str, value: &str) {
        let _ = node.set_attribute(name, value);
    }

    fn check_validity(&self, node: &Element) -> bool {
        if let Some(form) = node.dyn_ref::<HtmlFormElement>() {
            form.check_validity()
        } else if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            input.check_validity()
        } else if let Some(area) = node.dyn_ref::<HtmlTextAreaElement>() {
            area.check_validity()
        } else {
            true
        }
    }

    fn add_class(&self, node: &Element, class: &str) {
        let _ = node.class_list().add_1(class);
    }

    fn remove_class(&self, node: &Element, class: &str) {
        let _ = node.class_list().remove_1(class);
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn set_disabled(&self, node: &Element, disabled: bool) {
        if let Some(button) = node.dyn_ref::<HtmlButtonElement>() {
            button.set_disabled(disabled);
        } else if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            input.set_disabled(disabled);
        } else if disabled {
            let _ = node.set_attribute("disabled", "");
        } else {
            let _ = node.remove_attribute("disabled");
        }
    }

    fn set_style(&self, node: &Element, property: &str, value: &str) {
        if let Some(element) = node.dyn_ref::<HtmlElement>() {
            let _ = element.style().set_property(property, value);
        }
    }

    fn scroll_into_view(&self, node: &Element) {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Start);
        node.scroll_into_view_with_scroll_into_view_options(&options);
    }

    fn location_path(&self) -> String {
        self.window.location().pathname().unwrap_or_default()
    }

    fn navigate(&self, href: &str) {
        let _ = self.window.location().set_href(href);
    }

    fn is_ready(&self) -> bool {
        self.document.ready_state() != "loading"
    }

    fn create_element(&self, tag: &str) -> Result<Element, PageError> {
        self.document.create_element(tag).map_err(dom_err)
    }

    fn set_text(&self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn append_child(&self, parent: &Element, child: &Element) -> Result<(), PageError> {
        parent.append_child(child).map(|_| ()).map_err(dom_err)
    }

    fn append_to_body(&self, child: &Element) -> Result<(), PageError> {
        let body = self
            .document
            .body()
            .ok_or_else(|| PageError::Dom("document has no body".to_string()))?;
        body.append_child(child).map(|_| ()).map_err(dom_err)
    }

    fn remove(&self, node: &Element) {
        node.remove();
    }

    fn is_attached(&self, node: &Element) -> bool {
        node.parent_node().is_some()
    }

    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(millis, move || callback()).forget();
    }

    fn listen(&self, target: ListenTarget<'_, Element>, kind: EventKind, listener: Listener) {
        let target: EventTarget = match target {
            ListenTarget::Document => self.document.clone().into(),
            ListenTarget::Element(node) => node.clone().into(),
        };

        let mut listener = listener;
        let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let response = listener(&dom_event(kind, &event));
            if response.prevent_default {
                event.prevent_default();
            }
            if response.stop_propagation {
                event.stop_propagation();
            }
        });

        if let Err(err) =
            target.add_event_listener_with_callback(kind.as_str(), closure.as_ref().unchecked_ref())
        {
            tracing::warn!(event = kind.as_str(), error = %describe(&err), "could not add listener");
            return;
        }
        self.listeners.borrow_mut().push(Registration {
            target,
            kind,
            closure,
        });
    }

    fn observe_intersections(
        &self,
        options: &ObserverOptions,
        targets: &[Element],
        callback: IntersectionCallback<Element>,
    ) -> Result<WebObserver, PageError> {
        let mut callback = callback;
        let closure = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            move |entries: Array, _observer: IntersectionObserver| {
                let batch = entries
                    .iter()
                    .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                    .map(|entry| IntersectionEntry {
                        target: entry.target(),
                        is_intersecting: entry.is_intersecting(),
                    })
                    .collect();
                callback(batch);
            },
        );

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin);
        let observer =
            IntersectionObserver::new_with_options(closure.as_ref().unchecked_ref(), &init)
                .map_err(dom_err)?;
        for target in targets {
            observer.observe(target);
        }

        Ok(WebObserver {
            observer,
            _callback: closure,
        })
    }

    fn unobserve(&self, observer: &WebObserver, node: &Element) {
        observer.observer.unobserve(node);
    }

    fn disconnect(&self, observer: &WebObserver) {
        observer.observer.disconnect();
    }

    fn post_form(&self, form: &Element) -> PageFuture<'_, serde_json::Value> {
        let form = form.clone();
        Box::pin(async move {
            let form = form
                .dyn_into::<HtmlFormElement>()
                .map_err(|_| PageError::Dom("AJAX submission needs a <form>".to_string()))?;
            let data = FormData::new_with_form(&form).map_err(dom_err)?;

            let init = RequestInit::new();
            init.set_method("POST");
            init.set_body(&data);
            let response = self.fetch(&form.action(), &init).await?;
            read_json(response).await
        })
    }

    fn get_json(&self, endpoint: &str) -> PageFuture<'_, serde_json::Value> {
        let endpoint = endpoint.to_string();
        Box::pin(async move {
            let init = RequestInit::new();
            init.set_method("GET");
            let response = self.fetch(&endpoint, &init).await?;
            if !response.ok() {
                return Err(PageError::Http {
                    status: response.status(),
                });
            }
            read_json(response).await
        })
    }
}

/// Bootstrap's `Tooltip` constructor, when the page loaded Bootstrap.
pub struct BootstrapTooltips {
    constructor: Function,
}

impl BootstrapTooltips {
    /// Look up `bootstrap.Tooltip` on the global object.
    pub fn detect() -> Option<Self> {
        let bootstrap = Reflect::get(&js_sys::global(), &JsValue::from_str("bootstrap")).ok()?;
        if bootstrap.is_undefined() || bootstrap.is_null() {
            return None;
        }
        let constructor = Reflect::get(&bootstrap, &JsValue::from_str("Tooltip"))
            .ok()?
            .dyn_into::<Function>()
            .ok()?;
        Some(BootstrapTooltips { constructor })
    }
}

impl TooltipToolkit<Element> for BootstrapTooltips {
    fn attach(&self, element: &Element) -> Result<(), PageError> {
        Reflect::construct(&self.constructor, &Array::of1(element))
            .map(|_| ())
            .map_err(dom_err)
    }
}
