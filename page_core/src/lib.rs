// page_core: Finger Web Rust/WASM page enhancements.
// All page behaviour lives here; the JS side only loads the module and calls `install`.

mod ajax;
mod enhancer;
mod error;
mod forms;
mod logging;
mod nav;
mod notify;
mod page;
mod reveal;
mod shortcuts;
#[cfg(test)]
mod sim;
mod tooltips;
mod types;
#[cfg(target_arch = "wasm32")]
mod web;

use wasm_bindgen::prelude::*;

pub use ajax::{fetch_api, submit_form_ajax, SubmitOutcome, SubmitResponse, SuccessCallback};
pub use enhancer::{PageEnhancer, APP_NAME};
pub use error::PageError;
pub use forms::{clear_loading, on_blur, on_submit, FormEnhancer};
pub use logging::{init as init_logging, ConsoleLayer, ConsoleSink};
pub use nav::{highlight_active_links, is_active_link, on_anchor_click, NavigationEnhancer};
pub use notify::{notification_class, show_notification, NOTIFICATION_LIFETIME};
pub use page::{IntersectionCallback, Listener, Page, PageFuture};
pub use reveal::{reveal, RevealHandle, ScrollAnimator};
pub use shortcuts::{Shortcut, ShortcutHandler, SHORTCUTS};
pub use tooltips::{activate_tooltips, TooltipToolkit};
pub use types::*;
#[cfg(target_arch = "wasm32")]
pub use web::{BootstrapTooltips, WebPage};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Parse the JSON page configuration handed over by JS.
pub fn parse_config(config_json: &str) -> Result<PageConfig, PageError> {
    serde_json::from_str(config_json).map_err(|e| PageError::InvalidConfig(e.to_string()))
}

/// Page enhancer exposed to JavaScript as `FingerWeb`.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = FingerWeb)]
pub struct WasmPageEnhancer {
    inner: PageEnhancer<WebPage>,
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_class = FingerWeb)]
impl WasmPageEnhancer {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<WasmPageEnhancer, JsValue> {
        let config = parse_config(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        init_logging(config.log_level);

        let page = WebPage::new().map_err(|e| JsValue::from_str(&e.to_string()))?;
        let mut inner = PageEnhancer::new(std::rc::Rc::new(page), config);
        if let Some(tooltips) = BootstrapTooltips::detect() {
            inner = inner.with_tooltips(std::rc::Rc::new(tooltips));
        }
        Ok(WasmPageEnhancer { inner })
    }

    /// Wire all enhancements, waiting for `DOMContentLoaded` if needed.
    pub fn install(&mut self) {
        self.inner.install();
    }

    /// Stop the card observer and remove every listener.
    pub fn dispose(&self) {
        self.inner.dispose();
        self.inner.page().detach_listeners();
    }

    /// Show a transient banner. `kind` defaults to `info`.
    #[wasm_bindgen(js_name = showNotification)]
    pub fn show_notification(&self, message: &str, kind: Option<String>) -> Result<(), JsValue> {
        let severity = kind.as_deref().map(Severity::parse).unwrap_or_default();
        show_notification(self.inner.page(), message, severity)
            .map(|_| ())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Submit `form` without navigating. Resolves to `true` when the server
    /// accepted it; `success_callback` receives the parsed reply.
    #[wasm_bindgen(js_name = submitFormAjax)]
    pub fn submit_form_ajax(
        &self,
        form: web_sys::HtmlFormElement,
        success_callback: Option<js_sys::Function>,
    ) -> js_sys::Promise {
        let page = self.inner.page().clone();
        let on_success = success_callback.map(|callback| -> SuccessCallback {
            Box::new(move |payload: &serde_json::Value| {
                deliver_reply(&callback, payload);
            })
        });

        wasm_bindgen_futures::future_to_promise(async move {
            let outcome = submit_form_ajax(page, form.into(), on_success).await;
            Ok(JsValue::from_bool(matches!(outcome, SubmitOutcome::Accepted(_))))
        })
    }

    /// GET a JSON endpoint. Resolves to the payload or `null` on failure.
    #[wasm_bindgen(js_name = fetchApi)]
    pub fn fetch_api(&self, endpoint: String) -> js_sys::Promise {
        let page = self.inner.page().clone();
        wasm_bindgen_futures::future_to_promise(async move {
            match fetch_api(page, &endpoint).await {
                Some(payload) => json_to_js(&payload),
                None => Ok(JsValue::NULL),
            }
        })
    }
}

/// Call the JS success callback with the reply. Returns whether it ran cleanly;
/// conversion and callback failures are logged.
#[cfg(target_arch = "wasm32")]
fn deliver_reply(callback: &js_sys::Function, payload: &serde_json::Value) -> bool {
    let value = match json_to_js(payload) {
        Ok(value) => value,
        Err(err) => {
            tracing::error!(error = ?err, "could not hand reply to success callback");
            return false;
        }
    };
    match callback.call1(&JsValue::NULL, &value) {
        Ok(_) => true,
        Err(err) => {
            tracing::error!(error = ?err, "success callback threw");
            false
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn json_to_js(payload: &serde_json::Value) -> Result<JsValue, JsValue> {
    let text = serde_json::to_string(payload)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))?;
    js_sys::JSON::parse(&text)
}
