// AJAX helpers: non-navigating form submission and JSON API fetches.
// Failures are logged and surfaced as danger notifications, never propagated.

use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::forms;
use crate::notify::notify;
use crate::page::Page;
use crate::types::Severity;

pub const SUBMIT_FALLBACK_SUCCESS: &str = "Form submitted successfully";
pub const SUBMIT_FALLBACK_FAILURE: &str = "An error occurred";
pub const SUBMIT_NETWORK_FAILURE: &str = "Failed to submit form";
pub const FETCH_FAILURE: &str = "Failed to fetch data from API";

/// Reply contract for AJAX form submission. Nothing beyond these two fields
/// is assumed; a missing `success` counts as failure.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

impl SubmitResponse {
    /// Read the contract out of an arbitrary payload. Each field is read on its
    /// own: `success` must be `true`, and a `message` that is not a string is
    /// ignored without affecting `success`.
    pub fn from_payload(payload: &serde_json::Value) -> Self {
        SubmitResponse {
            success: payload
                .get("success")
                .and_then(serde_json::Value::as_bool)
                .unwrap_or(false),
            message: payload
                .get("message")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string),
        }
    }
}

/// How a submission ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Server accepted the form; carries the raw payload.
    Accepted(serde_json::Value),
    /// Server answered but reported failure; carries the message shown.
    Rejected(String),
    /// Request or decoding failed.
    Failed,
}

/// Called with the raw payload after a successful submission.
pub type SuccessCallback = Box<dyn FnOnce(&serde_json::Value)>;

/// Clears the submit button's loading state however the submission ends.
struct LoadingGuard<'a, P: Page> {
    page: &'a P,
    form: &'a P::Node,
}

impl<P: Page> Drop for LoadingGuard<'_, P> {
    fn drop(&mut self) {
        forms::clear_loading(self.page, self.form);
    }
}

/// POST `form` to its action without navigating and report the result with a
/// notification. `on_success` runs only for accepted submissions.
pub async fn submit_form_ajax<P: Page>(
    page: Rc<P>,
    form: P::Node,
    on_success: Option<SuccessCallback>,
) -> SubmitOutcome {
    let _loading = LoadingGuard {
        page: page.as_ref(),
        form: &form,
    };

    let payload = match page.post_form(&form).await {
        Ok(payload) => payload,
        Err(err) => {
            error!(error = %err, "Form submission error");
            notify(&page, SUBMIT_NETWORK_FAILURE, Severity::Danger);
            return SubmitOutcome::Failed;
        }
    };

    let response = SubmitResponse::from_payload(&payload);
    if response.success {
        let message = response.message.as_deref().unwrap_or(SUBMIT_FALLBACK_SUCCESS);
        notify(&page, message, Severity::Success);
        if let Some(callback) = on_success {
            callback(&payload);
        }
        debug!("form accepted");
        SubmitOutcome::Accepted(payload)
    } else {
        let message = response
            .message
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| SUBMIT_FALLBACK_FAILURE.to_string());
        notify(&page, &message, Severity::Danger);
        SubmitOutcome::Rejected(message)
    }
}

/// GET a JSON endpoint. Failures are logged, shown to the user and yield `None`.
pub async fn fetch_api<P: Page>(page: Rc<P>, endpoint: &str) -> Option<serde_json::Value> {
    match page.get_json(endpoint).await {
        Ok(payload) => Some(payload),
        Err(err) => {
            error!(endpoint, error = %err, "API fetch error");
            notify(&page, FETCH_FAILURE, Severity::Danger);
            None
        }
    }
}
