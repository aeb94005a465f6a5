// Form validation feedback and submit loading state.

use std::rc::Rc;

use tracing::debug;

use crate::page::Page;
use crate::types::{DomEvent, EventKind, EventResponse, ListenTarget};

pub const FORM_SELECTOR: &str = "form";
pub const FIELD_SELECTOR: &str = "input, textarea";
pub const SUBMIT_BUTTON_SELECTOR: &str = r#"button[type="submit"]"#;

pub const VALIDATED_CLASS: &str = "was-validated";
pub const VALID_CLASS: &str = "is-valid";
pub const INVALID_CLASS: &str = "is-invalid";
pub const LOADING_CLASS: &str = "loading";

/// Wires submit and blur listeners on every form of the page.
pub struct FormEnhancer;

impl FormEnhancer {
    /// Attach listeners to all current forms. Returns how many were wired.
    pub fn install<P: Page>(page: &Rc<P>) -> usize {
        let forms = page.query_all(None, FORM_SELECTOR);
        for form in &forms {
            Self::install_form(page, form);
        }
        debug!(forms = forms.len(), "form enhancer installed");
        forms.len()
    }

    fn install_form<P: Page>(page: &Rc<P>, form: &P::Node) {
        let weak = Rc::downgrade(page);
        let submitted = form.clone();
        page.listen(
            ListenTarget::Element(form),
            EventKind::Submit,
            Box::new(move |_: &DomEvent| match weak.upgrade() {
                Some(page) => on_submit(page.as_ref(), &submitted),
                None => EventResponse::PROCEED,
            }),
        );

        for field in page.query_all(Some(form), FIELD_SELECTOR) {
            let weak = Rc::downgrade(page);
            let blurred = field.clone();
            page.listen(
                ListenTarget::Element(&field),
                EventKind::Blur,
                Box::new(move |_: &DomEvent| {
                    if let Some(page) = weak.upgrade() {
                        on_blur(page.as_ref(), &blurred);
                    }
                    EventResponse::PROCEED
                }),
            );
        }
    }
}

/// Submit handler. Invalid forms are cancelled; valid ones proceed with the
/// submit button in its loading state. Either way the form is marked validated.
pub fn on_submit<P: Page>(page: &P, form: &P::Node) -> EventResponse {
    let response = if page.check_validity(form) {
        set_loading(page, form, true);
        EventResponse::PROCEED
    } else {
        EventResponse::cancel()
    };
    page.add_class(form, VALIDATED_CLASS);
    response
}

/// Blur handler. Leaves exactly one of the valid/invalid markers on `field`.
pub fn on_blur<P: Page>(page: &P, field: &P::Node) {
    if page.check_validity(field) {
        page.remove_class(field, INVALID_CLASS);
        page.add_class(field, VALID_CLASS);
    } else {
        page.remove_class(field, VALID_CLASS);
        page.add_class(field, INVALID_CLASS);
    }
}

/// Put the form's submit button in (or out of) its loading state.
pub fn set_loading<P: Page>(page: &P, form: &P::Node, loading: bool) {
    let Some(button) = page.query(Some(form), SUBMIT_BUTTON_SELECTOR) else {
        return;
    };
    if loading {
        page.add_class(&button, LOADING_CLASS);
    } else {
        page.remove_class(&button, LOADING_CLASS);
    }
    page.set_disabled(&button, loading);
}

/// Clear the loading state of the form's submit button.
pub fn clear_loading<P: Page>(page: &P, form: &P::Node) {
    set_loading(page, form, false);
}
