// Transient notification banners. Fixed to the top-right corner, dismissible,
// removed automatically after a fixed lifetime.

use std::rc::Rc;
use std::time::Duration;

use tracing::debug;

use crate::error::PageError;
use crate::page::Page;
use crate::types::Severity;

/// How long a notification stays on the page.
pub const NOTIFICATION_LIFETIME: Duration = Duration::from_millis(5000);

const NOTIFICATION_STYLE: &str = "top: 20px; right: 20px; z-index: 9999; min-width: 300px;";

/// Class list for a banner of the given severity.
pub fn notification_class(severity: Severity) -> String {
    format!("alert alert-{severity} alert-dismissible fade show position-fixed")
}

/// Append a dismissible banner with `message` and schedule its removal.
///
/// The message is set as text, never parsed as markup. If the user closes the
/// banner first, the scheduled removal does nothing.
pub fn show_notification<P: Page>(
    page: &Rc<P>,
    message: &str,
    severity: Severity,
) -> Result<P::Node, PageError> {
    let banner = page.create_element("div")?;
    page.set_attribute(&banner, "class", &notification_class(severity));
    page.set_attribute(&banner, "role", "alert");
    page.set_attribute(&banner, "style", NOTIFICATION_STYLE);

    let text = page.create_element("span")?;
    page.set_text(&text, message);
    page.append_child(&banner, &text)?;

    let close = page.create_element("button")?;
    page.set_attribute(&close, "type", "button");
    page.set_attribute(&close, "class", "btn-close");
    page.set_attribute(&close, "data-bs-dismiss", "alert");
    page.set_attribute(&close, "aria-label", "Close");
    page.append_child(&banner, &close)?;

    page.append_to_body(&banner)?;
    debug!(%severity, "notification shown");

    let weak = Rc::downgrade(page);
    let scheduled = banner.clone();
    page.set_timeout(
        NOTIFICATION_LIFETIME,
        Box::new(move || {
            let Some(page) = weak.upgrade() else {
                return;
            };
            if page.is_attached(&scheduled) {
                page.remove(&scheduled);
            }
        }),
    );

    Ok(banner)
}

/// Show a banner, logging instead of failing if the DOM refuses.
pub(crate) fn notify<P: Page>(page: &Rc<P>, message: &str, severity: Severity) {
    if let Err(err) = show_notification(page, message, severity) {
        tracing::warn!(error = %err, "could not show notification");
    }
}
