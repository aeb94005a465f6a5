// Tooltip activation through an optional UI toolkit.

use tracing::{debug, warn};

use crate::error::PageError;
use crate::page::Page;

pub const TOOLTIP_SELECTOR: &str = r#"[data-bs-toggle="tooltip"]"#;

/// A UI toolkit able to attach its tooltip behaviour to an element.
pub trait TooltipToolkit<N> {
    fn attach(&self, element: &N) -> Result<(), PageError>;
}

/// Attach tooltips to every flagged element if a toolkit is available.
/// Returns how many elements were activated; no toolkit means zero.
pub fn activate_tooltips<P: Page>(
    page: &P,
    toolkit: Option<&dyn TooltipToolkit<P::Node>>,
) -> usize {
    let Some(toolkit) = toolkit else {
        debug!("no tooltip toolkit, skipping");
        return 0;
    };

    page.query_all(None, TOOLTIP_SELECTOR)
        .iter()
        .filter(|element| match toolkit.attach(element) {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "tooltip activation failed");
                false
            }
        })
        .count()
}
