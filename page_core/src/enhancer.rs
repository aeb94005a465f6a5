// Entry point tying the enhancers together. `install` wires everything once
// the document is parsed; `dispose` releases what can be released.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::forms::FormEnhancer;
use crate::nav::NavigationEnhancer;
use crate::page::Page;
use crate::reveal::{RevealHandle, ScrollAnimator};
use crate::shortcuts::{self, ShortcutHandler};
use crate::tooltips::{activate_tooltips, TooltipToolkit};
use crate::types::{DomEvent, EventKind, EventResponse, ListenTarget, PageConfig};

pub const APP_NAME: &str = "Finger Web";

/// Installs the page enhancements configured in [`PageConfig`].
pub struct PageEnhancer<P: Page> {
    page: Rc<P>,
    config: PageConfig,
    tooltips: Option<Rc<dyn TooltipToolkit<P::Node>>>,
    reveal: Rc<RefCell<Option<RevealHandle<P>>>>,
    installed: bool,
}

impl<P: Page> PageEnhancer<P> {
    pub fn new(page: Rc<P>, config: PageConfig) -> Self {
        PageEnhancer {
            page,
            config,
            tooltips: None,
            reveal: Rc::new(RefCell::new(None)),
            installed: false,
        }
    }

    /// Inject the toolkit used for tooltip activation.
    pub fn with_tooltips(mut self, toolkit: Rc<dyn TooltipToolkit<P::Node>>) -> Self {
        self.tooltips = Some(toolkit);
        self
    }

    pub fn page(&self) -> &Rc<P> {
        &self.page
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    /// Register the keyboard shortcuts and run the page initializers, now if
    /// the document is parsed or on `DOMContentLoaded` otherwise. Installing
    /// twice does nothing.
    pub fn install(&mut self) {
        if self.installed {
            warn!("page enhancer already installed");
            return;
        }
        self.installed = true;

        if self.config.features.shortcuts {
            ShortcutHandler::install(&self.page);
        }

        if self.page.is_ready() {
            self.initialize();
            return;
        }

        let weak = Rc::downgrade(&self.page);
        let config = self.config.clone();
        let tooltips = self.tooltips.clone();
        let reveal = self.reveal.clone();
        let mut pending = true;
        self.page.listen(
            ListenTarget::Document,
            EventKind::DomContentLoaded,
            Box::new(move |_: &DomEvent| {
                if let (true, Some(page)) = (pending, weak.upgrade()) {
                    pending = false;
                    *reveal.borrow_mut() = run_initializers(&page, &config, tooltips.as_deref());
                }
                EventResponse::PROCEED
            }),
        );
        debug!("waiting for DOMContentLoaded");
    }

    fn initialize(&self) {
        *self.reveal.borrow_mut() =
            run_initializers(&self.page, &self.config, self.tooltips.as_deref());
    }

    /// Whether the card observer is running.
    pub fn is_animating(&self) -> bool {
        self.reveal
            .borrow()
            .as_ref()
            .is_some_and(|handle| !handle.is_disposed())
    }

    /// Tear down the card observer.
    pub fn dispose(&self) {
        if let Some(handle) = self.reveal.borrow_mut().take() {
            handle.dispose();
        }
    }
}

fn run_initializers<P: Page>(
    page: &Rc<P>,
    config: &PageConfig,
    tooltips: Option<&dyn TooltipToolkit<P::Node>>,
) -> Option<RevealHandle<P>> {
    let features = &config.features;
    if features.forms {
        FormEnhancer::install(page);
    }
    if features.navigation {
        NavigationEnhancer::install(page);
    }
    let reveal = if features.animations {
        match ScrollAnimator::install(page) {
            Ok(handle) => Some(handle),
            Err(err) => {
                warn!(error = %err, "scroll animations unavailable");
                None
            }
        }
    } else {
        None
    };
    if features.tooltips {
        let activated = activate_tooltips(page.as_ref(), tooltips);
        debug!(activated, "tooltips activated");
    }

    if config.console_banner {
        log_banner();
    }
    reveal
}

fn log_banner() {
    info!("{APP_NAME}");
    info!("Welcome to the developer console!");
    info!("Keyboard shortcuts: {}", shortcuts::summary());
}
