// Console logging. `tracing` events are formatted and written to the matching
// `console.*` method in the browser, or stderr elsewhere.

use std::fmt::Write as _;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

use crate::types::LogLevel;

/// Where formatted lines end up.
pub type ConsoleSink = fn(Level, &str);

/// Layer writing one line per event.
pub struct ConsoleLayer {
    sink: ConsoleSink,
}

impl ConsoleLayer {
    pub fn new(sink: ConsoleSink) -> Self {
        ConsoleLayer { sink }
    }
}

impl Default for ConsoleLayer {
    fn default() -> Self {
        ConsoleLayer::new(write_console)
    }
}

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);

        let line = format!("[{}] {}", metadata.target(), visitor.finish());
        (self.sink)(*metadata.level(), &line);
    }
}

/// Collects `message` first, then `key=value` pairs.
#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: String,
}

impl LineVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else if self.message.is_empty() {
            self.fields
        } else {
            format!("{} {}", self.message, self.fields)
        }
    }

    fn push_field(&mut self, name: &str, value: &dyn std::fmt::Display) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{name}={value}");
    }
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.push_field(field.name(), &value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.push_field(field.name(), &format_args!("{value:?}"));
        }
    }
}

/// Install the console subscriber at `level`. Later calls are no-ops.
pub fn init(level: LogLevel) {
    let filter = LevelFilter::from_level(level.into());
    let subscriber = tracing_subscriber::registry().with(ConsoleLayer::default().with_filter(filter));
    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[cfg(target_arch = "wasm32")]
fn write_console(level: Level, line: &str) {
    let line = wasm_bindgen::JsValue::from_str(line);
    match level {
        Level::ERROR => web_sys::console::error_1(&line),
        Level::WARN => web_sys::console::warn_1(&line),
        Level::INFO => web_sys::console::info_1(&line),
        Level::DEBUG => web_sys::console::debug_1(&line),
        Level::TRACE => web_sys::console::log_1(&line),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn write_console(level: Level, line: &str) {
    eprintln!("{level:>5} {line}");
}
