//! Browser console output for the core crate's `tracing` events.
//!
//! The pipeline logs through `tracing`; without a subscriber those events are
//! dropped. `init` installs a registry with a layer that writes each event to
//! the matching `console` method:
//!
//! - `ERROR` → `console.error`
//! - `WARN` → `console.warn` (per-file failures)
//! - `INFO` → `console.log` (uploaded record ids)
//! - `DEBUG`/`TRACE` → `console.debug`

use std::fmt::{self, Write};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;
use wasm_bindgen::JsValue;

/// Install the console subscriber. Later calls are no-ops.
pub fn init(max_level: LevelFilter) {
    let _ = tracing_subscriber::registry()
        .with(max_level)
        .with(ConsoleLayer::new(write_console))
        .try_init();
}

fn write_console(level: Level, line: &str) {
    let line = JsValue::from_str(line);
    match level {
        Level::ERROR => web_sys::console::error_1(&line),
        Level::WARN => web_sys::console::warn_1(&line),
        Level::INFO => web_sys::console::log_1(&line),
        _ => web_sys::console::debug_1(&line),
    }
}

/// Formats events as `message key=value ...` and hands them to a sink.
pub(crate) struct ConsoleLayer<F> {
    sink: F,
}

impl<F> ConsoleLayer<F>
where
    F: Fn(Level, &str) + 'static,
{
    pub(crate) fn new(sink: F) -> Self {
        Self { sink }
    }
}

impl<S, F> Layer<S> for ConsoleLayer<F>
where
    S: Subscriber,
    F: Fn(Level, &str) + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut line = EventLine::default();
        event.record(&mut line);
        (self.sink)(*event.metadata().level(), &line.finish());
    }
}

#[derive(Default)]
struct EventLine {
    message: String,
    fields: String,
}

impl EventLine {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else if self.message.is_empty() {
            self.fields.trim_start().to_string()
        } else {
            self.message + &self.fields
        }
    }
}

impl Visit for EventLine {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}
