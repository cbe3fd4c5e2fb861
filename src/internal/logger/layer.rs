use std::fmt::{self, Write as _};

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;

use super::format::Caller;
use super::logger::Logger;
use super::severity::Severity;
use super::LoggerError;

/// Events from this crate are not bridged back into the logger.
const OWN_TARGET: &str = "taglog";

/// A `tracing` layer that writes every event through a [`Logger`], tagged with the
/// event's target.
#[derive(Debug)]
pub struct TaggedLayer {
    logger: Logger,
}

impl TaggedLayer {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }
}

impl<S: Subscriber> Layer<S> for TaggedLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if meta.target().starts_with(OWN_TARGET) {
            return;
        }
        let level = Severity::from(*meta.level());
        if !self.logger.enabled(level) {
            return;
        }

        let mut visitor = PayloadVisitor::default();
        event.record(&mut visitor);

        let caller = Caller::new(
            meta.module_path().unwrap_or(meta.target()),
            meta.line().unwrap_or(0),
        );
        self.logger
            .emit(meta.target(), level, caller, &[&visitor.finish()]);
    }
}

/// Collects the `message` field followed by the remaining fields as `key=value`.
#[derive(Default)]
struct PayloadVisitor {
    message: String,
    fields: String,
}

impl PayloadVisitor {
    fn finish(self) -> String {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.fields,
            (false, false) => format!("{} {}", self.message, self.fields),
        }
    }

    fn push_field(&mut self, name: &str, value: fmt::Arguments<'_>) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{}={}", name, value);
    }
}

impl Visit for PayloadVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            self.push_field(field.name(), format_args!("{}", value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            self.push_field(field.name(), format_args!("{:?}", value));
        }
    }
}

/// Route all `tracing` events in the process through `logger`.
pub fn install(logger: Logger) -> Result<(), LoggerError> {
    tracing_subscriber::registry()
        .with(TaggedLayer::new(logger))
        .try_init()?;
    Ok(())
}
