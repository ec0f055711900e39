//! Pluggable log sink for store lifecycle events.
//!
//! The store reports through a [`LogSink`] rather than calling `tracing` directly,
//! so embedders can route or silence those messages without touching the global
//! subscriber.

use std::fmt::{self, Debug};
use tracing::level_filters::LevelFilter;

/// A destination for store log messages.
///
/// Messages arrive pre-formatted via [`format_args!`], so the sink decides whether
/// rendering is worth the cost.
pub trait LogSink: Debug + Send + Sync + 'static {
    fn fatal(&self, message: fmt::Arguments<'_>);
    fn error(&self, message: fmt::Arguments<'_>);
    fn warn(&self, message: fmt::Arguments<'_>);
    fn info(&self, message: fmt::Arguments<'_>);
    fn debug(&self, message: fmt::Arguments<'_>);
    fn trace(&self, message: fmt::Arguments<'_>);
}

/// Forwards sink calls into `tracing`, dropping anything below `level`.
///
/// This is the default sink. `fatal` is emitted as an `ERROR` event tagged
/// `fatal = true`, since `tracing` has no dedicated level for it.
#[derive(Debug, Clone, Copy)]
pub struct TracingSink {
    level: LevelFilter,
}

impl TracingSink {
    #[must_use]
    pub const fn new(level: LevelFilter) -> Self {
        Self { level }
    }

    #[must_use]
    pub const fn level(&self) -> LevelFilter {
        self.level
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new(LevelFilter::INFO)
    }
}

impl LogSink for TracingSink {
    fn fatal(&self, message: fmt::Arguments<'_>) {
        if self.level >= LevelFilter::ERROR {
            tracing::error!(target: "tome_store", fatal = true, "{message}");
        }
    }

    fn error(&self, message: fmt::Arguments<'_>) {
        if self.level >= LevelFilter::ERROR {
            tracing::error!(target: "tome_store", "{message}");
        }
    }

    fn warn(&self, message: fmt::Arguments<'_>) {
        if self.level >= LevelFilter::WARN {
            tracing::warn!(target: "tome_store", "{message}");
        }
    }

    fn info(&self, message: fmt::Arguments<'_>) {
        if self.level >= LevelFilter::INFO {
            tracing::info!(target: "tome_store", "{message}");
        }
    }

    fn debug(&self, message: fmt::Arguments<'_>) {
        if self.level >= LevelFilter::DEBUG {
            tracing::debug!(target: "tome_store", "{message}");
        }
    }

    fn trace(&self, message: fmt::Arguments<'_>) {
        if self.level >= LevelFilter::TRACE {
            tracing::trace!(target: "tome_store", "{message}");
        }
    }
}

/// Discards every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl LogSink for NullSink {
    fn fatal(&self, _: fmt::Arguments<'_>) {}
    fn error(&self, _: fmt::Arguments<'_>) {}
    fn warn(&self, _: fmt::Arguments<'_>) {}
    fn info(&self, _: fmt::Arguments<'_>) {}
    fn debug(&self, _: fmt::Arguments<'_>) {}
    fn trace(&self, _: fmt::Arguments<'_>) {}
}
