//! Adapter for dependencies that expect `logf`/`errorf` style loggers.

use crate::builder::Builder;
use crate::context::LogContext;
use std::fmt;

/// Options for [`wrap`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WrapOptions {
    force_debug_log_level: bool,
}

impl WrapOptions {
    /// Default options: levels pass through unchanged.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            force_debug_log_level: false,
        }
    }

    /// Emit every record at debug level.
    #[must_use]
    pub const fn force_debug_log_level(mut self) -> Self {
        self.force_debug_log_level = true;
        self
    }

    /// Returns true when every record is emitted at debug level.
    #[must_use]
    pub const fn forces_debug(&self) -> bool {
        self.force_debug_log_level
    }
}

/// Wrap `ctx` for a dependency's logging hooks.
#[must_use]
pub fn wrap(ctx: &LogContext, options: WrapOptions) -> Wrapper {
    Wrapper {
        ctx: ctx.clone(),
        options,
    }
}

/// Logger handed to dependencies.
#[derive(Debug, Clone)]
pub struct Wrapper {
    ctx: LogContext,
    options: WrapOptions,
}

impl Wrapper {
    /// Info record, or debug when forced.
    pub fn logf(&self, args: fmt::Arguments<'_>) {
        let message = args.to_string();
        let builder = Builder::new(&self.ctx);
        if self.options.forces_debug() {
            builder.debug(&message);
        } else {
            builder.info(&message);
        }
    }

    /// Error record, or debug when forced.
    pub fn errorf(&self, args: fmt::Arguments<'_>) {
        let message = args.to_string();
        let builder = Builder::new(&self.ctx);
        if self.options.forces_debug() {
            builder.debug(&message);
        } else {
            builder.error(&message);
        }
    }
}
