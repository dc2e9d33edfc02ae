//! `std::io::Write` over the builder path.

use crate::builder::Builder;
use crate::context::LogContext;
use std::io;

/// Writer turning each `write` call into one info record.
///
/// Never reports an error: every write claims the full buffer.
#[derive(Debug, Clone, Default)]
pub struct Writer {
    ctx: LogContext,
}

impl Writer {
    /// Write through the logger resolved from `ctx`.
    #[must_use]
    pub const fn new(ctx: LogContext) -> Self {
        Self { ctx }
    }

    /// The context records are built from.
    #[must_use]
    pub const fn context(&self) -> &LogContext {
        &self.ctx
    }
}

impl io::Write for Writer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        let message = text.strip_suffix('\n').unwrap_or(&text);
        let message = message.strip_suffix('\r').unwrap_or(message);
        Builder::new(&self.ctx).info(message);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        crate::context::flush(&self.ctx);
        Ok(())
    }
}
