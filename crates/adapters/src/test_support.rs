use crate::log_sink::LogSink;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Sink capturing lines in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
    flushes: AtomicUsize,
}

impl MemorySink {
    pub fn take(&self) -> Vec<String> {
        let mut guard = self.lines.lock().expect("memory sink lock");
        std::mem::take(&mut *guard)
    }

    pub fn flushes(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }
}

impl LogSink for MemorySink {
    fn write_line(&self, line: &str) {
        let mut guard = self.lines.lock().expect("memory sink lock");
        guard.push(line.to_string());
    }

    fn flush(&self) {
        self.flushes.fetch_add(1, Ordering::SeqCst);
    }
}
