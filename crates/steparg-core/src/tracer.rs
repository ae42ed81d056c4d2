//! Diagnostic sinks for non-fatal conversion warnings

use std::sync::Mutex;

/// Receives warnings raised while converting step arguments
pub trait TestTracer: Send + Sync {
    fn trace_warning(&self, message: &str);
}

/// Tracer that forwards warnings to the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTracer;

impl TestTracer for LogTracer {
    fn trace_warning(&self, message: &str) {
        log::warn!("{}", message);
    }
}

/// Tracer that keeps every warning in memory
#[derive(Debug, Default)]
pub struct MemoryTracer {
    warnings: Mutex<Vec<String>>,
}

impl MemoryTracer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Warnings recorded so far, oldest first
    pub fn warnings(&self) -> Vec<String> {
        self.warnings
            .lock()
            .map(|w| w.clone())
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut w) = self.warnings.lock() {
            w.clear();
        }
    }
}

impl TestTracer for MemoryTracer {
    fn trace_warning(&self, message: &str) {
        if let Ok(mut w) = self.warnings.lock() {
            w.push(message.to_string());
        }
    }
}
