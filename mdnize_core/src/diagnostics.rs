//! Diagnostic sinks used for verbose output.
//!
//! The engine never logs through a global; every component that reports
//! progress receives a [`DiagnosticSink`] and calls [`DiagnosticSink::record`]
//! with a single line.

/// Receives one line of diagnostic output at a time.
pub trait DiagnosticSink {
	fn record(&self, line: &str);
}

/// Discards every line. This is the default sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
	fn record(&self, _line: &str) {}
}

/// Forwards every line to `tracing` at debug level under the `mdnize_core`
/// target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
	fn record(&self, line: &str) {
		tracing::debug!(target: "mdnize_core", "{line}");
	}
}

/// Collects lines in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
	lines: std::cell::RefCell<Vec<String>>,
}

impl MemorySink {
	pub fn new() -> Self {
		Self::default()
	}

	/// Take the recorded lines, leaving the sink empty.
	pub fn take(&self) -> Vec<String> {
		self.lines.take()
	}
}

impl DiagnosticSink for MemorySink {
	fn record(&self, line: &str) {
		self.lines.borrow_mut().push(line.to_string());
	}
}
