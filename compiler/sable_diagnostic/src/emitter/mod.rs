//! Diagnostic Emitters
//!
//! Each emitter implements [`DiagnosticEmitter`]. The terminal emitter is
//! the only output format the `sable` binary uses.

mod terminal;

pub use terminal::TerminalEmitter;

use std::io::IsTerminal;

use crate::Diagnostic;

/// Trait for emitting diagnostics.
pub trait DiagnosticEmitter {
    /// Emit a single diagnostic.
    fn emit(&mut self, diagnostic: &Diagnostic);

    /// Flush any buffered output.
    fn flush(&mut self);

    /// Emit a summary of errors/warnings.
    fn emit_summary(&mut self, error_count: usize, warning_count: usize);
}

/// Whether stderr is attached to a terminal.
pub(crate) fn stderr_is_terminal() -> bool {
    std::io::stderr().is_terminal()
}
