//! Terminal Emitter
//!
//! Human-readable diagnostic output with optional ANSI color support. When
//! given the source text, labels are rendered as `path:line:col` followed by
//! the offending line and a caret underline.

use std::io::{self, Write};

use super::{stderr_is_terminal, DiagnosticEmitter};
use crate::span_utils::{line_text, offset_to_line_col};
use crate::{Diagnostic, Label, Severity};

/// Terminal emitter with optional color support.
pub struct TerminalEmitter<'src, W: Write> {
    writer: W,
    colors: bool,
    source: Option<(&'src str, &'src str)>,
}

impl<W: Write> TerminalEmitter<'static, W> {
    /// Create a new terminal emitter.
    pub fn new(writer: W, colors: bool) -> Self {
        TerminalEmitter {
            writer,
            colors,
            source: None,
        }
    }
}

impl TerminalEmitter<'static, io::Stderr> {
    /// Create a terminal emitter for stderr with auto-detected color support.
    pub fn stderr() -> Self {
        TerminalEmitter::new(io::stderr(), stderr_is_terminal())
    }
}

impl<'src, W: Write> TerminalEmitter<'src, W> {
    /// Attach source text so spans render as line/column with a snippet.
    pub fn with_source<'a>(self, path: &'a str, source: &'a str) -> TerminalEmitter<'a, W> {
        TerminalEmitter {
            writer: self.writer,
            colors: self.colors,
            source: Some((path, source)),
        }
    }

    /// Consume the emitter, returning the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn paint(&mut self, style: &str, text: &str) {
        if self.colors {
            let _ = write!(self.writer, "\x1b[{style}m{text}\x1b[0m");
        } else {
            let _ = write!(self.writer, "{text}");
        }
    }

    fn write_severity(&mut self, severity: Severity) {
        let style = match severity {
            Severity::Error => "1;31",
            Severity::Warning => "1;33",
            Severity::Note => "1;36",
        };
        self.paint(style, &severity.to_string());
    }

    fn write_label(&mut self, label: &Label) {
        let style = if label.is_primary { "1;31" } else { "1;34" };
        let marker = if label.is_primary { "-->" } else { ":::" };

        let Some((path, source)) = self.source else {
            let _ = write!(self.writer, "  {} {:?}: ", marker, label.span);
            self.paint(style, &label.message);
            let _ = writeln!(self.writer);
            return;
        };

        let (line, col) = offset_to_line_col(source, label.span.start);
        let text = line_text(source, label.span.start);
        let gutter = " ".repeat(line.to_string().len());
        let _ = writeln!(self.writer, "{gutter}{marker} {path}:{line}:{col}");
        let _ = writeln!(self.writer, "{gutter} |");
        let _ = writeln!(self.writer, "{line} | {text}");

        let pad = " ".repeat(col.saturating_sub(1) as usize);
        let remaining = text.chars().count().saturating_sub(pad.len()).max(1);
        let width = source
            .get(label.span.to_range())
            .map_or(1, |s| s.chars().take_while(|&c| c != '\n').count())
            .clamp(1, remaining);
        let _ = write!(self.writer, "{gutter} | {pad}");
        self.paint(style, &format!("{} {}", "^".repeat(width), label.message));
        let _ = writeln!(self.writer);
    }
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<'_, W> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        // Header: severity[CODE] Kind: message
        self.write_severity(diagnostic.severity);
        let code = format!("[{}]", diagnostic.code);
        self.paint("1", &code);
        let _ = writeln!(self.writer, " {}: {}", diagnostic.kind(), diagnostic.message);

        for label in &diagnostic.labels {
            self.write_label(label);
        }

        for note in &diagnostic.notes {
            let _ = write!(self.writer, "  = ");
            self.paint("1", "note");
            let _ = writeln!(self.writer, ": {note}");
        }

        let _ = writeln!(self.writer);
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }

    fn emit_summary(&mut self, error_count: usize, warning_count: usize) {
        let plural = |n: usize| if n == 1 { "" } else { "s" };
        if error_count > 0 {
            self.paint("1;31", "error");
            let _ = write!(self.writer, ": aborting due to ");
            if error_count == 1 {
                let _ = write!(self.writer, "previous error");
            } else {
                let _ = write!(self.writer, "{error_count} previous errors");
            }
            if warning_count > 0 {
                let _ = write!(
                    self.writer,
                    "; {} warning{} emitted",
                    warning_count,
                    plural(warning_count)
                );
            }
            let _ = writeln!(self.writer);
        } else if warning_count > 0 {
            self.paint("1;33", "warning");
            let _ = writeln!(
                self.writer,
                ": {} warning{} emitted",
                warning_count,
                plural(warning_count)
            );
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "test output is always UTF-8")]
mod tests;
