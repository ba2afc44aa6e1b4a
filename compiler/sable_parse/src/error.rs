//! Parse error type.

use sable_diagnostic::{Diagnostic, ErrorCode};
use sable_ir::Span;

/// A parse failure at one location.
///
/// Converted to a [`Diagnostic`] at the crate boundary.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseError {
    pub code: ErrorCode,
    pub message: String,
    pub span: Span,
    /// Short label shown under the span.
    pub context: Option<String>,
    /// Related location, e.g. the opening delimiter of an unclosed group.
    pub related: Option<(Span, String)>,
}

impl ParseError {
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        ParseError {
            code,
            message: message.into(),
            span,
            context: None,
            related: None,
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    #[must_use]
    pub fn with_related(mut self, span: Span, message: impl Into<String>) -> Self {
        self.related = Some((span, message.into()));
        self
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let label = self.context.clone().unwrap_or_else(|| self.message.clone());
        let mut diag = Diagnostic::error(self.code)
            .with_message(self.message.clone())
            .with_label(self.span, label);
        if let Some((span, message)) = &self.related {
            diag = diag.with_secondary_label(*span, message.clone());
        }
        diag
    }
}

impl From<ParseError> for Diagnostic {
    fn from(err: ParseError) -> Self {
        err.to_diagnostic()
    }
}
