//! Diagnostic system for error reporting.
//!
//! Every failure in the Sable compiler is a [`Diagnostic`]:
//! - an [`ErrorCode`] for searchability,
//! - the [`ErrorKind`] it belongs to (`TypeMismatch`, `NamespaceCollision`, ...),
//! - a message saying what went wrong,
//! - labeled spans saying where.
//!
//! Compilation is fail-fast: each phase returns `Result<_, Diagnostic>` and
//! the first diagnostic aborts the unit.

mod diagnostic;
pub mod emitter;
mod error_code;
pub mod span_utils;

pub use diagnostic::{
    invalid_operation, type_mismatch, unknown_identifier, Diagnostic, Label, Severity,
};
pub use error_code::{ErrorCode, ErrorKind};
