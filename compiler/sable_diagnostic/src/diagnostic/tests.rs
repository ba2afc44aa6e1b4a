use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_builder_collects_labels_and_notes() {
    let diag = Diagnostic::error(ErrorCode::E2006)
        .with_message("`Roles` is already declared")
        .with_label(Span::new(40, 45), "redeclared here")
        .with_secondary_label(Span::new(5, 10), "first declared here")
        .with_note("top-level names share one namespace");

    assert!(diag.is_error());
    assert_eq!(diag.kind(), ErrorKind::NamespaceCollision);
    assert_eq!(diag.labels.len(), 2);
    assert_eq!(diag.primary_span(), Some(Span::new(40, 45)));
    assert_eq!(diag.notes, vec!["top-level names share one namespace".to_string()]);
}

#[test]
fn test_primary_span_skips_secondary_labels() {
    let diag = Diagnostic::error(ErrorCode::E2001)
        .with_secondary_label(Span::new(0, 3), "context")
        .with_label(Span::new(8, 9), "here");
    assert_eq!(diag.primary_span(), Some(Span::new(8, 9)));

    let bare = Diagnostic::error(ErrorCode::E9001);
    assert_eq!(bare.primary_span(), None);
}

#[test]
fn test_display_format() {
    let diag = type_mismatch(Span::new(10, 15), "Roles", "uint256", "comparison");
    assert_eq!(
        diag.to_string(),
        "error [E2001]: type mismatch in comparison: expected `Roles`, found `uint256`\n  --> 10..15: expected `Roles`"
    );
}

#[test]
fn test_warning_severity() {
    let diag = Diagnostic::warning(ErrorCode::E2001);
    assert!(!diag.is_error());
    assert_eq!(diag.severity.to_string(), "warning");
}

#[test]
fn test_helper_codes() {
    assert_eq!(
        invalid_operation(Span::DUMMY, "<", "Roles").code,
        ErrorCode::E2005
    );
    assert_eq!(unknown_identifier(Span::DUMMY, "x").kind(), ErrorKind::UndeclaredDefinition);
}
