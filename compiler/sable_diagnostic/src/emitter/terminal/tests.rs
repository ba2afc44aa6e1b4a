use pretty_assertions::assert_eq;
use sable_ir::Span;

use super::*;
use crate::ErrorCode;

fn sample_diagnostic() -> Diagnostic {
    Diagnostic::error(ErrorCode::E2001)
        .with_message("type mismatch: expected `Roles`, found `uint256`")
        .with_label(Span::new(10, 15), "expected `Roles`")
        .with_secondary_label(Span::new(0, 5), "declared here")
        .with_note("enum values only compare with the same enum")
}

fn render(emitter: TerminalEmitter<'_, Vec<u8>>, diag: &Diagnostic) -> String {
    let mut emitter = emitter;
    emitter.emit(diag);
    emitter.flush();
    String::from_utf8(emitter.into_inner()).unwrap()
}

#[test]
fn test_terminal_emitter_no_color() {
    let out = render(TerminalEmitter::new(Vec::new(), false), &sample_diagnostic());

    assert!(out.starts_with("error[E2001] TypeMismatch: type mismatch"));
    assert!(out.contains("  --> 10..15: expected `Roles`"));
    assert!(out.contains("  ::: 0..5: declared here"));
    assert!(out.contains("= note: enum values only compare"));
    assert!(!out.contains("\x1b["));
}

#[test]
fn test_terminal_emitter_with_color() {
    let out = render(TerminalEmitter::new(Vec::new(), true), &sample_diagnostic());

    assert!(out.contains("\x1b[1;31merror\x1b[0m"));
    assert!(out.contains("\x1b[1m[E2001]\x1b[0m"));
}

#[test]
fn test_terminal_emitter_with_source_snippet() {
    let source = "x: uint256 = 1\ny: bool = x\n";
    let diag = Diagnostic::error(ErrorCode::E2001)
        .with_message("type mismatch")
        .with_label(Span::new(25, 26), "expected `bool`");

    let emitter = TerminalEmitter::new(Vec::new(), false).with_source("demo.sb", source);
    let out = render(emitter, &diag);

    assert_eq!(
        out,
        concat!(
            "error[E2001] TypeMismatch: type mismatch\n",
            " --> demo.sb:2:11\n",
            "  |\n",
            "2 | y: bool = x\n",
            "  |           ^ expected `bool`\n",
            "\n",
        )
    );
}

#[test]
fn test_emit_summary_counts() {
    let mut emitter = TerminalEmitter::new(Vec::new(), false);
    emitter.emit_summary(1, 0);
    emitter.emit_summary(3, 2);
    emitter.emit_summary(0, 1);
    let out = String::from_utf8(emitter.into_inner()).unwrap();

    assert_eq!(
        out,
        "error: aborting due to previous error\n\
         error: aborting due to 3 previous errors; 2 warnings emitted\n\
         warning: 1 warning emitted\n"
    );
}

#[test]
fn test_emit_summary_silent_without_counts() {
    let mut emitter = TerminalEmitter::new(Vec::new(), false);
    emitter.emit_summary(0, 0);
    assert!(emitter.into_inner().is_empty());
}
