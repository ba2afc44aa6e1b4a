#![allow(clippy::unwrap_used, reason = "Tests can panic")]

//! Enum operators end to end: folding, lowering, and execution.

use pretty_assertions::assert_eq;
use sable_codegen::{ExecError, Instr};
use sable_diagnostic::ErrorKind;
use sable_ir::Word;
use sablec::{check, compile, compile_with, Artifact, CompileOptions};

const ENUMS: &str = "\
enum Role:
    ADMIN
    MANAGER

enum Food:
    PANCAKE
    WAFFLE

";

fn build(body: &str, fold_constants: bool) -> Artifact {
    compile_with(&format!("{ENUMS}{body}"), CompileOptions { fold_constants })
        .unwrap_or_else(|err| panic!("{err}"))
}

/// Value and folded code of `def f() -> T: return <expr>`.
fn evaluate(ty: &str, expr: &str) -> (Word, Vec<Instr>) {
    let artifact = build(&format!("def f() -> {ty}:\n    return {expr}\n"), true);
    let value = artifact.run("f", &[]).unwrap();
    assert_eq!(value.len(), 1);
    let code = artifact.program.function("f").unwrap().code.clone();
    (value[0].clone(), code)
}

fn folds_to(ty: &str, expr: &str, expected: Word) {
    let (value, code) = evaluate(ty, expr);
    assert_eq!(value, expected, "{expr}");
    assert_eq!(
        code,
        vec![Instr::Push(expected), Instr::Return { words: 1 }],
        "{expr} should fold to one push"
    );
}

#[test]
fn members_fold_to_single_bits() {
    folds_to("Role", "Role.ADMIN", Word::from_u64(1));
    folds_to("Role", "Role.MANAGER", Word::from_u64(2));
}

#[test]
fn union_folds_to_both_bits() {
    folds_to("Role", "Role.ADMIN + Role.MANAGER", Word::from_u64(3));
}

#[test]
fn membership_and_equality_fold() {
    folds_to("bool", "Role.ADMIN in (Role.ADMIN + Role.MANAGER)", Word::from_bool(true));
    folds_to("bool", "Role.ADMIN == Role.MANAGER", Word::from_bool(false));
    folds_to("bool", "Role.ADMIN is Role.ADMIN", Word::from_bool(true));
}

#[test]
fn sequence_membership_folds() {
    folds_to("bool", "Role.ADMIN in [Role.ADMIN, Role.MANAGER]", Word::from_bool(true));
    folds_to("bool", "Role.MANAGER in [Role.ADMIN]", Word::from_bool(false));
}

#[test]
fn runtime_membership_against_a_parameter() {
    let artifact = build("def f(r: Role) -> bool:\n    return Role.ADMIN in r\n", true);
    for (arg, expected) in [(0, false), (1, true), (2, false), (3, true)] {
        let result = artifact.run("f", &[Word::from_u64(arg)]).unwrap();
        assert_eq!(result, vec![Word::from_bool(expected)], "r = {arg}");
    }
}

#[test]
fn runtime_sequence_membership_is_exact_match() {
    let artifact = build(
        "def f(r: Role) -> bool:\n    return r in [Role.ADMIN, Role.MANAGER]\n",
        true,
    );
    let run = |arg: u64| artifact.run("f", &[Word::from_u64(arg)]).unwrap();
    assert_eq!(run(1), vec![Word::from_bool(true)]);
    assert_eq!(run(2), vec![Word::from_bool(true)]);
    assert_eq!(run(3), vec![Word::from_bool(false)]);
}

#[test]
fn external_arguments_with_undeclared_bits_are_rejected() {
    let artifact = build("@external\ndef f(x: Role) -> Role:\n    return x\n", true);
    for arg in [Word::from_u64(4), Word::from_u64(7), Word::bit(200).unwrap(), Word::max_value()] {
        let result = artifact.run("f", &[arg.clone()]);
        assert!(
            matches!(result, Err(ExecError::AssertionFailed { .. })),
            "{arg:?} accepted as a Role"
        );
    }
    for arg in 0..4 {
        let result = artifact.run("f", &[Word::from_u64(arg)]).unwrap();
        assert_eq!(result, vec![Word::from_u64(arg)]);
    }
}

#[test]
fn cross_enum_union_is_a_type_error() {
    let source = format!("{ENUMS}def f() -> Role:\n    return Role.ADMIN + Food.PANCAKE\n");
    let checked = check(&source).unwrap_err();
    let compiled = compile(&source).unwrap_err();
    assert_eq!(checked.kind(), ErrorKind::TypeMismatch);
    assert_eq!(compiled, checked);
}

#[test]
fn cross_enum_comparisons_are_type_errors() {
    for op in ["==", "is", "in"] {
        let source = format!("{ENUMS}def f() -> bool:\n    return Role.ADMIN {op} Food.PANCAKE\n");
        assert_eq!(
            compile(&source).unwrap_err().kind(),
            ErrorKind::TypeMismatch,
            "{op}"
        );
    }
}

#[test]
fn other_operators_on_enums_are_invalid() {
    for op in ["-", "*", "<", "and"] {
        let source = format!("{ENUMS}def f() -> bool:\n    x: bool = Role.ADMIN {op} Role.MANAGER\n    return x\n");
        assert_eq!(
            compile(&source).unwrap_err().kind(),
            ErrorKind::InvalidOperation,
            "{op}"
        );
    }
}

#[test]
fn unknown_member_is_unknown_attribute() {
    let source = format!("{ENUMS}def f() -> Role:\n    return Role.OWNER\n");
    let err = compile(&source).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownAttribute);
    assert_eq!((err.line, err.column), (10, 17));
}

#[test]
fn unfolded_code_computes_the_same_values() {
    let body = "\
def union() -> Role:
    return Role.ADMIN + Role.MANAGER

def member() -> bool:
    return Role.ADMIN in (Role.ADMIN + Role.MANAGER)

def same() -> bool:
    return Role.ADMIN == Role.MANAGER

def listed() -> bool:
    return Role.MANAGER in [Role.ADMIN]
";
    let folded = build(body, true);
    let unfolded = build(body, false);
    for name in ["union", "member", "same", "listed"] {
        assert_eq!(
            folded.run(name, &[]).unwrap(),
            unfolded.run(name, &[]).unwrap(),
            "{name}"
        );
        assert!(
            unfolded.program.function(name).unwrap().code.len()
                > folded.program.function(name).unwrap().code.len(),
            "{name} should lower to runtime instructions without folding"
        );
    }
}
