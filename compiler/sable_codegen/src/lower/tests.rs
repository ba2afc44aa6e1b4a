use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sable_ir::Word;

use crate::test_helpers::{lower, run_word};
use crate::{ExecError, Instr, Machine};

const ROLE: &str = "enum Role:\n    ADMIN\n    MANAGER\n\n";

fn push(value: u64) -> Instr {
    Instr::Push(Word::from_u64(value))
}

fn code_of(source: &str, fold: bool) -> Vec<Instr> {
    let program = lower(source, fold);
    program.function("f").unwrap().code.clone()
}

#[test]
fn folded_union_is_one_push() {
    let code = code_of(
        &format!("{ROLE}def f() -> Role:\n    return Role.ADMIN + Role.MANAGER\n"),
        true,
    );
    assert_eq!(code, vec![push(3), Instr::Return { words: 1 }]);
}

#[test]
fn unfolded_union_is_or() {
    let code = code_of(
        &format!("{ROLE}def f() -> Role:\n    return Role.ADMIN + Role.MANAGER\n"),
        false,
    );
    assert_eq!(code, vec![push(1), push(2), Instr::Or, Instr::Return { words: 1 }]);
}

#[test]
fn unfolded_equality_is_xor_iszero() {
    let code = code_of(
        &format!("{ROLE}def f(r: Role) -> bool:\n    return r == Role.MANAGER\n"),
        true,
    );
    assert_eq!(
        code,
        vec![
            Instr::Load(0),
            push(2),
            Instr::Xor,
            Instr::IsZero,
            Instr::Return { words: 1 }
        ]
    );
}

#[test]
fn membership_is_and_then_compare() {
    let code = code_of(
        &format!("{ROLE}def f(r: Role) -> bool:\n    return Role.ADMIN in r\n"),
        true,
    );
    assert_eq!(
        code,
        vec![
            push(1),
            Instr::Load(0),
            Instr::And,
            push(1),
            Instr::Eq,
            Instr::Return { words: 1 }
        ]
    );
}

#[test]
fn sequence_membership_chains_or() {
    let code = code_of(
        &format!("{ROLE}def f(r: Role) -> bool:\n    return r in [Role.ADMIN, Role.MANAGER]\n"),
        true,
    );
    assert_eq!(
        code,
        vec![
            Instr::Load(0),
            push(1),
            Instr::Eq,
            Instr::Load(0),
            push(2),
            Instr::Eq,
            Instr::Or,
            Instr::Return { words: 1 }
        ]
    );
}

#[test]
fn unit_function_gets_implicit_return() {
    let code = code_of("def f():\n    pass\n", true);
    assert_eq!(code, vec![Instr::Return { words: 0 }]);
}

#[test]
fn uint8_arithmetic_is_truncated() {
    let code = code_of("def f(x: uint8) -> uint8:\n    return x + 1\n", true);
    assert_eq!(
        code,
        vec![
            Instr::Load(0),
            push(1),
            Instr::Add,
            push(0xff),
            Instr::And,
            Instr::Return { words: 1 }
        ]
    );
}

#[test]
fn struct_field_of_temporary_uses_scratch_slots() {
    let program = lower(
        "struct Pair:\n    a: uint256\n    b: uint256\n\ndef f(x: uint256) -> uint256:\n    return Pair({a: 1, b: x}).b\n",
        true,
    );
    let f = program.function("f").unwrap();
    assert_eq!(f.frame_size, 3);
    let result = Machine::new(&program).run("f", &[Word::from_u64(9)]).unwrap();
    assert_eq!(result, vec![Word::from_u64(9)]);
}

#[test]
fn locals_and_calls_execute() {
    let program = lower(
        &format!(
            "{ROLE}def grant(r: Role, extra: Role) -> Role:\n    both: Role = r + extra\n    return both\n\ndef f() -> bool:\n    r: Role = grant(Role.ADMIN, Role.MANAGER)\n    assert Role.MANAGER in r\n    return r == Role.ADMIN + Role.MANAGER\n"
        ),
        false,
    );
    assert_eq!(run_word(&program, "f"), Word::one());
}

#[test]
fn external_enum_parameters_are_range_checked() {
    let code = code_of(&format!("{ROLE}@external\ndef f(r: Role) -> Role:\n    return r\n"), true);
    assert_eq!(
        code,
        vec![
            Instr::Load(0),
            push(3),
            Instr::Not,
            Instr::And,
            Instr::IsZero,
            Instr::Assert,
            Instr::Load(0),
            Instr::Return { words: 1 }
        ]
    );
}

#[test]
fn internal_functions_trust_their_callers() {
    let code = code_of(&format!("{ROLE}def f(r: Role) -> Role:\n    return r\n"), true);
    assert_eq!(code, vec![Instr::Load(0), Instr::Return { words: 1 }]);
}

#[test]
fn enum_fields_of_external_struct_parameters_are_range_checked() {
    let program = lower(
        &format!(
            "{ROLE}struct Grant:\n    amount: uint256\n    role: Role\n\n@external\ndef f(g: Grant) -> uint256:\n    return g.amount\n"
        ),
        true,
    );
    let machine = Machine::new(&program);
    let ok = machine.run("f", &[Word::from_u64(7), Word::from_u64(2)]).unwrap();
    assert_eq!(ok, vec![Word::from_u64(7)]);
    let stray = machine.run("f", &[Word::from_u64(7), Word::from_u64(4)]);
    assert!(matches!(stray, Err(ExecError::AssertionFailed { .. })));
}

/// An enum-valued expression over `Role.M0..M7` and its mask.
fn enum_expr() -> impl Strategy<Value = (String, u64)> {
    let leaf = (0..8u32).prop_map(|i| (format!("Role.M{i}"), 1u64 << i));
    leaf.prop_recursive(4, 16, 2, |inner| {
        (inner.clone(), inner).prop_map(|((a, ma), (b, mb))| (format!("({a} + {b})"), ma | mb))
    })
}

const EIGHT: &str =
    "enum Role:\n    M0\n    M1\n    M2\n    M3\n    M4\n    M5\n    M6\n    M7\n\n";

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Folded and unfolded forms compute the same word.
    #[test]
    fn folding_matches_execution((expr, mask) in enum_expr()) {
        let source = format!("{EIGHT}def f() -> Role:\n    return {expr}\n");
        let folded = run_word(&lower(&source, true), "f");
        let unfolded = run_word(&lower(&source, false), "f");
        prop_assert_eq!(&folded, &unfolded);
        prop_assert_eq!(folded, Word::from_u64(mask));
    }

    #[test]
    fn boolean_tests_match_execution(
        (a, ma) in enum_expr(),
        (b, mb) in enum_expr(),
        op in prop::sample::select(vec!["==", "is", "in"]),
    ) {
        let source = format!("{EIGHT}def f() -> bool:\n    return {a} {op} {b}\n");
        let expected = match op {
            "in" => ma & mb == ma,
            _ => ma == mb,
        };
        let folded = run_word(&lower(&source, true), "f");
        let unfolded = run_word(&lower(&source, false), "f");
        prop_assert_eq!(&folded, &unfolded);
        prop_assert_eq!(folded, Word::from_bool(expected));
    }

    /// `x + x == x` for any value, folded or not.
    #[test]
    fn union_is_idempotent((expr, _) in enum_expr(), fold in any::<bool>()) {
        let source = format!("{EIGHT}def f() -> bool:\n    x: Role = {expr}\n    return x + x == x\n");
        prop_assert_eq!(run_word(&lower(&source, fold), "f"), Word::one());
    }
}
