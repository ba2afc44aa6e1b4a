use pretty_assertions::assert_eq;
use sable_diagnostic::{ErrorCode, ErrorKind};
use sable_ir::{ExprId, Item, Module, StmtKind};

use crate::test_helpers::{check_err, check_ok};
use crate::{BinaryKind, CompilationContext, Resolution, Ty};

const ROLES: &str = "enum Role:\n    ADMIN\n    MANAGER\n\nenum Food:\n    PANCAKE\n    WAFFLE\n\n";

/// The value of the final `return` in function `name`.
fn returned(module: &Module, ctx: &CompilationContext, name: &str) -> ExprId {
    let name = ctx.interner.intern(name);
    for item in &module.items {
        if let Item::Function(decl) = item {
            if decl.name == name {
                if let Some(StmtKind::Return(Some(value))) = decl.body.last().map(|s| &s.kind) {
                    return *value;
                }
            }
        }
    }
    panic!("no returning function named {name:?}");
}

fn with_roles(body: &str) -> String {
    format!("{ROLES}{body}")
}

// ===== Enum expressions =====

#[test]
fn member_access_is_constant_single_bit() {
    let (module, ctx, typed) = check_ok(&with_roles("def f() -> Role:\n    return Role.MANAGER\n"));
    let value = returned(&module, &ctx, "f");
    let info = typed.expr(value).unwrap();
    assert!(info.is_compile_time_constant());
    assert!(matches!(info.static_type(), Ty::Enum(_)));
    assert!(matches!(
        info.resolution,
        Resolution::EnumMember { bit: 1, .. }
    ));
}

#[test]
fn union_and_membership_types() {
    let (module, ctx, typed) = check_ok(&with_roles(
        "def both() -> Role:\n    return Role.ADMIN + Role.MANAGER\n\ndef has(r: Role) -> bool:\n    return Role.ADMIN in r\n",
    ));
    let both = typed.expr(returned(&module, &ctx, "both")).unwrap();
    assert!(matches!(both.ty, Ty::Enum(_)));
    assert_eq!(both.resolution, Resolution::Binary(BinaryKind::EnumUnion));
    assert!(both.constant);

    let has = typed.expr(returned(&module, &ctx, "has")).unwrap();
    assert_eq!(has.ty, Ty::Bool);
    assert_eq!(has.resolution, Resolution::Binary(BinaryKind::EnumContains));
    assert!(!has.constant);
}

#[test]
fn membership_in_list_literal() {
    let (module, ctx, typed) = check_ok(&with_roles(
        "def f() -> bool:\n    return Role.ADMIN in [Role.ADMIN, Role.MANAGER]\n",
    ));
    let info = typed.expr(returned(&module, &ctx, "f")).unwrap();
    assert_eq!(
        info.resolution,
        Resolution::Binary(BinaryKind::EnumContainsAny)
    );
    assert!(info.constant);
}

#[test]
fn cross_enum_union_is_type_mismatch() {
    let diag = check_err(&with_roles(
        "def f() -> Role:\n    return Role.ADMIN + Food.PANCAKE\n",
    ));
    assert_eq!(diag.code, ErrorCode::E2001);
    assert_eq!(diag.kind(), ErrorKind::TypeMismatch);
}

#[test]
fn cross_enum_comparison_is_type_mismatch() {
    for op in ["==", "is", "in"] {
        let diag = check_err(&with_roles(&format!(
            "def f() -> bool:\n    return Role.ADMIN {op} Food.PANCAKE\n"
        )));
        assert_eq!(diag.kind(), ErrorKind::TypeMismatch, "{op}");
    }
}

#[test]
fn unknown_member_wins_over_cross_type() {
    let diag = check_err(&with_roles(
        "def f() -> Role:\n    return Role.ADMIN + Food.NOPE\n",
    ));
    assert_eq!(diag.kind(), ErrorKind::UnknownAttribute);
}

#[test]
fn member_names_are_case_sensitive() {
    let diag = check_err(&with_roles("def f() -> Role:\n    return Role.Admin\n"));
    assert_eq!(diag.code, ErrorCode::E2007);
}

#[test]
fn enum_mixed_with_integer_is_mismatch() {
    let diag = check_err(&with_roles("def f() -> Role:\n    return Role.ADMIN + 1\n"));
    assert_eq!(diag.kind(), ErrorKind::TypeMismatch);
}

#[test]
fn other_operators_on_enums_are_invalid() {
    for op in ["-", "*", "<", "!=", "and"] {
        let diag = check_err(&with_roles(&format!(
            "def f(a: Role, b: Role):\n    x: bool = a {op} b\n"
        )));
        assert_eq!(diag.kind(), ErrorKind::InvalidOperation, "{op}");
    }
}

#[test]
fn unary_on_enum_is_invalid() {
    let diag = check_err(&with_roles("def f(a: Role) -> bool:\n    return not a\n"));
    assert_eq!(diag.kind(), ErrorKind::InvalidOperation);
}

#[test]
fn enum_name_as_value_is_invalid_reference() {
    for body in [
        "def f() -> Role:\n    return Role\n",
        "def f(x: Role) -> Role:\n    return Role + x\n",
        "def f(x: Role) -> bool:\n    return x == Role\n",
    ] {
        let diag = check_err(&with_roles(body));
        assert_eq!(diag.kind(), ErrorKind::InvalidReference, "{body}");
    }
}

#[test]
fn attribute_on_enum_value_is_structure_error() {
    let diag = check_err(&with_roles("def f(x: Role) -> Role:\n    return x.ADMIN\n"));
    assert_eq!(diag.kind(), ErrorKind::StructureException);
}

#[test]
fn list_elements_must_match() {
    let diag = check_err(&with_roles(
        "def f() -> bool:\n    return Role.ADMIN in [Role.ADMIN, Food.WAFFLE]\n",
    ));
    assert_eq!(diag.kind(), ErrorKind::TypeMismatch);
}

#[test]
fn list_outside_in_is_structure_error() {
    let diag = check_err(&with_roles(
        "def f() -> bool:\n    return [Role.ADMIN] == Role.ADMIN\n",
    ));
    assert_eq!(diag.kind(), ErrorKind::StructureException);
}

#[test]
fn returning_another_enum_is_mismatch() {
    let diag = check_err(&with_roles("def f() -> Role:\n    return Food.WAFFLE\n"));
    assert_eq!(diag.kind(), ErrorKind::TypeMismatch);
    assert!(!diag.notes.is_empty());
}

// ===== Constants =====

#[test]
fn constants_are_compile_time() {
    let (module, ctx, typed) = check_ok(&with_roles(
        "BOTH: constant(Role) = FIRST + Role.MANAGER\nFIRST: constant(Role) = Role.ADMIN\n\ndef f() -> Role:\n    return BOTH\n",
    ));
    let info = typed.expr(returned(&module, &ctx, "f")).unwrap();
    assert!(info.constant);
    assert_eq!(info.resolution, Resolution::Constant(ctx.interner.intern("BOTH")));
}

#[test]
fn constant_cycle_is_rejected() {
    let diag = check_err("A: constant(uint256) = B\nB: constant(uint256) = A\n");
    assert_eq!(diag.code, ErrorCode::E2009);
    assert!(diag.message.contains("depends on itself"));
}

#[test]
fn constant_must_not_call() {
    let diag = check_err("def g() -> uint256:\n    return 1\n\nA: constant(uint256) = g()\n");
    assert_eq!(diag.code, ErrorCode::E2009);
}

// ===== Functions, locals, structs =====

#[test]
fn locals_get_consecutive_slots() {
    let (_, ctx, typed) = check_ok(
        "struct Pair:\n    a: uint256\n    b: uint256\n\ndef f(x: uint256) -> uint256:\n    p: Pair = Pair({b: 2, a: x})\n    y: uint256 = p.b\n    return y\n",
    );
    let Some(id) = ctx.resolve_function(ctx.interner.intern("f")) else {
        panic!("f missing");
    };
    let frame = typed.function(id).unwrap();
    assert_eq!(frame.frame_size, 4);
    let slot = |name: &str| frame.locals[&ctx.interner.intern(name)].slot;
    assert_eq!((slot("x"), slot("p"), slot("y")), (0, 1, 3));
}

#[test]
fn struct_literal_field_errors() {
    let source = "struct Pair:\n    a: uint256\n    b: uint256\n\n";
    let missing = check_err(&format!("{source}def f() -> Pair:\n    return Pair({{a: 1}})\n"));
    assert_eq!(missing.kind(), ErrorKind::ArgumentException);

    let unknown = check_err(&format!(
        "{source}def f() -> Pair:\n    return Pair({{a: 1, c: 2}})\n"
    ));
    assert_eq!(unknown.kind(), ErrorKind::UnknownAttribute);

    let twice = check_err(&format!(
        "{source}def f() -> Pair:\n    return Pair({{a: 1, a: 2}})\n"
    ));
    assert_eq!(twice.kind(), ErrorKind::StructureException);
}

#[test]
fn calls_check_arity_and_visibility() {
    let arity = check_err("def g(a: uint256):\n    pass\n\ndef f():\n    g()\n");
    assert_eq!(arity.kind(), ErrorKind::ArgumentException);

    let external = check_err("@external\ndef g():\n    pass\n\ndef f():\n    g()\n");
    assert_eq!(external.code, ErrorCode::E2009);

    let enum_call = check_err(&with_roles("def f():\n    Role()\n"));
    assert_eq!(enum_call.kind(), ErrorKind::InvalidReference);
}

#[test]
fn local_shadowing_top_level_name_collides() {
    let diag = check_err(&with_roles("def f():\n    Role: uint256 = 1\n"));
    assert_eq!(diag.kind(), ErrorKind::NamespaceCollision);
}

#[test]
fn parameters_are_immutable() {
    let diag = check_err("def f(x: uint256):\n    x = 2\n");
    assert_eq!(diag.code, ErrorCode::E2009);
}

#[test]
fn missing_final_return_is_rejected() {
    let diag = check_err("def f() -> uint256:\n    pass\n");
    assert_eq!(diag.kind(), ErrorKind::StructureException);
}

#[test]
fn unknown_name_is_undeclared() {
    let diag = check_err("def f() -> uint256:\n    return nope\n");
    assert_eq!(diag.code, ErrorCode::E2003);
}

#[test]
fn literal_takes_type_from_context() {
    let (module, ctx, typed) = check_ok("def f(x: uint8) -> uint8:\n    return 1 + x\n");
    let value = returned(&module, &ctx, "f");
    assert_eq!(typed.static_type(value), Some(Ty::Uint8));
}

#[test]
fn assert_needs_bool() {
    let diag = check_err("def f():\n    assert 1\n");
    assert_eq!(diag.kind(), ErrorKind::TypeMismatch);
}
