use pretty_assertions::assert_eq;
use sable_diagnostic::{ErrorCode, ErrorKind};
use sable_ir::{Mutability, Visibility, Word};

use crate::test_helpers::{declare_err, declare_ok};
use crate::{SymbolKind, Ty};

#[test]
fn enum_is_declared_and_registered() {
    let (_, ctx) = declare_ok("enum Role:\n    ADMIN\n    MANAGER\n");
    let name = ctx.interner.intern("Role");

    let Some(entry) = ctx.namespace.get(name) else {
        panic!("Role not declared");
    };
    assert_eq!(entry.kind, SymbolKind::Enum);
    let Some(Ty::Enum(id)) = entry.ty else {
        panic!("enum entry without enum type");
    };
    assert_eq!(ctx.enums.resolve_id(name), Some(id));

    let role = ctx.enums.get(id);
    assert_eq!(
        role.member_value(ctx.interner.intern("MANAGER")),
        Some(Word::from_u64(2))
    );
}

#[test]
fn empty_enum_is_rejected_before_namespace() {
    let diag = declare_err("enum Nothing:\n    pass\n");
    assert_eq!(diag.code, ErrorCode::E2010);
    assert_eq!(diag.kind(), ErrorKind::EnumDeclarationException);
}

#[test]
fn enum_colliding_with_every_kind() {
    let others = [
        "event Role:\n    who: address\n",
        "struct Role:\n    who: address\n",
        "def Role():\n    pass\n",
        "interface Role:\n    def f(): view\n",
        "Role: constant(uint256) = 1\n",
        "enum Role:\n    OTHER\n",
    ];
    for other in others {
        let source = format!("{other}\nenum Role:\n    ADMIN\n");
        let diag = declare_err(&source);
        assert_eq!(diag.kind(), ErrorKind::NamespaceCollision, "{other}");

        let reversed = format!("enum Role:\n    ADMIN\n\n{other}");
        let diag = declare_err(&reversed);
        assert_eq!(diag.kind(), ErrorKind::NamespaceCollision, "{other}");
    }
}

#[test]
fn collision_points_at_first_declaration() {
    let diag = declare_err("event Action:\n    pass\n\nenum Action:\n    buy\n");
    assert_eq!(diag.labels.len(), 2);
    assert!(diag.message.contains("already declared as an event"));
}

#[test]
fn builtin_type_names_are_taken() {
    let diag = declare_err("enum uint256:\n    A\n");
    assert_eq!(diag.code, ErrorCode::E2006);
}

#[test]
fn struct_fields_may_use_later_types() {
    let (_, ctx) = declare_ok(
        "struct Outer:\n    inner: Inner\n    flag: bool\n\nstruct Inner:\n    a: uint256\n    b: Role\n\nenum Role:\n    A\n",
    );
    let Some(outer) = ctx.structs.resolve_id(ctx.interner.intern("Outer")) else {
        panic!("Outer missing");
    };
    let def = ctx.structs.get(outer);
    assert_eq!(def.width, 3);
    let offsets: Vec<u32> = def.fields.iter().map(|f| f.offset).collect();
    assert_eq!(offsets, vec![0, 2]);
}

#[test]
fn recursive_struct_is_rejected() {
    let diag = declare_err("struct A:\n    b: B\n\nstruct B:\n    a: A\n");
    assert_eq!(diag.code, ErrorCode::E2009);
}

#[test]
fn duplicate_struct_field_is_rejected() {
    let diag = declare_err("struct A:\n    x: bool\n    x: bool\n");
    assert_eq!(diag.kind(), ErrorKind::StructureException);
}

#[test]
fn unknown_type_is_undeclared() {
    let diag = declare_err("struct A:\n    x: Missing\n");
    assert_eq!(diag.code, ErrorCode::E2002);
    assert_eq!(diag.kind(), ErrorKind::UndeclaredDefinition);
}

#[test]
fn event_used_as_type_is_invalid_reference() {
    let diag = declare_err("event Ping:\n    pass\n\ndef f(p: Ping):\n    pass\n");
    assert_eq!(diag.code, ErrorCode::E2008);
    assert_eq!(diag.kind(), ErrorKind::InvalidReference);
}

#[test]
fn function_signature_defaults() {
    let (_, ctx) = declare_ok(
        "enum Role:\n    A\n\n@external\n@view\ndef get(r: Role) -> bool:\n    return True\n\ndef helper():\n    pass\n",
    );
    let Some(get) = ctx.resolve_function(ctx.interner.intern("get")) else {
        panic!("get missing");
    };
    let sig = ctx.function(get);
    assert_eq!(sig.visibility, Visibility::External);
    assert_eq!(sig.mutability, Mutability::View);
    assert_eq!(sig.ret, Some(Ty::Bool));
    assert_eq!(sig.params.len(), 1);

    let Some(helper) = ctx.resolve_function(ctx.interner.intern("helper")) else {
        panic!("helper missing");
    };
    assert_eq!(ctx.function(helper).visibility, Visibility::Internal);
    assert_eq!(ctx.function(helper).ret, None);
}

#[test]
fn conflicting_decorators_are_rejected() {
    let diag = declare_err("@external\n@internal\ndef f():\n    pass\n");
    assert_eq!(diag.code, ErrorCode::E2009);
}

#[test]
fn constant_type_is_recorded_in_namespace() {
    let (_, ctx) = declare_ok("enum Role:\n    A\n\nALL: constant(Role) = Role.A\n");
    let Some(entry) = ctx.namespace.get(ctx.interner.intern("ALL")) else {
        panic!("ALL missing");
    };
    assert_eq!(entry.kind, SymbolKind::Constant);
    assert!(matches!(entry.ty, Some(Ty::Enum(_))));
}

#[test]
fn interface_methods_are_collected() {
    let (_, ctx) = declare_ok(
        "enum Role:\n    A\n\ninterface Registry:\n    def lookup(who: address) -> Role: view\n",
    );
    assert_eq!(ctx.interfaces.len(), 1);
    let method = &ctx.interfaces[0].methods[0];
    assert_eq!(method.params, vec![Ty::Address]);
    assert!(matches!(method.ret, Some(Ty::Enum(_))));
}
