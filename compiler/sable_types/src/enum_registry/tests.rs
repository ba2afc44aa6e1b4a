use pretty_assertions::assert_eq;
use sable_ir::{EnumMember, Span, StringInterner, Word};

use super::*;

fn build(interner: &StringInterner, name: &str, members: &[&str]) -> EnumType {
    let members: Vec<_> = members
        .iter()
        .map(|m| EnumMember::Named {
            name: interner.intern(m),
            span: Span::DUMMY,
        })
        .collect();
    match EnumType::build(interner.intern(name), Span::DUMMY, &members) {
        Ok(ty) => ty,
        Err(e) => panic!("{e}"),
    }
}

#[test]
fn register_and_resolve() {
    let interner = StringInterner::new();
    let mut registry = EnumRegistry::new();
    assert!(registry.is_empty());

    let roles = registry.register(build(&interner, "Roles", &["ADMIN", "MANAGER"]));
    let food = registry.register(build(&interner, "Food", &["PANCAKE"]));
    assert_ne!(roles, food);
    assert_eq!(registry.len(), 2);

    let Some(ty) = registry.resolve(interner.intern("Roles")) else {
        panic!("Roles not registered");
    };
    assert_eq!(
        ty.member_value(interner.intern("MANAGER")),
        Some(Word::from_u64(2))
    );
    assert_eq!(registry.resolve_id(interner.intern("Food")), Some(food));
    assert!(registry.resolve(interner.intern("Drinks")).is_none());
}

#[test]
fn ids_are_sequential() {
    let interner = StringInterner::new();
    let mut registry = EnumRegistry::new();
    let expected = registry.next_id();
    let id = registry.register(build(&interner, "A", &["x"]));
    assert_eq!(id, expected);
    assert_eq!(registry.next_id(), EnumId::new(1));
}

#[test]
fn iteration_in_registration_order() {
    let interner = StringInterner::new();
    let mut registry = EnumRegistry::new();
    registry.register(build(&interner, "B", &["x"]));
    registry.register(build(&interner, "A", &["y"]));
    let names: Vec<_> = registry
        .iter()
        .map(|(_, ty)| interner.lookup(ty.name()).to_string())
        .collect();
    assert_eq!(names, vec!["B", "A"]);
}
