use pretty_assertions::assert_eq;
use sable_diagnostic::ErrorKind;
use sable_ir::Item;

use crate::test_helpers::{parse_err, parse_ok};

const CONTRACT: &str = "\
# Roles and who holds them
enum Role:
    ADMIN
    MANAGER

struct Grant:
    who: address
    role: Role

event Granted:
    who: address

interface Registry:
    def lookup(who: address) -> Role: view

FULL: constant(Role) = Role.ADMIN + Role.MANAGER

@external
@view
def is_admin(r: Role) -> bool:
    return Role.ADMIN in r
";

#[test]
fn test_parse_full_contract() {
    let (module, interner) = parse_ok(CONTRACT);
    let names: Vec<_> = module
        .items
        .iter()
        .map(|item| interner.lookup(item.name()).to_string())
        .collect();
    assert_eq!(
        names,
        vec!["Role", "Grant", "Granted", "Registry", "FULL", "is_admin"]
    );
    assert!(matches!(module.items[0], Item::Enum(_)));
    assert!(matches!(module.items[5], Item::Function(_)));
}

#[test]
fn test_item_name_spans_point_at_names() {
    let (module, _) = parse_ok(CONTRACT);
    for item in &module.items {
        let span = item.name_span();
        assert!(!span.is_empty());
        assert!(CONTRACT[span.to_range()].chars().all(|c| c.is_alphanumeric() || c == '_'));
    }
}

#[test]
fn test_empty_source() {
    let (module, _) = parse_ok("");
    assert!(module.items.is_empty());
    let (module, _) = parse_ok("# only a comment\n\n");
    assert!(module.items.is_empty());
}

#[test]
fn test_parse_errors_are_syntax_or_structure() {
    assert_eq!(parse_err("enum:\n").kind(), ErrorKind::SyntaxException);
    assert_eq!(parse_err("enum A\n").kind(), ErrorKind::SyntaxException);
    assert_eq!(
        parse_err("enum A:\n    x y\n").kind(),
        ErrorKind::StructureException
    );
}
