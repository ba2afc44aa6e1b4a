#![allow(clippy::unwrap_used, reason = "Tests can panic")]

//! Enum declaration and registration through the full pipeline.

use pretty_assertions::assert_eq;
use sable_diagnostic::{ErrorCode, ErrorKind};
use sable_ir::Word;
use sablec::compile;

fn enum_with_members(count: usize) -> String {
    let mut source = String::from("enum Wide:\n");
    for i in 0..count {
        source.push_str(&format!("    M{i}\n"));
    }
    source
}

#[test]
fn every_member_count_up_to_word_width_compiles() {
    for count in 1..=256_u32 {
        let artifact = compile(&enum_with_members(count as usize))
            .unwrap_or_else(|err| panic!("{count} members: {err}"));
        let wide = artifact.enum_summary("Wide").unwrap();
        assert_eq!(wide.members.len(), count as usize);
        assert_eq!(
            wide.value(&format!("M{}", count - 1)),
            Word::bit(count - 1).as_ref()
        );
    }
}

#[test]
fn one_member_past_word_width_fails() {
    let err = compile(&enum_with_members(257)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EnumDeclarationException);
    assert_eq!(err.code(), ErrorCode::E2012);
}

#[test]
fn duplicate_member_fails() {
    let err = compile("enum Role:\n    ADMIN\n    MANAGER\n    ADMIN\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EnumDeclarationException);
    assert_eq!((err.line, err.column), (4, 5));
}

#[test]
fn pass_body_fails() {
    let err = compile("enum Role:\n    pass\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EnumDeclarationException);
}

#[test]
fn pass_alongside_members_is_ignored() {
    let artifact = compile("enum Role:\n    pass\n    ADMIN\n").unwrap();
    let role = artifact.enum_summary("Role").unwrap();
    assert_eq!(role.value("ADMIN"), Some(&Word::from_u64(1)));
    assert_eq!(role.members.len(), 1);
}

#[test]
fn bits_follow_declaration_order() {
    let artifact = compile("enum Role:\n    ADMIN\n    MANAGER\n    GUEST\n").unwrap();
    let role = artifact.enum_summary("Role").unwrap();
    let values: Vec<u64> = role
        .members
        .iter()
        .map(|(_, value)| value.to_u64().unwrap())
        .collect();
    assert_eq!(values, vec![1, 2, 4]);
}

#[test]
fn member_names_are_case_sensitive() {
    let artifact = compile("enum Role:\n    admin\n    ADMIN\n").unwrap();
    let role = artifact.enum_summary("Role").unwrap();
    assert_eq!(role.value("admin"), Some(&Word::from_u64(1)));
    assert_eq!(role.value("ADMIN"), Some(&Word::from_u64(2)));
}

const ROLE: &str = "enum Role:\n    ADMIN\n";

#[test]
fn enum_collides_with_every_kind_in_both_orders() {
    let others = [
        "event Role:\n    who: address\n",
        "struct Role:\n    who: address\n",
        "def Role():\n    pass\n",
        "enum Role:\n    GUEST\n",
        "interface Role:\n    def lookup() -> uint256: view\n",
        "Role: constant(uint256) = 1\n",
    ];
    for other in others {
        for source in [format!("{ROLE}\n{other}"), format!("{other}\n{ROLE}")] {
            let err = compile(&source).unwrap_err();
            assert_eq!(
                err.kind(),
                ErrorKind::NamespaceCollision,
                "source:\n{source}"
            );
        }
    }
}

#[test]
fn collision_reports_the_later_declaration() {
    let err = compile("event Role:\n    who: address\n\nenum Role:\n    ADMIN\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NamespaceCollision);
    assert_eq!(err.line, 4);
    assert_eq!(
        err.diagnostic.message,
        "`Role` is already declared as an event"
    );
}
