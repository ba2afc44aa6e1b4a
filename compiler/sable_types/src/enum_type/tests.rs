use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sable_diagnostic::ErrorKind;

use super::*;

fn named(interner: &StringInterner, names: &[&str]) -> Vec<EnumMember> {
    names
        .iter()
        .enumerate()
        .map(|(i, n)| {
            let start = u32::try_from(i * 10).unwrap_or(u32::MAX);
            EnumMember::Named {
                name: interner.intern(n),
                span: Span::new(start, start + 3),
            }
        })
        .collect()
}

fn many(interner: &StringInterner, count: usize) -> Vec<EnumMember> {
    let names: Vec<String> = (0..count).map(|i| format!("m{i}")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    named(interner, &refs)
}

#[test]
fn bits_follow_declaration_order() {
    let interner = StringInterner::new();
    let members = named(&interner, &["buy", "sale", "hold"]);
    let Ok(ty) = EnumType::build(interner.intern("Action"), Span::DUMMY, &members) else {
        panic!("valid enum rejected");
    };

    assert_eq!(ty.len(), 3);
    assert_eq!(ty.bit_index(interner.intern("buy")), Some(0));
    assert_eq!(ty.bit_index(interner.intern("hold")), Some(2));
    assert_eq!(ty.member_value(interner.intern("sale")), Some(Word::from_u64(2)));
    assert_eq!(ty.all_members_mask(), Word::from_u64(7));
}

#[test]
fn member_names_are_case_sensitive() {
    let interner = StringInterner::new();
    let members = named(&interner, &["Admin", "admin"]);
    let Ok(ty) = EnumType::build(interner.intern("Roles"), Span::DUMMY, &members) else {
        panic!("case variants are distinct members");
    };
    assert_eq!(ty.len(), 2);
    assert_eq!(ty.bit_index(interner.intern("ADMIN")), None);
}

#[test]
fn empty_enum_rejected() {
    let interner = StringInterner::new();
    let span = Span::new(0, 10);
    let err = EnumType::build(interner.intern("E"), span, &[]);
    assert_eq!(err, Err(EnumDeclarationError::Empty { span }));
}

#[test]
fn pass_only_enum_rejected() {
    let interner = StringInterner::new();
    let err = EnumType::build(
        interner.intern("E"),
        Span::DUMMY,
        &[EnumMember::Pass(Span::new(12, 16))],
    );
    let Err(err) = err else {
        panic!("pass body accepted");
    };
    let diag = err.to_diagnostic(&interner);
    assert_eq!(diag.kind(), ErrorKind::EnumDeclarationException);
    assert_eq!(diag.code, ErrorCode::E2010);
}

#[test]
fn duplicate_member_rejected() {
    let interner = StringInterner::new();
    let members = named(&interner, &["a", "b", "a"]);
    let Err(err) = EnumType::build(interner.intern("E"), Span::DUMMY, &members) else {
        panic!("duplicate accepted");
    };
    assert_eq!(
        err,
        EnumDeclarationError::DuplicateMember {
            member: interner.intern("a"),
            first: Span::new(0, 3),
            second: Span::new(20, 23),
        }
    );
    let diag = err.to_diagnostic(&interner);
    assert_eq!(diag.kind(), ErrorKind::EnumDeclarationException);
    assert_eq!(diag.message, "enum member `a` declared twice");
    assert_eq!(diag.primary_span(), Some(Span::new(20, 23)));
}

#[test]
fn full_word_of_members_accepted() {
    let interner = StringInterner::new();
    let members = many(&interner, MAX_ENUM_MEMBERS);
    let Ok(ty) = EnumType::build(interner.intern("Wide"), Span::DUMMY, &members) else {
        panic!("256 members must fit");
    };
    assert_eq!(ty.bit_index(interner.intern("m255")), Some(255));
    assert_eq!(ty.all_members_mask(), Word::max_value());
}

#[test]
fn one_member_too_many_rejected() {
    let interner = StringInterner::new();
    let members = many(&interner, MAX_ENUM_MEMBERS + 1);
    let err = EnumType::build(interner.intern("Wide"), Span::DUMMY, &members);
    assert!(matches!(
        err,
        Err(EnumDeclarationError::TooManyMembers { count: 257, .. })
    ));
}

#[test]
fn members_iterate_in_order() {
    let interner = StringInterner::new();
    let members = named(&interner, &["z", "y", "x"]);
    let Ok(ty) = EnumType::build(interner.intern("E"), Span::DUMMY, &members) else {
        panic!("valid enum rejected");
    };
    let order: Vec<_> = ty.members().map(|m| interner.lookup(m).to_string()).collect();
    assert_eq!(order, vec!["z", "y", "x"]);
}

proptest! {
    #[test]
    fn distinct_members_get_disjoint_bits(count in 1usize..=MAX_ENUM_MEMBERS) {
        let interner = StringInterner::new();
        let members = many(&interner, count);
        let ty = EnumType::build(interner.intern("E"), Span::DUMMY, &members);
        prop_assert!(ty.is_ok());
        let Ok(ty) = ty else { return Ok(()); };

        let mut seen = Word::zero();
        for member in ty.members() {
            let Some(bit) = ty.member_value(member) else {
                return Err(TestCaseError::fail("member without value"));
            };
            prop_assert!(!bit.is_zero());
            prop_assert!((&bit & &bit.wrapping_sub(&Word::one())).is_zero());
            prop_assert!((&seen & &bit).is_zero());
            seen = &seen | &bit;
        }
        prop_assert_eq!(&seen, &ty.all_members_mask());
        let next = u32::try_from(count).ok().and_then(Word::bit).unwrap_or_else(Word::zero);
        prop_assert_eq!(seen.wrapping_add(&Word::one()), next);
    }
}
