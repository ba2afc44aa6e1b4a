//! Member Set Builder.
//!
//! Turns a raw `enum` declaration into an [`EnumType`]: an ordered set of
//! distinct member names where member `i` owns bit `i` of a 256-bit word.

use indexmap::map::Entry;
use indexmap::IndexMap;
use sable_diagnostic::{Diagnostic, ErrorCode};
use sable_ir::{EnumMember, Name, Span, StringInterner, Word, WORD_BITS};

/// Maximum number of members an enum may declare: one per bit of a word.
pub const MAX_ENUM_MEMBERS: usize = WORD_BITS as usize;

/// Index of an enum in the [`EnumRegistry`](crate::EnumRegistry).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub struct EnumId(u32);

impl EnumId {
    pub const fn new(index: u32) -> Self {
        EnumId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A finalized enum type.
///
/// Immutable once built. Member order is declaration order, which is also
/// bit order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EnumType {
    name: Name,
    span: Span,
    /// Member name -> declaration span. Position in the map is the bit index.
    members: IndexMap<Name, Span>,
}

/// Why an enum declaration was rejected.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum EnumDeclarationError {
    /// No members, or only `pass`.
    #[error("enum must have at least one member")]
    Empty { span: Span },
    /// The same member name appears twice.
    #[error("enum member declared twice")]
    DuplicateMember {
        member: Name,
        first: Span,
        second: Span,
    },
    /// More members than bits in a word.
    #[error("enum declares {count} members; at most {MAX_ENUM_MEMBERS} are allowed")]
    TooManyMembers { count: usize, span: Span },
}

impl EnumDeclarationError {
    pub fn to_diagnostic(&self, interner: &StringInterner) -> Diagnostic {
        match self {
            EnumDeclarationError::Empty { span } => Diagnostic::error(ErrorCode::E2010)
                .with_message(self.to_string())
                .with_label(*span, "enum has no members")
                .with_note("`pass` is not a member"),
            EnumDeclarationError::DuplicateMember {
                member,
                first,
                second,
            } => Diagnostic::error(ErrorCode::E2011)
                .with_message(format!(
                    "enum member `{}` declared twice",
                    interner.lookup(*member)
                ))
                .with_label(*second, "duplicate member")
                .with_secondary_label(*first, "first declared here"),
            EnumDeclarationError::TooManyMembers { span, .. } => {
                Diagnostic::error(ErrorCode::E2012)
                    .with_message(self.to_string())
                    .with_label(*span, "too many members")
            }
        }
    }
}

impl EnumType {
    /// Validate a raw member list and assign bit positions.
    ///
    /// `pass` lines are placeholders and contribute no members. Pure: never
    /// touches any registry.
    pub fn build(
        name: Name,
        span: Span,
        members: &[EnumMember],
    ) -> Result<EnumType, EnumDeclarationError> {
        let mut set: IndexMap<Name, Span> = IndexMap::with_capacity(members.len());
        for member in members {
            let EnumMember::Named { name, span } = *member else {
                continue;
            };
            match set.entry(name) {
                Entry::Occupied(first) => {
                    return Err(EnumDeclarationError::DuplicateMember {
                        member: name,
                        first: *first.get(),
                        second: span,
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(span);
                }
            }
        }

        if set.is_empty() {
            return Err(EnumDeclarationError::Empty { span });
        }
        if set.len() > MAX_ENUM_MEMBERS {
            return Err(EnumDeclarationError::TooManyMembers {
                count: set.len(),
                span,
            });
        }

        Ok(EnumType {
            name,
            span,
            members: set,
        })
    }

    pub fn name(&self) -> Name {
        self.name
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// Number of members (1..=256).
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false for a built enum; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Bit position of a member, or `None` if it is not declared.
    pub fn bit_index(&self, member: Name) -> Option<u32> {
        self.members
            .get_index_of(&member)
            .and_then(|i| u32::try_from(i).ok())
    }

    /// The single-bit mask of a member.
    pub fn member_value(&self, member: Name) -> Option<Word> {
        self.bit_index(member).and_then(Word::bit)
    }

    /// Mask with every declared member's bit set.
    pub fn all_members_mask(&self) -> Word {
        self.members
            .keys()
            .filter_map(|&m| self.member_value(m))
            .fold(Word::zero(), |acc, bit| &acc | &bit)
    }

    /// Members in declaration (bit) order.
    pub fn members(&self) -> impl Iterator<Item = Name> + '_ {
        self.members.keys().copied()
    }
}

#[cfg(test)]
mod tests;
