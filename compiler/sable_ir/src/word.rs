//! 256-bit unsigned machine word.
//!
//! Every runtime value in Sable lowers to one `Word`. Enum values are
//! bit-masks inside a word, integers wrap modulo 2^256, booleans are 0 or 1.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor};

use num_bigint::BigUint;
use num_traits::{Num, One, ToPrimitive, Zero};

/// Width of the host machine word in bits.
pub const WORD_BITS: u32 = 256;

/// An unsigned 256-bit integer.
///
/// Invariant: the wrapped value is always `< 2^256`. Every constructor and
/// arithmetic operation re-establishes it.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct Word(BigUint);

fn modulus() -> BigUint {
    BigUint::one() << WORD_BITS
}

impl Word {
    /// The zero word.
    pub fn zero() -> Self {
        Word(BigUint::zero())
    }

    /// The word with value one.
    pub fn one() -> Self {
        Word(BigUint::one())
    }

    /// `2^256 - 1`.
    pub fn max_value() -> Self {
        Word(modulus() - BigUint::one())
    }

    pub fn from_u64(value: u64) -> Self {
        Word(BigUint::from(value))
    }

    /// `1` for `true`, `0` for `false`.
    pub fn from_bool(value: bool) -> Self {
        if value {
            Self::one()
        } else {
            Self::zero()
        }
    }

    /// Word with only bit `index` set, or `None` if the index is outside the
    /// word.
    pub fn bit(index: u32) -> Option<Self> {
        (index < WORD_BITS).then(|| Word(BigUint::one() << index))
    }

    /// Parse a decimal literal (digits only). `None` if it does not fit.
    pub fn parse_decimal(digits: &str) -> Option<Self> {
        Self::parse_radix(digits, 10)
    }

    /// Parse hex digits (without the `0x` prefix). `None` if it does not fit.
    pub fn parse_hex(digits: &str) -> Option<Self> {
        Self::parse_radix(digits, 16)
    }

    fn parse_radix(digits: &str, radix: u32) -> Option<Self> {
        if digits.is_empty() {
            return None;
        }
        let value = BigUint::from_str_radix(digits, radix).ok()?;
        (value < modulus()).then_some(Word(value))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Bitwise complement within the word.
    #[must_use]
    pub fn not(&self) -> Self {
        Word(&self.0 ^ &Self::max_value().0)
    }

    #[must_use]
    pub fn wrapping_add(&self, rhs: &Word) -> Self {
        Word((&self.0 + &rhs.0) % modulus())
    }

    #[must_use]
    pub fn wrapping_sub(&self, rhs: &Word) -> Self {
        Word((&self.0 + modulus() - &rhs.0) % modulus())
    }

    #[must_use]
    pub fn wrapping_mul(&self, rhs: &Word) -> Self {
        Word((&self.0 * &rhs.0) % modulus())
    }

    /// Unsigned division; `None` on division by zero.
    pub fn checked_div(&self, rhs: &Word) -> Option<Self> {
        (!rhs.is_zero()).then(|| Word(&self.0 / &rhs.0))
    }

    /// Unsigned remainder; `None` on division by zero.
    pub fn checked_rem(&self, rhs: &Word) -> Option<Self> {
        (!rhs.is_zero()).then(|| Word(&self.0 % &rhs.0))
    }

    pub fn to_u64(&self) -> Option<u64> {
        self.0.to_u64()
    }
}

impl BitOr for &Word {
    type Output = Word;

    fn bitor(self, rhs: &Word) -> Word {
        Word(&self.0 | &rhs.0)
    }
}

impl BitAnd for &Word {
    type Output = Word;

    fn bitand(self, rhs: &Word) -> Word {
        Word(&self.0 & &rhs.0)
    }
}

impl BitXor for &Word {
    type Output = Word;

    fn bitxor(self, rhs: &Word) -> Word {
        Word(&self.0 ^ &rhs.0)
    }
}

impl From<u64> for Word {
    fn from(value: u64) -> Self {
        Word::from_u64(value)
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word(0x{:x})", self.0)
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::LowerHex for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}
