//! 128-bit permission set value
//!
//! Sets are plain `Copy` values: every operation returns a new set and bits
//! outside the known catalog are carried through untouched, so a value echoed
//! back by older software never loses bits it does not understand.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign, Sub, SubAssign};
use std::str::FromStr;

use byteorder::{BigEndian, ByteOrder};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::bits::PermissionBit;
use crate::error::{Error, ParseError, Result};

/// Number of addressable permission bits
pub const BIT_WIDTH: u32 = 128;

/// An immutable set of permission bits
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PermissionSet(u128);

impl PermissionSet {
    pub const EMPTY: PermissionSet = PermissionSet(0);

    #[inline]
    pub const fn empty() -> Self {
        Self::EMPTY
    }

    #[inline]
    pub const fn from_bit(bit: PermissionBit) -> Self {
        PermissionSet(1u128 << bit.index())
    }

    /// Single-bit set for a raw index, including indices the catalog does not name
    pub fn from_index(index: u32) -> Result<Self> {
        if index >= BIT_WIDTH {
            return Err(Error::BitOutOfRange(index));
        }
        Ok(PermissionSet(1u128 << index))
    }

    #[inline]
    pub const fn from_bits(bits: u128) -> Self {
        PermissionSet(bits)
    }

    #[inline]
    pub const fn bits(self) -> u128 {
        self.0
    }

    /// True iff every bit of `other` is present in `self`
    #[inline]
    pub const fn has(self, other: PermissionSet) -> bool {
        (self.0 & other.0) == other.0
    }

    #[inline]
    pub const fn has_bit(self, bit: PermissionBit) -> bool {
        self.has(Self::from_bit(bit))
    }

    #[inline]
    pub const fn is_admin(self) -> bool {
        self.has_bit(PermissionBit::Administrator)
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// OR of `self` with every operand
    pub fn union<I>(self, sets: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<PermissionSet>,
    {
        sets.into_iter().fold(self, |acc, s| PermissionSet(acc.0 | s.into().0))
    }

    /// `self` with every bit of every operand cleared
    pub fn subtract<I>(self, sets: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<PermissionSet>,
    {
        let mask = PermissionSet::EMPTY.union(sets);
        PermissionSet(self.0 & !mask.0)
    }

    #[inline]
    pub const fn intersection(self, other: PermissionSet) -> Self {
        PermissionSet(self.0 & other.0)
    }

    /// Set bit indices, lowest first
    pub fn indices(self) -> impl Iterator<Item = u32> {
        (0..BIT_WIDTH).filter(move |i| self.0 & (1u128 << i) != 0)
    }

    /// Fixed 16-byte big-endian form, for storage keys
    pub fn to_be_bytes(self) -> [u8; 16] {
        let mut buf = [0u8; 16];
        BigEndian::write_u128(&mut buf, self.0);
        buf
    }

    pub fn from_be_bytes(buf: [u8; 16]) -> Self {
        PermissionSet(BigEndian::read_u128(&buf))
    }

    /// Parse the decimal wire form
    pub fn parse(s: &str) -> std::result::Result<Self, ParseError> {
        if s.is_empty() {
            return Err(ParseError::Empty);
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::InvalidDigit { input: s.to_string() });
        }
        // only digits remain, so the sole failure left is overflow
        s.parse::<u128>()
            .map(PermissionSet)
            .map_err(|_| ParseError::Overflow { input: s.to_string() })
    }
}

impl From<PermissionBit> for PermissionSet {
    fn from(bit: PermissionBit) -> Self {
        PermissionSet::from_bit(bit)
    }
}

impl FromIterator<PermissionBit> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = PermissionBit>>(iter: I) -> Self {
        PermissionSet::EMPTY.union(iter)
    }
}

impl FromIterator<PermissionSet> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = PermissionSet>>(iter: I) -> Self {
        PermissionSet::EMPTY.union(iter)
    }
}

impl<T: Into<PermissionSet>> BitOr<T> for PermissionSet {
    type Output = PermissionSet;

    fn bitor(self, rhs: T) -> PermissionSet {
        PermissionSet(self.0 | rhs.into().0)
    }
}

impl<T: Into<PermissionSet>> BitOrAssign<T> for PermissionSet {
    fn bitor_assign(&mut self, rhs: T) {
        self.0 |= rhs.into().0;
    }
}

impl<T: Into<PermissionSet>> BitAnd<T> for PermissionSet {
    type Output = PermissionSet;

    fn bitand(self, rhs: T) -> PermissionSet {
        PermissionSet(self.0 & rhs.into().0)
    }
}

impl<T: Into<PermissionSet>> Sub<T> for PermissionSet {
    type Output = PermissionSet;

    fn sub(self, rhs: T) -> PermissionSet {
        PermissionSet(self.0 & !rhs.into().0)
    }
}

impl<T: Into<PermissionSet>> SubAssign<T> for PermissionSet {
    fn sub_assign(&mut self, rhs: T) {
        self.0 &= !rhs.into().0;
    }
}

impl fmt::Display for PermissionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for PermissionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PermissionSet(0x{:x})", self.0)
    }
}

impl FromStr for PermissionSet {
    type Err = ParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        PermissionSet::parse(s)
    }
}

impl Serialize for PermissionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct PermissionSetVisitor;

impl<'de> Visitor<'de> for PermissionSetVisitor {
    type Value = PermissionSet;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a base-10 permission string or a non-negative integer")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<PermissionSet, E> {
        PermissionSet::parse(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<PermissionSet, E> {
        Ok(PermissionSet(v as u128))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> std::result::Result<PermissionSet, E> {
        Ok(PermissionSet(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<PermissionSet, E> {
        u64::try_from(v)
            .map(|v| PermissionSet(v as u128))
            .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
    }

    // Floats reach here when a JSON number exceeded u64; the low bits are already gone.
    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<PermissionSet, E> {
        Err(E::invalid_value(de::Unexpected::Float(v), &self))
    }
}

impl<'de> Deserialize<'de> for PermissionSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(PermissionSetVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::PermissionBit::*;

    #[test]
    fn has_requires_every_bit() {
        let p = PermissionSet::from_bit(SendMessages);
        let both = PermissionSet::from_iter([SendMessages, AttachFiles]);
        assert!(p.has(PermissionSet::from_bit(SendMessages)));
        assert!(!p.has(both));
        assert!(both.has(p));
        assert!(p.has(PermissionSet::EMPTY));
    }

    #[test]
    fn union_and_subtract_take_many_operands() {
        let p = PermissionSet::EMPTY.union([ViewRoom, SendMessages, AttachFiles]);
        assert_eq!(p.len(), 3);
        let q = p.subtract([SendMessages, AttachFiles]);
        assert_eq!(q, PermissionSet::from_bit(ViewRoom));
        assert_eq!(p.subtract([PermissionSet::EMPTY]), p);
    }

    #[test]
    fn operators_match_methods() {
        let a = PermissionSet::from_bit(ViewRoom) | SendMessages;
        assert_eq!(a, PermissionSet::EMPTY.union([ViewRoom, SendMessages]));
        assert_eq!(a - SendMessages, PermissionSet::from_bit(ViewRoom));
        assert_eq!(a & ViewRoom, PermissionSet::from_bit(ViewRoom));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(PermissionSet::parse(""), Err(ParseError::Empty));
        assert!(matches!(PermissionSet::parse("12a"), Err(ParseError::InvalidDigit { .. })));
        assert!(matches!(PermissionSet::parse("-1"), Err(ParseError::InvalidDigit { .. })));
        assert!(matches!(PermissionSet::parse(" 1"), Err(ParseError::InvalidDigit { .. })));
        // 2^128
        assert!(matches!(
            PermissionSet::parse("340282366920938463463374607431768211456"),
            Err(ParseError::Overflow { .. })
        ));
        assert_eq!(
            PermissionSet::parse("340282366920938463463374607431768211455").unwrap().bits(),
            u128::MAX
        );
    }

    #[test]
    fn from_index_bounds() {
        assert_eq!(PermissionSet::from_index(127).unwrap(), PermissionSet::from_bit(Test));
        assert_eq!(PermissionSet::from_index(128), Err(Error::BitOutOfRange(128)));
    }

    #[test]
    fn serde_uses_decimal_strings() {
        let p = PermissionSet::from_bit(Test) | SendMessages;
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, format!("\"{}\"", p.bits()));
        assert_eq!(serde_json::from_str::<PermissionSet>(&json).unwrap(), p);
        assert_eq!(serde_json::from_str::<PermissionSet>("4294967296").unwrap(), PermissionSet::from_bit(SendMessages));
        assert!(serde_json::from_str::<PermissionSet>("-4").is_err());
        assert!(serde_json::from_str::<PermissionSet>("\"nope\"").is_err());
    }

    #[test]
    fn big_endian_bytes() {
        let p = PermissionSet::from_bit(Test) | Administrator;
        let b = p.to_be_bytes();
        assert_eq!(b[0], 0x80);
        assert_eq!(b[15], 0x01);
        assert_eq!(PermissionSet::from_be_bytes(b), p);
    }

    #[test]
    fn indices_lists_set_bits() {
        let p = PermissionSet::from_bits((1 << 100) | (1 << 3));
        assert_eq!(p.indices().collect::<Vec<_>>(), vec![3, 100]);
    }
}
