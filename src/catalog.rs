//! Permission catalog: stable names, reserved bit indices and bundles
//!
//! A catalog is built once at startup and then only read. Indices are handed
//! out once; retiring a name drops it from lookup but keeps its index reserved
//! so stored or transmitted sets never change meaning.

use std::collections::BTreeMap;

use tracing::debug;

use crate::bits::PermissionBit;
use crate::error::CatalogError;
use crate::set::{PermissionSet, BIT_WIDTH};

/// Name of the bundle granted to new party members
pub const DEFAULT_BUNDLE: &str = "DEFAULT";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Slot {
    name: String,
    retired: bool,
}

/// Immutable name/bit table with derived `ALL` and named bundles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionCatalog {
    names: BTreeMap<String, u32>,
    slots: BTreeMap<u32, Slot>,
    bundles: BTreeMap<String, PermissionSet>,
    all: PermissionSet,
}

impl PermissionCatalog {
    /// The platform's built-in table
    pub fn standard() -> Self {
        CatalogBuilder::standard().build()
    }

    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
    }

    /// Union of every defined, non-retired bit
    #[inline]
    pub fn all(&self) -> PermissionSet {
        self.all
    }

    pub fn bundle(&self, name: &str) -> Option<PermissionSet> {
        self.bundles.get(name).copied()
    }

    /// Default grant for new members; empty when no such bundle is defined
    pub fn default_member(&self) -> PermissionSet {
        self.bundle(DEFAULT_BUNDLE).unwrap_or_default()
    }

    /// Bit index of an active name
    pub fn bit(&self, name: &str) -> Option<u32> {
        self.names.get(name).copied()
    }

    pub fn get(&self, name: &str) -> Option<PermissionSet> {
        self.bit(name).map(|b| PermissionSet::from_bits(1u128 << b))
    }

    /// Active name for an index; retired and unassigned indices have none
    pub fn name_of(&self, bit: u32) -> Option<&str> {
        self.slots
            .get(&bit)
            .filter(|s| !s.retired)
            .map(|s| s.name.as_str())
    }

    /// True once an index has ever been assigned, retired or not
    pub fn is_reserved(&self, bit: u32) -> bool {
        self.slots.contains_key(&bit)
    }

    pub fn is_retired(&self, bit: u32) -> bool {
        self.slots.get(&bit).is_some_and(|s| s.retired)
    }

    /// Active names present in `set`, lowest index first
    pub fn names(&self, set: PermissionSet) -> Vec<&str> {
        set.indices().filter_map(|i| self.name_of(i)).collect()
    }

    /// Bits of `set` this catalog has no active name for
    pub fn unknown_bits(&self, set: PermissionSet) -> PermissionSet {
        set.subtract([self.all])
    }

    /// Union of the named permissions; any unknown name is an error
    pub fn parse_names<S: AsRef<str>>(&self, names: &[S]) -> Result<PermissionSet, CatalogError> {
        names.iter().try_fold(PermissionSet::EMPTY, |acc, n| {
            let n = n.as_ref();
            self.get(n)
                .map(|p| acc | p)
                .ok_or_else(|| CatalogError::UnknownName(n.to_string()))
        })
    }

    /// Active `(name, bit)` pairs in index order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.slots
            .iter()
            .filter(|(_, s)| !s.retired)
            .map(|(b, s)| (s.name.as_str(), *b))
    }

    pub fn bundles(&self) -> impl Iterator<Item = (&str, PermissionSet)> {
        self.bundles.iter().map(|(n, p)| (n.as_str(), *p))
    }
}

impl Default for PermissionCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// Append-only builder for [`PermissionCatalog`]
#[derive(Debug, Clone, Default)]
pub struct CatalogBuilder {
    names: BTreeMap<String, u32>,
    slots: BTreeMap<u32, Slot>,
    bundles: BTreeMap<String, Vec<u32>>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder preloaded with every [`PermissionBit`] and the `DEFAULT` bundle
    pub fn standard() -> Self {
        let mut b = Self::new();
        for bit in PermissionBit::ALL {
            b.names.insert(bit.as_str().to_string(), bit.index());
            b.slots.insert(bit.index(), Slot { name: bit.as_str().to_string(), retired: false });
        }
        b.bundles.insert(
            DEFAULT_BUNDLE.to_string(),
            PermissionBit::DEFAULT.iter().map(|b| b.index()).collect(),
        );
        b
    }

    /// Assign a fresh index to a new name
    pub fn define(&mut self, name: &str, bit: u32) -> Result<&mut Self, CatalogError> {
        if bit >= BIT_WIDTH {
            return Err(CatalogError::BitOutOfRange(bit));
        }
        // retired names stay taken along with their index
        if self.slots.values().any(|s| s.name == name) {
            return Err(CatalogError::DuplicateName(name.to_string()));
        }
        if let Some(slot) = self.slots.get(&bit) {
            let owner = slot.name.clone();
            return Err(if slot.retired {
                CatalogError::BitReserved { bit, owner }
            } else {
                CatalogError::BitTaken { bit, owner }
            });
        }
        self.names.insert(name.to_string(), bit);
        self.slots.insert(bit, Slot { name: name.to_string(), retired: false });
        Ok(self)
    }

    /// Remove a name from lookup; its index stays reserved forever
    pub fn retire(&mut self, name: &str) -> Result<&mut Self, CatalogError> {
        let bit = self
            .names
            .remove(name)
            .ok_or_else(|| CatalogError::UnknownName(name.to_string()))?;
        if let Some(slot) = self.slots.get_mut(&bit) {
            slot.retired = true;
        }
        Ok(self)
    }

    /// Define a named bundle from active permission names
    pub fn bundle<S: AsRef<str>>(&mut self, name: &str, members: &[S]) -> Result<&mut Self, CatalogError> {
        if self.bundles.contains_key(name) {
            return Err(CatalogError::DuplicateBundle(name.to_string()));
        }
        let bits = members
            .iter()
            .map(|m| {
                let m = m.as_ref();
                self.names
                    .get(m)
                    .copied()
                    .ok_or_else(|| CatalogError::UnknownName(m.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.bundles.insert(name.to_string(), bits);
        Ok(self)
    }

    pub fn build(self) -> PermissionCatalog {
        let is_active = |b: &u32| self.slots.get(b).is_some_and(|s| !s.retired);
        let all = self
            .slots
            .iter()
            .filter(|(_, s)| !s.retired)
            .fold(PermissionSet::EMPTY, |acc, (b, _)| acc | PermissionSet::from_bits(1u128 << b));
        // bits retired after a bundle was declared are dropped from it
        let bundles = self
            .bundles
            .iter()
            .map(|(n, bits)| {
                let set = bits
                    .iter()
                    .filter(|b| is_active(*b))
                    .fold(PermissionSet::EMPTY, |acc, b| acc | PermissionSet::from_bits(1u128 << b));
                (n.clone(), set)
            })
            .collect();
        debug!(
            permissions = self.names.len(),
            reserved = self.slots.len(),
            "built permission catalog"
        );
        PermissionCatalog { names: self.names, slots: self.slots, bundles, all }
    }
}
