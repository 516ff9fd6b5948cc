//! Room-scoped permission overwrites
//!
//! An overwrite's subject is either one of the member's roles or the acting
//! user. Nothing on the record says which; [`partition`] decides by testing
//! the id against the member's role set, in list order.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::Snowflake;
use crate::set::PermissionSet;

fn is_empty(p: &PermissionSet) -> bool {
    p.is_empty()
}

/// Allow/deny adjustment for one role or user on one resource
///
/// A missing `allow` or `deny` is the empty set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overwrite {
    pub id: Snowflake,
    #[serde(default, skip_serializing_if = "is_empty")]
    pub allow: PermissionSet,
    #[serde(default, skip_serializing_if = "is_empty")]
    pub deny: PermissionSet,
}

impl Overwrite {
    pub fn new(id: impl Into<Snowflake>) -> Self {
        Overwrite { id: id.into(), allow: PermissionSet::EMPTY, deny: PermissionSet::EMPTY }
    }

    pub fn allow(mut self, p: impl Into<PermissionSet>) -> Self {
        self.allow = p.into();
        self
    }

    pub fn deny(mut self, p: impl Into<PermissionSet>) -> Self {
        self.deny = p.into();
        self
    }

    /// `base` with this entry's deny cleared, then its allow added
    #[inline]
    pub fn apply(&self, base: PermissionSet) -> PermissionSet {
        base.subtract([self.deny]).union([self.allow])
    }
}

/// Which kind of subject an overwrite entry turned out to target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverwriteSubject {
    Role,
    User,
}

/// Overwrites split into the member's role entries and the single user entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition<'a> {
    pub roles: Vec<&'a Overwrite>,
    pub user: Option<&'a Overwrite>,
}

impl<'a> Partition<'a> {
    pub fn entries(&self) -> impl Iterator<Item = (OverwriteSubject, &'a Overwrite)> + '_ {
        self.roles
            .iter()
            .map(|o| (OverwriteSubject::Role, *o))
            .chain(self.user.map(|o| (OverwriteSubject::User, o)))
    }
}

/// Subject kind of one entry, or `None` when it concerns neither the member's roles nor the user
pub fn classify(ow: &Overwrite, member_role_ids: &HashSet<Snowflake>, user_id: &str) -> Option<OverwriteSubject> {
    if member_role_ids.contains(ow.id.as_str()) {
        Some(OverwriteSubject::Role)
    } else if ow.id.as_str() == user_id {
        Some(OverwriteSubject::User)
    } else {
        None
    }
}

/// Split `overwrites` in one pass, stopping at the first user entry
///
/// Lists are expected role-first. Anything after the user entry is never
/// looked at, role entries included.
pub fn partition<'a>(overwrites: &'a [Overwrite], member_role_ids: &HashSet<Snowflake>, user_id: &str) -> Partition<'a> {
    let mut out = Partition::default();
    for ow in overwrites {
        match classify(ow, member_role_ids, user_id) {
            Some(OverwriteSubject::Role) => out.roles.push(ow),
            Some(OverwriteSubject::User) => {
                out.user = Some(ow);
                break;
            }
            None => {}
        }
    }
    out
}

/// Reorder a room's list so role subjects precede user subjects
///
/// Producer-side helper; `party_role_ids` is every role id of the party.
/// Relative order within each group is kept.
pub fn sort_role_first(overwrites: &mut [Overwrite], party_role_ids: &HashSet<Snowflake>) {
    overwrites.sort_by_key(|o| !party_role_ids.contains(o.id.as_str()));
}
