//! Deterministic digest of resolver inputs, for external memoization

use std::fmt;

use byteorder::{BigEndian, ByteOrder};
use sha2::{Digest, Sha256};

use crate::catalog::PermissionCatalog;
use crate::model::{Member, Role};
use crate::overwrite::Overwrite;
use crate::set::PermissionSet;

const DOMAIN: &[u8] = b"partyperms/v1";

/// SHA-256 over the canonical encoding of one resolution's inputs
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(pub [u8; 32]);

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|b| write!(f, "{:02x}", b))
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self)
    }
}

fn put_str(h: &mut Sha256, s: &str) {
    let mut len = [0u8; 4];
    BigEndian::write_u32(&mut len, s.len() as u32);
    h.update(len);
    h.update(s.as_bytes());
}

fn put_set(h: &mut Sha256, p: PermissionSet) {
    h.update(p.to_be_bytes());
}

/// Digest of everything that can change the resolved set
///
/// Only roles the member holds are hashed, sorted by `(id, permissions)`
/// because aggregation is order independent. Every copy of a repeated role id
/// is kept since each one is folded in. Overwrite order is kept: it decides
/// where the scan stops. The catalog's `ALL` is included because an
/// administrator resolves to it.
pub fn fingerprint(
    catalog: &PermissionCatalog,
    party_roles: &[Role],
    member: &Member,
    overwrites: &[Overwrite],
) -> Fingerprint {
    let mut h = Sha256::new();
    h.update(DOMAIN);
    put_set(&mut h, catalog.all());

    let mut held: Vec<&Role> = member.roles_in(party_roles).collect();
    held.sort_by(|a, b| (&a.id, a.permissions).cmp(&(&b.id, b.permissions)));
    h.update((held.len() as u32).to_be_bytes());
    for role in held {
        put_str(&mut h, role.id.as_str());
        put_set(&mut h, role.permissions);
    }

    put_str(&mut h, member.user_id.as_str());
    let mut role_ids: Vec<&str> = member.role_ids.iter().map(|r| r.as_str()).collect();
    role_ids.sort_unstable();
    role_ids.dedup();
    h.update((role_ids.len() as u32).to_be_bytes());
    for id in role_ids {
        put_str(&mut h, id);
    }

    h.update((overwrites.len() as u32).to_be_bytes());
    for ow in overwrites {
        put_str(&mut h, ow.id.as_str());
        put_set(&mut h, ow.allow);
        put_set(&mut h, ow.deny);
    }

    Fingerprint(h.finalize().into())
}
