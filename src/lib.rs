//! partyperms - role and overwrite based permission resolution
//!
//! Permissions are a 128-bit [`PermissionSet`]. A member's roles fold into a
//! base set ([`RoleAggregator`]), and a room's overwrites refine it for one
//! user ([`OverwriteResolver`]). Everything is a pure function over the
//! snapshots passed in; the [`PermissionCatalog`] is built once and handed to
//! both stages explicitly.
//!
//! ```
//! use partyperms::*;
//!
//! let catalog = PermissionCatalog::standard();
//! let roles = vec![Role::new("R1", "P1", PermissionSet::from_iter([
//!     PermissionBit::ViewRoom,
//!     PermissionBit::SendMessages,
//! ]))];
//! let member = Member::new("U1", ["R1"]);
//! let room = vec![
//!     Overwrite::new("R1").deny(PermissionBit::SendMessages),
//!     Overwrite::new("U1").allow(PermissionBit::AttachFiles),
//! ];
//!
//! let p = effective_permissions(&catalog, &roles, &member, &room);
//! assert!(p.has_bit(PermissionBit::AttachFiles));
//! assert!(!p.has_bit(PermissionBit::SendMessages));
//! ```

pub mod action;
pub mod aggregate;
pub mod bits;
pub mod catalog;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod model;
pub mod overwrite;
pub mod resolver;
#[cfg(feature = "server")]
pub mod server;
pub mod set;

pub use action::Action;
pub use aggregate::RoleAggregator;
pub use bits::PermissionBit;
pub use catalog::{CatalogBuilder, PermissionCatalog, DEFAULT_BUNDLE};
pub use config::{BundleDef, CatalogConfig, PermissionDef};
pub use error::{CatalogError, Error, ParseError, Result};
pub use fingerprint::{fingerprint, Fingerprint};
pub use model::{Member, Role, Snowflake};
pub use overwrite::{classify, partition, sort_role_first, Overwrite, OverwriteSubject, Partition};
pub use resolver::OverwriteResolver;
pub use set::{PermissionSet, BIT_WIDTH};

/// Base and effective sets of one resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub base: PermissionSet,
    pub effective: PermissionSet,
}

/// Aggregate `member`'s roles, then apply the room's overwrites
pub fn resolve(catalog: &PermissionCatalog, party_roles: &[Role], member: &Member, overwrites: &[Overwrite]) -> Resolution {
    let base = RoleAggregator::new(catalog).compute_member_base(party_roles, member);
    let effective = OverwriteResolver::new(catalog).compute(
        base,
        overwrites,
        &member.role_id_set(),
        member.user_id.as_str(),
    );
    Resolution { base, effective }
}

/// Effective permissions of `member` on a room with `overwrites`
#[inline]
pub fn effective_permissions(catalog: &PermissionCatalog, party_roles: &[Role], member: &Member, overwrites: &[Overwrite]) -> PermissionSet {
    resolve(catalog, party_roles, member, overwrites).effective
}

/// Resolve and gate `action` in one step
pub fn check(catalog: &PermissionCatalog, party_roles: &[Role], member: &Member, overwrites: &[Overwrite], action: Action) -> Result<()> {
    action.check(effective_permissions(catalog, party_roles, member, overwrites))
}
