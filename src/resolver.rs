//! Overwrite resolution for one resource and one acting user
//!
//! Order of application:
//! 1. role-level deny, then role-level allow (an allow on one role can
//!    restore a bit another role's entry denied)
//! 2. the user's own entry, deny then allow, which therefore wins over
//!    every role entry for the bits it touches
//!
//! Administrators skip all of it and get `ALL`.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::catalog::PermissionCatalog;
use crate::model::Snowflake;
use crate::overwrite::{partition, Overwrite, OverwriteSubject};
use crate::set::PermissionSet;

#[derive(Debug, Clone, Copy)]
pub struct OverwriteResolver<'c> {
    catalog: &'c PermissionCatalog,
}

impl<'c> OverwriteResolver<'c> {
    pub fn new(catalog: &'c PermissionCatalog) -> Self {
        OverwriteResolver { catalog }
    }

    /// Effective permissions of `user_id` on a resource with `overwrites`
    ///
    /// `overwrites` must list role subjects before user subjects; scanning
    /// stops at the first entry for `user_id`.
    pub fn compute(
        &self,
        base: PermissionSet,
        overwrites: &[Overwrite],
        member_role_ids: &HashSet<Snowflake>,
        user_id: &str,
    ) -> PermissionSet {
        if base.is_admin() {
            debug!(user = user_id, "administrator bypasses overwrites");
            return self.catalog.all();
        }

        let parts = partition(overwrites, member_role_ids, user_id);

        // role entries come first; the user entry, if any, is last
        let mut role_allow = PermissionSet::EMPTY;
        let mut role_deny = PermissionSet::EMPTY;
        let mut user = None;
        for (subject, ow) in parts.entries() {
            match subject {
                OverwriteSubject::Role => {
                    trace!(role = %ow.id, allow = %ow.allow, deny = %ow.deny, "role overwrite");
                    role_allow |= ow.allow;
                    role_deny |= ow.deny;
                }
                OverwriteSubject::User => user = Some(ow),
            }
        }

        let result = base.subtract([role_deny]).union([role_allow]);

        match user {
            Some(ow) => {
                debug!(user = user_id, allow = %ow.allow, deny = %ow.deny, "user overwrite");
                ow.apply(result)
            }
            None => result,
        }
    }
}
