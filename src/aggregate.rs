//! Role aggregation: a member's roles folded into one base set

use tracing::{debug, trace};

use crate::catalog::PermissionCatalog;
use crate::model::{Member, Role};
use crate::set::PermissionSet;

/// Folds role permission sets, applying the administrator bypass
#[derive(Debug, Clone, Copy)]
pub struct RoleAggregator<'c> {
    catalog: &'c PermissionCatalog,
}

impl<'c> RoleAggregator<'c> {
    pub fn new(catalog: &'c PermissionCatalog) -> Self {
        RoleAggregator { catalog }
    }

    /// OR of every role's set; `ALL` if that includes ADMINISTRATOR.
    /// Input order never matters.
    pub fn compute_base<'r, I>(&self, roles: I) -> PermissionSet
    where
        I: IntoIterator<Item = &'r Role>,
    {
        let base = roles.into_iter().fold(PermissionSet::EMPTY, |acc, role| {
            trace!(role = %role.id, permissions = %role.permissions, "folding role");
            acc | role.permissions
        });
        if base.is_admin() {
            debug!("administrator role held, granting all permissions");
            return self.catalog.all();
        }
        base
    }

    /// Base set from the party roles `member` holds
    pub fn compute_member_base(&self, party_roles: &[Role], member: &Member) -> PermissionSet {
        self.compute_base(member.roles_in(party_roles))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::PermissionBit::*;

    #[test]
    fn empty_roles_give_empty_base() {
        let c = PermissionCatalog::standard();
        assert_eq!(RoleAggregator::new(&c).compute_base(std::iter::empty()), PermissionSet::EMPTY);
    }

    #[test]
    fn admin_expands_to_all() {
        let c = PermissionCatalog::standard();
        let roles = [
            Role::new("R1", "P1", PermissionSet::from_bit(Administrator)),
            Role::new("R2", "P1", PermissionSet::from_bit(ViewRoom)),
        ];
        assert_eq!(RoleAggregator::new(&c).compute_base(&roles), c.all());
    }

    #[test]
    fn member_base_ignores_unheld_roles() {
        let c = PermissionCatalog::standard();
        let roles = [
            Role::new("R1", "P1", PermissionSet::from_bit(ViewRoom)),
            Role::new("R2", "P1", PermissionSet::from_bit(Administrator)),
        ];
        let m = Member::new("U1", ["R1"]);
        assert_eq!(
            RoleAggregator::new(&c).compute_member_base(&roles, &m),
            PermissionSet::from_bit(ViewRoom)
        );
    }
}
