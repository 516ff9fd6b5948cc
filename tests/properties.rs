//! Algebraic properties of permission sets and resolution

use std::collections::HashSet;

use proptest::prelude::*;

use partyperms::{
    Member, Overwrite, OverwriteResolver, PermissionBit, PermissionCatalog, PermissionSet, Role, RoleAggregator,
    Snowflake,
};

fn any_set() -> impl Strategy<Value = PermissionSet> {
    any::<u128>().prop_map(PermissionSet::from_bits)
}

fn any_roles() -> impl Strategy<Value = Vec<Role>> {
    prop::collection::vec(any_set(), 0..6).prop_map(|sets| {
        sets.into_iter()
            .enumerate()
            .map(|(i, p)| Role::new(format!("R{i}"), "P1", p))
            .collect()
    })
}

proptest! {
    #[test]
    fn compute_base_commutes(roles in any_roles()) {
        let c = PermissionCatalog::standard();
        let agg = RoleAggregator::new(&c);
        let mut rev = roles.clone();
        rev.reverse();
        prop_assert_eq!(agg.compute_base(&roles), agg.compute_base(&rev));
    }

    #[test]
    fn union_and_subtract_idempotence(p in any_set()) {
        prop_assert_eq!(p.union([p]), p);
        prop_assert_eq!(p.subtract([p]), PermissionSet::empty());
    }

    #[test]
    fn decimal_round_trip(p in any_set()) {
        prop_assert_eq!(PermissionSet::parse(&p.to_string()).unwrap(), p);
        let json = serde_json::to_string(&p).unwrap();
        prop_assert_eq!(serde_json::from_str::<PermissionSet>(&json).unwrap(), p);
    }

    #[test]
    fn has_is_superset_test(a in any_set(), b in any_set()) {
        prop_assert!(a.union([b]).has(a));
        prop_assert!(a.union([b]).has(b));
        prop_assert_eq!(a.has(b), a.intersection(b) == b);
    }

    #[test]
    fn subtract_never_touches_other_bits(a in any_set(), b in any_set()) {
        let d = a.subtract([b]);
        prop_assert!(a.has(d));
        prop_assert!(d.intersection(b).is_empty());
        prop_assert_eq!(d.union([a.intersection(b)]), a);
    }

    #[test]
    fn admin_always_resolves_to_all(base in any_set(), deny in any_set()) {
        let c = PermissionCatalog::standard();
        let base = base | PermissionBit::Administrator;
        let room = vec![Overwrite::new("R1").deny(deny), Overwrite::new("U1").deny(deny)];
        let roles: HashSet<Snowflake> = ["R1"].into_iter().map(Snowflake::from).collect();
        prop_assert_eq!(OverwriteResolver::new(&c).compute(base, &room, &roles, "U1"), c.all());
    }

    #[test]
    fn empty_overwrites_are_identity(base in any_set(), roles in any_roles()) {
        let c = PermissionCatalog::standard();
        let member = Member::new("U1", roles.iter().map(|r| r.id.clone()));
        let base = base - PermissionBit::Administrator;
        prop_assert_eq!(OverwriteResolver::new(&c).compute(base, &[], &member.role_id_set(), "U1"), base);
    }
}

#[test]
fn round_trip_top_bit() {
    let p = PermissionSet::from_index(127).unwrap();
    assert_eq!(p.to_string(), "170141183460469231731687303715884105728");
    assert_eq!(PermissionSet::parse(&p.to_string()).unwrap(), p);
    assert_eq!(p, PermissionSet::from_bit(PermissionBit::Test));
}
