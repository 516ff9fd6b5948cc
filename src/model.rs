//! Snapshot records supplied by the data layer

use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::set::PermissionSet;

/// Opaque platform identifier for users, roles, parties and rooms
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snowflake(String);

impl Snowflake {
    pub fn new(id: impl Into<String>) -> Self {
        Snowflake(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Snowflake {
    fn from(s: &str) -> Self {
        Snowflake(s.to_string())
    }
}

impl From<String> for Snowflake {
    fn from(s: String) -> Self {
        Snowflake(s)
    }
}

impl From<u64> for Snowflake {
    fn from(id: u64) -> Self {
        Snowflake(id.to_string())
    }
}

impl Borrow<str> for Snowflake {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A role definition within one party
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: Snowflake,
    pub party_id: Snowflake,
    #[serde(default)]
    pub name: String,
    pub permissions: PermissionSet,
    #[serde(default)]
    pub position: i16,
}

impl Role {
    pub fn new(id: impl Into<Snowflake>, party_id: impl Into<Snowflake>, permissions: PermissionSet) -> Self {
        Role { id: id.into(), party_id: party_id.into(), name: String::new(), permissions, position: 0 }
    }
}

/// A user's membership in one party
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub user_id: Snowflake,
    #[serde(default, alias = "roles")]
    pub role_ids: Vec<Snowflake>,
}

impl Member {
    pub fn new<I, R>(user_id: impl Into<Snowflake>, role_ids: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Snowflake>,
    {
        Member { user_id: user_id.into(), role_ids: role_ids.into_iter().map(Into::into).collect() }
    }

    pub fn role_id_set(&self) -> HashSet<Snowflake> {
        self.role_ids.iter().cloned().collect()
    }

    pub fn holds(&self, role_id: &str) -> bool {
        self.role_ids.iter().any(|r| r.as_str() == role_id)
    }

    /// The subset of `party_roles` this member holds
    pub fn roles_in<'a>(&'a self, party_roles: &'a [Role]) -> impl Iterator<Item = &'a Role> + 'a {
        party_roles.iter().filter(move |r| self.holds(r.id.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::PermissionBit::*;

    #[test]
    fn member_accepts_platform_roles_field() {
        let m: Member = serde_json::from_str(r#"{ "user_id": "U1", "roles": ["R1", "R2"] }"#).unwrap();
        assert_eq!(m, Member::new("U1", ["R1", "R2"]));
        let m: Member = serde_json::from_str(r#"{ "user_id": "U1" }"#).unwrap();
        assert!(m.role_ids.is_empty());
    }

    #[test]
    fn role_permissions_accept_string_or_number() {
        let r: Role = serde_json::from_str(r#"{ "id": "R1", "party_id": "P1", "permissions": "1073741824" }"#).unwrap();
        assert_eq!(r.permissions, PermissionSet::from_bit(ViewRoom));
        let r: Role = serde_json::from_str(r#"{ "id": "R1", "party_id": "P1", "permissions": 1073741824 }"#).unwrap();
        assert_eq!(r.permissions, PermissionSet::from_bit(ViewRoom));
    }

    #[test]
    fn roles_in_filters_by_membership() {
        let roles = vec![
            Role::new("R1", "P1", PermissionSet::from_bit(ViewRoom)),
            Role::new("R2", "P1", PermissionSet::from_bit(KickMembers)),
        ];
        let m = Member::new("U1", ["R2"]);
        let held: Vec<_> = m.roles_in(&roles).map(|r| r.id.as_str()).collect();
        assert_eq!(held, vec!["R2"]);
    }
}
