//! Wire types exchanged with the backend.
//!
//! Field names mirror the backend's JSON exactly (notably `hash` for the
//! password hash and the `new_*` update fields). The `groups` / `users`
//! collections on [`User`] and [`Group`] are derived joins: absent unless a
//! hydrating read populated them, and never sent back to the backend.

use serde::{Deserialize, Serialize};

use gateward_core::{GroupId, RuleId, UserId};

/// A user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Backend-assigned identity.
    pub id: UserId,
    /// Login name.
    pub login: String,
    /// Password hash (the backend stores and compares hashes, never cleartext).
    pub hash: String,
    /// Groups this user belongs to; populated only by hydrating reads.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub groups: Option<Vec<Group>>,
}

/// Payload for creating a user.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    /// Login name.
    pub login: String,
    /// Password hash.
    pub hash: String,
}

/// Payload for updating a user; omitted fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    /// Replacement login name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_login: Option<String>,
    /// Replacement password hash.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_hash: Option<String>,
}

/// A group of users, referenced by access rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Backend-assigned identity.
    pub id: GroupId,
    /// Group name.
    pub name: String,
    /// Members of this group; populated only by hydrating reads.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub users: Option<Vec<User>>,
}

/// Payload for creating a group.
#[derive(Debug, Clone, Serialize)]
pub struct NewGroup {
    /// Group name.
    pub name: String,
}

/// Payload for updating a group; omitted fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupUpdate {
    /// Replacement group name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_name: Option<String>,
}

/// Membership attach/detach payload (`POST api/groups/{id}/users`).
#[derive(Debug, Clone, Copy, Serialize)]
pub(crate) struct MembershipPayload {
    pub user_id: UserId,
}

/// An allow/deny rule matching a whole domain, granted to a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRule {
    /// Backend-assigned identity.
    pub id: RuleId,
    /// The domain this rule matches.
    pub domain: String,
    /// The group the rule applies to (non-owning reference).
    pub group_id: GroupId,
}

/// Payload for creating a domain rule.
#[derive(Debug, Clone, Serialize)]
pub struct NewDomainRule {
    /// The domain to match.
    pub domain: String,
    /// The group the rule applies to.
    pub group_id: GroupId,
}

/// An allow/deny rule matching an exact URL, granted to a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRule {
    /// Backend-assigned identity.
    pub id: RuleId,
    /// The URL this rule matches.
    pub url: String,
    /// The group the rule applies to (non-owning reference).
    pub group_id: GroupId,
}

/// Payload for creating a URL rule.
#[derive(Debug, Clone, Serialize)]
pub struct NewUrlRule {
    /// The URL to match.
    pub url: String,
    /// The group the rule applies to.
    pub group_id: GroupId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_hydration_field_is_optional() {
        // Plain backend responses carry no `groups` key
        let user: User =
            serde_json::from_str(r#"{"id":1,"login":"alice","hash":"h"}"#).unwrap();
        assert_eq!(user.id, UserId::new(1));
        assert_eq!(user.groups, None);

        // And an unhydrated user serializes without one
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("groups"));
    }

    #[test]
    fn update_payloads_skip_omitted_fields() {
        let update = UserUpdate {
            new_login: Some("bob".to_string()),
            new_hash: None,
        };
        let json = serde_json::to_string(&update).unwrap();
        assert!(json.contains("new_login"));
        assert!(!json.contains("new_hash"));

        let empty = serde_json::to_string(&GroupUpdate::default()).unwrap();
        assert_eq!(empty, "{}");
    }

    #[test]
    fn membership_payload_shape() {
        let payload = MembershipPayload {
            user_id: UserId::new(9),
        };
        assert_eq!(serde_json::to_string(&payload).unwrap(), r#"{"user_id":9}"#);
    }

    #[test]
    fn rule_deserialization() {
        let rule: DomainRule =
            serde_json::from_str(r#"{"id":3,"domain":"example.com","group_id":5}"#).unwrap();
        assert_eq!(rule.id, RuleId::new(3));
        assert_eq!(rule.group_id, GroupId::new(5));
    }
}
