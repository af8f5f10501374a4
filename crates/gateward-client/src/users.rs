//! Users resource store.
//!
//! CRUD over `api/users`, plus the two behaviors that go beyond plain
//! proxying: concurrent hydration of each user's groups, and reconciliation
//! of a user's group membership against a desired set. All errors come from
//! the request choke point unchanged.

use futures::future::try_join_all;

use gateward_core::{GroupId, UserId};

use crate::client::Client;
use crate::error::Result;
use crate::models::{Group, MembershipPayload, NewUser, User, UserUpdate};

/// Operations over the Users resource.
#[derive(Debug, Clone, Copy)]
pub struct Users<'a> {
    client: &'a Client,
}

impl<'a> Users<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Create a user.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::ClientError`] from the request path; notably
    /// `Validation` when the login is already taken.
    pub async fn create(&self, user: &NewUser) -> Result<User> {
        self.client.post("api/users", user).await
    }

    /// List all users (without group hydration).
    ///
    /// # Errors
    ///
    /// Propagates [`crate::ClientError`] from the request path.
    pub async fn list(&self) -> Result<Vec<User>> {
        self.client.get("api/users").await
    }

    /// Fetch one user by id.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::ClientError`]; `NotFound` if no such user exists.
    pub async fn get(&self, id: UserId) -> Result<User> {
        self.client.get(&format!("api/users/{id}")).await
    }

    /// Update a user's fields, optionally reconciling group membership.
    ///
    /// The field update and the membership reconciliation are independent
    /// steps with no transactional guarantee: a failure in one does not roll
    /// back the other.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::ClientError`] from whichever step fails first.
    pub async fn update(
        &self,
        id: UserId,
        update: &UserUpdate,
        desired_groups: Option<&[GroupId]>,
    ) -> Result<User> {
        let user = self
            .client
            .patch(&format!("api/users/{id}"), update)
            .await?;
        if let Some(desired) = desired_groups {
            self.set_groups(id, desired).await?;
        }
        Ok(user)
    }

    /// Delete a user.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::ClientError`]; deleting an already-deleted id
    /// yields `NotFound`.
    pub async fn delete(&self, id: UserId) -> Result<()> {
        self.client.delete_unit(&format!("api/users/{id}")).await
    }

    /// Fetch the groups a user belongs to.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::ClientError`] from the request path.
    pub async fn groups_of(&self, id: UserId) -> Result<Vec<Group>> {
        self.client.get(&format!("api/users/{id}/groups")).await
    }

    /// Fetch one user with their groups populated.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::ClientError`] from either request.
    pub async fn get_hydrated(&self, id: UserId) -> Result<User> {
        let mut user = self.get(id).await?;
        user.groups = Some(self.groups_of(id).await?);
        Ok(user)
    }

    /// List all users with their groups populated.
    ///
    /// One membership request per user, all in flight concurrently; if any
    /// sub-request fails the whole listing fails with that error.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::ClientError`] from any of the requests.
    pub async fn list_hydrated(&self) -> Result<Vec<User>> {
        let users = self.list().await?;
        try_join_all(users.into_iter().map(|mut user| async move {
            user.groups = Some(self.groups_of(user.id).await?);
            Ok::<_, crate::ClientError>(user)
        }))
        .await
    }

    /// Reconcile a user's group membership to exactly `desired`.
    ///
    /// Fetches the current groups, computes the set difference by id, and
    /// issues one attach per newly-desired group and one detach per
    /// now-excluded group, all concurrently. Groups present in both sets
    /// generate no calls.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::ClientError`]; on partial failure some membership
    /// changes may already have been applied (no rollback).
    pub async fn set_groups(&self, id: UserId, desired: &[GroupId]) -> Result<()> {
        let current: Vec<GroupId> = self
            .groups_of(id)
            .await?
            .into_iter()
            .map(|g| g.id)
            .collect();

        let payload = MembershipPayload { user_id: id };
        let attach = desired
            .iter()
            .copied()
            .filter(|group_id| !current.contains(group_id))
            .map(|group_id| {
                let path = format!("api/groups/{group_id}/users");
                async move { self.client.post_unit(&path, &payload).await }
            });
        let detach = current
            .iter()
            .copied()
            .filter(|group_id| !desired.contains(group_id))
            .map(|group_id| {
                let path = format!("api/groups/{group_id}/users/{id}");
                async move { self.client.delete_unit(&path).await }
            });

        futures::future::try_join(try_join_all(attach), try_join_all(detach)).await?;
        Ok(())
    }
}
