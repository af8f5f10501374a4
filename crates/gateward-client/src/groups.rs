//! Groups resource store.
//!
//! CRUD over `api/groups`, membership attach/detach, concurrent hydration of
//! each group's members, and reconciliation of a group's membership against a
//! desired set.

use futures::future::{try_join, try_join_all};

use gateward_core::{GroupId, UserId};

use crate::client::Client;
use crate::error::Result;
use crate::models::{Group, GroupUpdate, MembershipPayload, NewGroup, User};

/// Operations over the Groups resource.
#[derive(Debug, Clone, Copy)]
pub struct Groups<'a> {
    client: &'a Client,
}

impl<'a> Groups<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Create a group.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::ClientError`] from the request path.
    pub async fn create(&self, group: &NewGroup) -> Result<Group> {
        self.client.post("api/groups", group).await
    }

    /// List all groups (without member hydration).
    ///
    /// # Errors
    ///
    /// Propagates [`crate::ClientError`] from the request path.
    pub async fn list(&self) -> Result<Vec<Group>> {
        self.client.get("api/groups").await
    }

    /// Fetch one group by id.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::ClientError`]; `NotFound` if no such group exists.
    pub async fn get(&self, id: GroupId) -> Result<Group> {
        self.client.get(&format!("api/groups/{id}")).await
    }

    /// Update a group's fields, optionally reconciling its membership.
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
        id: GroupId,
        update: &GroupUpdate,
        desired_members: Option<&[UserId]>,
    ) -> Result<Group> {
        let group = self
            .client
            .patch(&format!("api/groups/{id}"), update)
            .await?;
        if let Some(desired) = desired_members {
            self.set_members(id, desired).await?;
        }
        Ok(group)
    }

    /// Delete a group.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::ClientError`]; deleting an already-deleted id
    /// yields `NotFound`.
    pub async fn delete(&self, id: GroupId) -> Result<()> {
        self.client.delete_unit(&format!("api/groups/{id}")).await
    }

    /// Fetch the members of a group, verbatim as the backend returns them.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::ClientError`] from the request path.
    pub async fn members_of(&self, id: GroupId) -> Result<Vec<User>> {
        self.client.get(&format!("api/groups/{id}/users")).await
    }

    /// Attach a user to a group.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::ClientError`] from the request path.
    pub async fn add_member(&self, id: GroupId, user_id: UserId) -> Result<()> {
        self.client
            .post_unit(&format!("api/groups/{id}/users"), &MembershipPayload { user_id })
            .await
    }

    /// Detach a user from a group.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::ClientError`] from the request path.
    pub async fn remove_member(&self, id: GroupId, user_id: UserId) -> Result<()> {
        self.client
            .delete_unit(&format!("api/groups/{id}/users/{user_id}"))
            .await
    }

    /// Fetch one group with its members populated.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::ClientError`] from either request.
    pub async fn get_hydrated(&self, id: GroupId) -> Result<Group> {
        let mut group = self.get(id).await?;
        group.users = Some(self.members_of(id).await?);
        Ok(group)
    }

    /// List all groups with their members populated.
    ///
    /// One membership request per group, all in flight concurrently; if any
    /// sub-request fails the whole listing fails with that error.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::ClientError`] from any of the requests.
    pub async fn list_hydrated(&self) -> Result<Vec<Group>> {
        let groups = self.list().await?;
        try_join_all(groups.into_iter().map(|mut group| async move {
            group.users = Some(self.members_of(group.id).await?);
            Ok::<_, crate::ClientError>(group)
        }))
        .await
    }

    /// Reconcile a group's membership to exactly `desired`.
    ///
    /// Fetches the current members, computes the set difference by id, and
    /// issues one attach per newly-desired user and one detach per
    /// now-excluded user, all concurrently. Users present in both sets
    /// generate no calls.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::ClientError`]; on partial failure some membership
    /// changes may already have been applied (no rollback).
    pub async fn set_members(&self, id: GroupId, desired: &[UserId]) -> Result<()> {
        let current: Vec<UserId> = self
            .members_of(id)
            .await?
            .into_iter()
            .map(|u| u.id)
            .collect();

        let attach = desired
            .iter()
            .copied()
            .filter(|user_id| !current.contains(user_id))
            .map(|user_id| self.add_member(id, user_id));
        let detach = current
            .iter()
            .copied()
            .filter(|user_id| !desired.contains(user_id))
            .map(|user_id| self.remove_member(id, user_id));

        try_join(try_join_all(attach), try_join_all(detach)).await?;
        Ok(())
    }
}
