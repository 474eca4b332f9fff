//! Per-tender follower diffs owned by a follower-management view.
//!
//! The store is an ordinary value: whoever renders the view owns it, hands
//! `&mut` references to event handlers and drops it (or calls
//! [`FollowerStore::discard`]) on teardown. Mutating operations create the
//! tender's entry on first use; read-side operations on a tender that was
//! never touched return [`FollowerError::UnknownTender`].

use std::collections::HashMap;

use crate::error::FollowerError;
use crate::followers::FollowerDiff;
use crate::types::{FollowerPayload, TenderId, UserId, UserRecord};

#[derive(Debug, Clone, Default)]
pub struct FollowerStore {
    diffs: HashMap<TenderId, FollowerDiff>,
}

impl FollowerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty diff for `tender` unless one already exists.
    pub fn initialize(&mut self, tender: TenderId) -> &mut FollowerDiff {
        self.diffs.entry(tender).or_insert_with(|| {
            tracing::debug!(%tender, "follower state initialized");
            FollowerDiff::new()
        })
    }

    pub fn mark_present(&mut self, tender: TenderId, user: UserId) {
        self.initialize(tender).mark_present(user);
    }

    /// Initialize `tender` and mark every record flagged `is_follower`.
    ///
    /// Returns the number of users marked.
    pub fn seed(&mut self, tender: TenderId, users: &[UserRecord]) -> usize {
        let diff = self.initialize(tender);
        let mut marked = 0;
        for user in users.iter().filter(|u| u.is_follower) {
            diff.mark_present(user.id);
            marked += 1;
        }
        tracing::debug!(%tender, listed = users.len(), followers = marked, "seeded followers");
        marked
    }

    /// Apply a checkbox change; returns whether the tender has pending
    /// changes (i.e. whether saving should be enabled).
    pub fn toggle(&mut self, tender: TenderId, user: UserId, checked: bool) -> bool {
        let pending = self.initialize(tender).toggle(user, checked);
        tracing::debug!(%tender, %user, checked, pending, "follower toggled");
        pending
    }

    pub fn get(&self, tender: TenderId) -> Option<&FollowerDiff> {
        self.diffs.get(&tender)
    }

    pub fn has_pending_changes(&self, tender: TenderId) -> bool {
        self.get(tender)
            .is_some_and(FollowerDiff::has_pending_changes)
    }

    pub fn payload(&self, tender: TenderId) -> Result<FollowerPayload, FollowerError> {
        Ok(self.require(tender)?.payload())
    }

    /// JSON body for the save request:
    /// `{"old_followers":[..],"new_followers":[..],"unfollowers":[..]}`.
    pub fn serialize(&self, tender: TenderId) -> Result<String, FollowerError> {
        Ok(serde_json::to_string(&self.payload(tender)?)?)
    }

    /// Fold the pending diff into the baseline after a confirmed save.
    ///
    /// Returns the total follower count for the tender.
    pub fn commit(&mut self, tender: TenderId) -> Result<usize, FollowerError> {
        let diff = self
            .diffs
            .get_mut(&tender)
            .ok_or(FollowerError::UnknownTender { tender })?;
        let total = diff.commit();
        tracing::debug!(%tender, total, "follower diff committed");
        Ok(total)
    }

    /// Drop all state for `tender`, returning it if present.
    pub fn discard(&mut self, tender: TenderId) -> Option<FollowerDiff> {
        self.diffs.remove(&tender)
    }

    pub fn len(&self) -> usize {
        self.diffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diffs.is_empty()
    }

    fn require(&self, tender: TenderId) -> Result<&FollowerDiff, FollowerError> {
        self.get(tender)
            .ok_or(FollowerError::UnknownTender { tender })
    }
}
