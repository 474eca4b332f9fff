//! Pending follower changes for a single tender.
//!
//! A [`FollowerDiff`] keeps the server-confirmed baseline (`old_followers`)
//! apart from the edits made since the last save:
//!
//! ```text
//! old_followers   confirmed by the server at last sync
//! new_followers   checked this session, absent from old_followers
//! unfollowers     unchecked this session, present in old_followers
//! ```
//!
//! `new_followers` is always disjoint from `old_followers` and
//! `unfollowers` is always a subset of it.

use std::collections::BTreeSet;

use crate::types::{FollowerPayload, UserId};

/// Ordered set of user ids.
pub type IdSet = BTreeSet<UserId>;

/// Baseline plus pending additions and removals for one tender.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FollowerDiff {
    old_followers: IdSet,
    new_followers: IdSet,
    unfollowers: IdSet,
}

impl FollowerDiff {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that the server reports `user` as already following.
    ///
    /// A pending addition for the same user is dropped, since it is now
    /// part of the baseline.
    pub fn mark_present(&mut self, user: UserId) {
        self.new_followers.remove(&user);
        self.old_followers.insert(user);
    }

    /// Apply a checkbox change and report whether anything is pending.
    pub fn toggle(&mut self, user: UserId, checked: bool) -> bool {
        let known = self.old_followers.contains(&user);
        match (checked, known) {
            (true, false) => {
                self.new_followers.insert(user);
            }
            (true, true) => {
                self.unfollowers.remove(&user);
            }
            (false, true) => {
                self.unfollowers.insert(user);
            }
            (false, false) => {
                self.new_followers.remove(&user);
            }
        }
        self.has_pending_changes()
    }

    pub fn has_pending_changes(&self) -> bool {
        self.pending_count() > 0
    }

    /// Size of `new_followers ∪ unfollowers`.
    pub fn pending_count(&self) -> usize {
        self.new_followers.len() + self.unfollowers.len()
    }

    pub fn old_followers(&self) -> &IdSet {
        &self.old_followers
    }

    pub fn new_followers(&self) -> &IdSet {
        &self.new_followers
    }

    pub fn unfollowers(&self) -> &IdSet {
        &self.unfollowers
    }

    /// The follower set the server will hold once the pending diff lands:
    /// `(old ∪ new) \ unfollowers`.
    pub fn effective_followers(&self) -> IdSet {
        self.old_followers
            .union(&self.new_followers)
            .filter(|user| !self.unfollowers.contains(user))
            .copied()
            .collect()
    }

    /// Membership in [`effective_followers`](Self::effective_followers).
    pub fn is_following(&self, user: UserId) -> bool {
        if self.unfollowers.contains(&user) {
            return false;
        }
        self.old_followers.contains(&user) || self.new_followers.contains(&user)
    }

    /// Snapshot of the three sets in wire form. Does not modify the diff.
    pub fn payload(&self) -> FollowerPayload {
        FollowerPayload {
            old_followers: self.old_followers.iter().copied().collect(),
            new_followers: self.new_followers.iter().copied().collect(),
            unfollowers: self.unfollowers.iter().copied().collect(),
        }
    }

    /// Fold the pending diff into the baseline and clear it.
    ///
    /// Call only after the server has accepted the payload. Returns the
    /// follower count after the fold.
    pub fn commit(&mut self) -> usize {
        self.old_followers.append(&mut self.new_followers);
        for user in std::mem::take(&mut self.unfollowers) {
            self.old_followers.remove(&user);
        }
        self.old_followers.len()
    }
}
