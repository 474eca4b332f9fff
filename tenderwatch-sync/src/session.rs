//! Follower-management session: a [`FollowerStore`] bound to a backend.
//!
//! A session plays the part of the follower dialog: [`open`] renders the
//! user list and seeds the baseline, [`toggle`] records checkbox changes and
//! [`save`] submits the diff, committing it only once the server accepts.
//! A failed save returns the error and leaves the diff pending, so the
//! caller decides whether to retry, roll back with [`close`], or report.
//!
//! [`open`]: FollowerSession::open
//! [`toggle`]: FollowerSession::toggle
//! [`save`]: FollowerSession::save
//! [`close`]: FollowerSession::close

use tenderwatch_core::{FollowerError, FollowerStore, TagName, TenderId, UserId, UserRecord};

use crate::backend::TenderBackend;
use crate::SyncError;

/// Result of [`FollowerSession::save`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOutcome {
    /// `false` when there was nothing to send.
    pub submitted: bool,
    /// Confirmed follower count after the save.
    pub total_followers: usize,
    /// Whether the acting user is among the confirmed followers.
    pub followed_by_me: bool,
}

pub struct FollowerSession<B> {
    backend: B,
    store: FollowerStore,
    acting_user: Option<UserId>,
}

impl<B: TenderBackend> FollowerSession<B> {
    pub fn new(backend: B, acting_user: Option<UserId>) -> Self {
        Self {
            backend,
            store: FollowerStore::new(),
            acting_user,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn store(&self) -> &FollowerStore {
        &self.store
    }

    /// Fetch the user listing for `tender` and reset its state from it.
    ///
    /// Any pending diff from an earlier open is dropped: the listing is
    /// rendered from server state, so the diff must start from it too.
    pub async fn open(&mut self, tender: TenderId) -> Result<Vec<UserRecord>, SyncError> {
        let users = self.backend.fetch_users(tender).await?;
        self.store.discard(tender);
        self.store.seed(tender, &users);
        Ok(users)
    }

    /// Record a checkbox change; returns whether saving should be enabled.
    pub fn toggle(&mut self, tender: TenderId, user: UserId, checked: bool) -> bool {
        self.store.toggle(tender, user, checked)
    }

    pub fn has_pending_changes(&self, tender: TenderId) -> bool {
        self.store.has_pending_changes(tender)
    }

    /// Submit the pending diff for `tender` and commit it on success.
    pub async fn save(&mut self, tender: TenderId) -> Result<SaveOutcome, SyncError> {
        let diff = self
            .store
            .get(tender)
            .ok_or(FollowerError::UnknownTender { tender })?;
        if !diff.has_pending_changes() {
            return Ok(SaveOutcome {
                submitted: false,
                total_followers: diff.old_followers().len(),
                followed_by_me: self.confirmed_follower(tender),
            });
        }

        let payload = diff.payload();
        if let Err(err) = self.backend.save_followers(tender, &payload).await {
            tracing::warn!(%tender, error = %err, "follower save failed; changes kept pending");
            return Err(err);
        }

        let total_followers = self.store.commit(tender)?;
        let followed_by_me = self.confirmed_follower(tender);
        tracing::info!(
            %tender,
            added = payload.new_followers.len(),
            removed = payload.unfollowers.len(),
            total_followers,
            "followers saved"
        );
        Ok(SaveOutcome {
            submitted: true,
            total_followers,
            followed_by_me,
        })
    }

    /// Tear down the view for `tender`, dropping any unsaved changes.
    ///
    /// Returns whether state existed.
    pub fn close(&mut self, tender: TenderId) -> bool {
        self.store.discard(tender).is_some()
    }

    pub async fn set_favourite(&self, tender: TenderId, favourite: bool) -> Result<(), SyncError> {
        self.backend.set_favourite(tender, favourite).await?;
        tracing::info!(%tender, favourite, "favourite updated");
        Ok(())
    }

    pub async fn set_seen(&self, tender: TenderId, seen: bool) -> Result<(), SyncError> {
        self.backend.set_seen(tender, seen).await?;
        tracing::info!(%tender, seen, "seen flag updated");
        Ok(())
    }

    /// Attach tag `name` to `tender`.
    ///
    /// A blank name is rejected with [`SyncError::Tag`] before any request
    /// is made. Returns the trimmed name that was sent.
    pub async fn add_tag(&self, tender: TenderId, name: &str) -> Result<TagName, SyncError> {
        let tag = TagName::new(name)?;
        self.backend.add_tag(tender, &tag).await?;
        tracing::info!(%tender, %tag, "tag added");
        Ok(tag)
    }

    /// Delete `tender` on the server and drop its local state.
    ///
    /// Returns the server's redirect location.
    pub async fn delete_tender(&mut self, tender: TenderId) -> Result<String, SyncError> {
        let redirect = self.backend.delete_tender(tender).await?;
        self.store.discard(tender);
        tracing::info!(%tender, %redirect, "tender deleted");
        Ok(redirect)
    }

    fn confirmed_follower(&self, tender: TenderId) -> bool {
        match (self.acting_user, self.store.get(tender)) {
            (Some(user), Some(diff)) => diff.old_followers().contains(&user),
            _ => false,
        }
    }
}
