//! The seam between a follower session and the tender server.

use std::future::Future;

use tenderwatch_core::{FollowerPayload, TagName, TenderId, UserRecord};

use crate::SyncError;

/// Server operations a follower-management view relies on.
///
/// [`HttpBackend`](crate::HttpBackend) is the production implementation;
/// tests substitute an in-memory one.
pub trait TenderBackend {
    /// Every user, each flagged with whether they follow `tender`.
    fn fetch_users(
        &self,
        tender: TenderId,
    ) -> impl Future<Output = Result<Vec<UserRecord>, SyncError>> + Send;

    /// Submit a follower diff. `Ok` means the server accepted it.
    fn save_followers(
        &self,
        tender: TenderId,
        payload: &FollowerPayload,
    ) -> impl Future<Output = Result<(), SyncError>> + Send;

    fn set_favourite(
        &self,
        tender: TenderId,
        favourite: bool,
    ) -> impl Future<Output = Result<(), SyncError>> + Send;

    fn set_seen(
        &self,
        tender: TenderId,
        seen: bool,
    ) -> impl Future<Output = Result<(), SyncError>> + Send;

    fn add_tag(
        &self,
        tender: TenderId,
        tag: &TagName,
    ) -> impl Future<Output = Result<(), SyncError>> + Send;

    /// Delete `tender`; returns the location the server redirects to.
    fn delete_tender(
        &self,
        tender: TenderId,
    ) -> impl Future<Output = Result<String, SyncError>> + Send;
}
