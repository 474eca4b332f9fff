//! Tenderwatch core library — identifiers, follower diffing, errors.
//!
//! Public API surface:
//! - [`types`] — id newtypes, user records and the save payload
//! - [`followers`] — [`FollowerDiff`], the three-set diff for one tender
//! - [`store`] — [`FollowerStore`], per-tender diffs owned by a view
//! - [`error`] — [`FollowerError`], [`IdError`], [`TagError`]

pub mod error;
pub mod followers;
pub mod store;
pub mod types;

pub use error::{FollowerError, IdError, TagError};
pub use followers::{FollowerDiff, IdSet};
pub use store::FollowerStore;
pub use types::{FollowerPayload, TagName, TenderId, UserId, UserRecord};
