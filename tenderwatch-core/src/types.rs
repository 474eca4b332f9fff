//! Domain types for tender follower management.
//!
//! Identifiers are validated once, at the boundary: every [`TenderId`] and
//! [`UserId`] holds a positive integer. Both serialize as bare JSON numbers
//! and accept either a number or a numeric string on input, since the
//! listing endpoint is not consistent about which one it sends.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{IdError, TagError};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Raw identifier as it may appear in JSON.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Unsigned(u64),
    Signed(i64),
    Text(String),
}

fn parse_positive(input: &str) -> Result<u64, IdError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(IdError::Empty);
    }
    match trimmed.parse::<u64>() {
        Ok(0) => Err(IdError::NotPositive { value: 0 }),
        Ok(value) => Ok(value),
        Err(_) => match trimmed.parse::<i64>() {
            Ok(value) => Err(IdError::NotPositive { value }),
            Err(_) => Err(IdError::NotNumeric {
                input: trimmed.to_owned(),
            }),
        },
    }
}

fn positive_from_raw(raw: RawId) -> Result<u64, IdError> {
    match raw {
        RawId::Unsigned(0) => Err(IdError::NotPositive { value: 0 }),
        RawId::Unsigned(value) => Ok(value),
        RawId::Signed(value) if value > 0 => Ok(value as u64),
        RawId::Signed(value) => Err(IdError::NotPositive { value }),
        RawId::Text(text) => parse_positive(&text),
    }
}

macro_rules! positive_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wrap an already-validated value. Returns `None` for zero.
            pub fn new(value: u64) -> Option<Self> {
                (value > 0).then_some(Self(value))
            }

            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_positive(s).map(Self)
            }
        }

        impl TryFrom<i64> for $name {
            type Error = IdError;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                positive_from_raw(RawId::Signed(value)).map(Self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = RawId::deserialize(deserializer)?;
                positive_from_raw(raw)
                    .map(Self)
                    .map_err(serde::de::Error::custom)
            }
        }
    };
}

positive_id! {
    /// Identifier of a tender record.
    TenderId
}

positive_id! {
    /// Identifier of an application user.
    UserId
}

/// A non-blank tag name, trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TagName(String);

impl TagName {
    pub fn new(name: &str) -> Result<Self, TagError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(TagError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TagName {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for TagName {
    type Error = TagError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<TagName> for String {
    fn from(tag: TagName) -> Self {
        tag.0
    }
}

// ---------------------------------------------------------------------------
// Wire structs
// ---------------------------------------------------------------------------

/// One row of the follower listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub is_follower: bool,
}

impl UserRecord {
    /// Email for display; blank or missing addresses read as `no email`.
    pub fn display_email(&self) -> &str {
        match self.email.as_deref() {
            Some(email) if !email.trim().is_empty() => email,
            _ => "no email",
        }
    }
}

/// Body of the follower save request.
///
/// Arrays are sorted ascending; a payload built from the same diff is
/// always byte-identical.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowerPayload {
    pub old_followers: Vec<UserId>,
    pub new_followers: Vec<UserId>,
    pub unfollowers: Vec<UserId>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
