// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for tree views: identifiers and nodes.

use alloc::string::{String, ToString};
use core::cmp::Ordering;
use core::fmt;

/// Identifier for a node in a tree-of-nodes snapshot.
///
/// Hosts frequently mix integer and string keys in the same tree (for example a
/// numeric database row id next to a synthetic `"new"` key). `Identifier` models
/// that union as a single value with structural equality.
///
/// The [`Ord`] implementation compares the string representation first, so that
/// `10 < 9` and `0 < 1 < "A"`. Values with the same representation but a
/// different variant (`1` and `"1"`) are distinct and order integers first.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Identifier {
    /// Integer key.
    Int(i64),
    /// String key.
    Str(String),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Str(a), Self::Str(b)) => a.cmp(b),
            _ => self
                .to_string()
                .cmp(&other.to_string())
                .then_with(|| self.rank().cmp(&other.rank())),
        }
    }
}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Identifier {
    const fn rank(&self) -> u8 {
        match self {
            Self::Int(_) => 0,
            Self::Str(_) => 1,
        }
    }

    /// Returns the integer value if this is an [`Identifier::Int`].
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Str(_) => None,
        }
    }

    /// Returns the string value if this is an [`Identifier::Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Int(_) => None,
            Self::Str(s) => Some(s),
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Identifier {
                fn from(value: $t) -> Self {
                    Self::Int(i64::from(value))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Self::Str(value.into())
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// One entry of a tree-of-nodes snapshot.
///
/// Nodes form a hierarchy through `parent` links only; there is no child list.
/// A node whose parent does not resolve to another node of the same snapshot
/// (dangling or self-referential) is treated as a root.
#[derive(Clone, Debug, PartialEq)]
pub struct Node<K, T> {
    /// Identifier, expected to be unique within a snapshot.
    pub id: K,
    /// Display label.
    pub label: String,
    /// Optional parent identifier.
    pub parent: Option<K>,
    /// Opaque host payload.
    pub data: T,
}

impl<K, T> Node<K, T> {
    /// Create a node without a parent.
    pub fn root(id: impl Into<K>, label: impl Into<String>, data: T) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            parent: None,
            data,
        }
    }

    /// Create a node under `parent`.
    pub fn child(
        id: impl Into<K>,
        parent: impl Into<K>,
        label: impl Into<String>,
        data: T,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            parent: Some(parent.into()),
            data,
        }
    }
}
