//! Stored Value Representation
//!
//! The store is dynamically typed at the storage boundary: every persisted
//! entry is a [`StoredValue`], and typed access happens through the
//! [`StoreValue`] conversion trait. This replaces the combinatorial
//! one-method-per-type accessor surface with a single generic interface.
//!
//! # Conversion Rules
//!
//! - A typed read succeeds only when the stored variant matches the requested
//!   type. A mismatch yields `None`, never an error — callers supply their
//!   own fallback default.
//! - `i32` reads narrow from the stored 64-bit integer and yield `None` when
//!   the value is out of range.
//! - URLs round-trip through their string form via [`StoreUrl`]; there is no
//!   dedicated URL variant at the storage layer. A stored string that is not
//!   an absolute URL reads back as `None`.
//!
//! # Raw-Representable Enums
//!
//! Enums backed by a primitive raw value (an integer discriminant or a string
//! tag) implement [`RawRepr`] instead of [`StoreValue`]. The store exposes
//! `get_raw`/`set_raw` over that trait, so the enum itself never has to know
//! about [`StoredValue`].

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A dynamically typed value as held by the storage backend.
///
/// Insertion order of [`StoredValue::Dict`] entries is preserved, so a
/// dictionary survives a persistence round trip byte-for-byte.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoredValue {
    Bool(bool),
    Int(i64),
    Double(f64),
    Text(String),
    Date(DateTime<Utc>),
    Blob(Vec<u8>),
    List(Vec<StoredValue>),
    Dict(IndexMap<String, StoredValue>),
}

/// Conversion between a concrete Rust type and the stored representation.
///
/// `from_stored` returns `None` on a type mismatch; absence and mismatch are
/// deliberately indistinguishable to the caller.
pub trait StoreValue: Sized {
    /// Convert this value into its stored representation.
    fn into_stored(self) -> StoredValue;

    /// Convert a stored value back, or `None` if the variant does not match.
    fn from_stored(value: &StoredValue) -> Option<Self>;
}

impl StoreValue for bool {
    fn into_stored(self) -> StoredValue {
        StoredValue::Bool(self)
    }

    fn from_stored(value: &StoredValue) -> Option<Self> {
        match value {
            StoredValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl StoreValue for i64 {
    fn into_stored(self) -> StoredValue {
        StoredValue::Int(self)
    }

    fn from_stored(value: &StoredValue) -> Option<Self> {
        match value {
            StoredValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl StoreValue for i32 {
    fn into_stored(self) -> StoredValue {
        StoredValue::Int(i64::from(self))
    }

    fn from_stored(value: &StoredValue) -> Option<Self> {
        match value {
            StoredValue::Int(i) => i32::try_from(*i).ok(),
            _ => None,
        }
    }
}

impl StoreValue for f64 {
    fn into_stored(self) -> StoredValue {
        StoredValue::Double(self)
    }

    fn from_stored(value: &StoredValue) -> Option<Self> {
        match value {
            StoredValue::Double(d) => Some(*d),
            _ => None,
        }
    }
}

impl StoreValue for String {
    fn into_stored(self) -> StoredValue {
        StoredValue::Text(self)
    }

    fn from_stored(value: &StoredValue) -> Option<Self> {
        match value {
            StoredValue::Text(s) => Some(s.clone()),
            _ => None,
        }
    }
}

/// An absolute URL, stored in its string form.
///
/// The storage layer has no URL variant; a `StoreUrl` writes as
/// [`StoredValue::Text`] and validates on read. A stored string with no
/// URL scheme reads back as `None`, like any other type mismatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreUrl(String);

impl StoreUrl {
    /// Wrap an absolute URL string, or `None` when it has no scheme.
    pub fn parse(url: impl Into<String>) -> Option<Self> {
        let url = url.into();
        if has_url_scheme(&url) {
            Some(Self(url))
        } else {
            None
        }
    }

    /// The URL in string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StoreUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl StoreValue for StoreUrl {
    fn into_stored(self) -> StoredValue {
        StoredValue::Text(self.0)
    }

    fn from_stored(value: &StoredValue) -> Option<Self> {
        match value {
            StoredValue::Text(s) => StoreUrl::parse(s.clone()),
            _ => None,
        }
    }
}

/// An absolute URL starts with `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." ) ":"`.
fn has_url_scheme(s: &str) -> bool {
    let Some(scheme) = s.split(':').next().filter(|p| p.len() < s.len()) else {
        return false;
    };
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

impl StoreValue for DateTime<Utc> {
    fn into_stored(self) -> StoredValue {
        StoredValue::Date(self)
    }

    fn from_stored(value: &StoredValue) -> Option<Self> {
        match value {
            StoredValue::Date(d) => Some(*d),
            _ => None,
        }
    }
}

impl StoreValue for Vec<u8> {
    fn into_stored(self) -> StoredValue {
        StoredValue::Blob(self)
    }

    fn from_stored(value: &StoredValue) -> Option<Self> {
        match value {
            StoredValue::Blob(b) => Some(b.clone()),
            _ => None,
        }
    }
}

impl StoreValue for Vec<StoredValue> {
    fn into_stored(self) -> StoredValue {
        StoredValue::List(self)
    }

    fn from_stored(value: &StoredValue) -> Option<Self> {
        match value {
            StoredValue::List(items) => Some(items.clone()),
            _ => None,
        }
    }
}

impl StoreValue for IndexMap<String, StoredValue> {
    fn into_stored(self) -> StoredValue {
        StoredValue::Dict(self)
    }

    fn from_stored(value: &StoredValue) -> Option<Self> {
        match value {
            StoredValue::Dict(entries) => Some(entries.clone()),
            _ => None,
        }
    }
}

impl StoreValue for StoredValue {
    fn into_stored(self) -> StoredValue {
        self
    }

    fn from_stored(value: &StoredValue) -> Option<Self> {
        Some(value.clone())
    }
}

/// A type representable by a primitive raw value.
///
/// The classic case is an enum stored as its integer discriminant or string
/// tag. `from_raw` returns `None` for raw values with no corresponding
/// variant, which the store treats like any other type mismatch.
pub trait RawRepr: Sized {
    /// The underlying stored type, usually `i64` or `String`.
    type Raw: StoreValue;

    /// The raw value this instance is stored as.
    fn to_raw(&self) -> Self::Raw;

    /// Reconstruct from a raw value, or `None` if it is unrecognized.
    fn from_raw(raw: Self::Raw) -> Option<Self>;
}
