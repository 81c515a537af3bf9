//! Domain types providing compile-time safety and self-documentation
//!
//! These newtype wrappers keep raw addresses, descriptor strings and toolkit tags
//! from being mixed up, and make the model APIs read in terms of the object graph.

use objscope_common::{
    CONNECTION_AUTO, CONNECTION_AUTO_COMPAT, CONNECTION_BLOCKING_QUEUED, CONNECTION_DIRECT,
    CONNECTION_QUEUED, CONNECTION_UNIQUE_FLAG,
};
use serde::{Deserialize, Serialize};
use std::ffi::c_void;
use std::fmt;
use std::str::FromStr;

/// Identity of a live application object
///
/// The address of the object as reported by the toolkit. The probe never owns or
/// dereferences it; two ids are the same object iff the addresses are equal.
/// A null address has no `ObjectId`, nullable slots use `Option<ObjectId>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub usize);

impl ObjectId {
    /// Identity of `ptr`, or `None` for null
    #[must_use]
    pub fn from_ptr(ptr: *const c_void) -> Option<Self> {
        if ptr.is_null() {
            None
        } else {
            Some(Self(ptr as usize))
        }
    }

    /// The address as an opaque pointer, for handing back to the toolkit
    #[must_use]
    pub fn as_ptr(self) -> *mut c_void {
        self.0 as *mut c_void
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

impl FromStr for ObjectId {
    type Err = std::num::ParseIntError;

    /// Accepts `0x`-prefixed hex (as printed by `Display`) or plain decimal
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => usize::from_str_radix(hex, 16).map(Self),
            None => s.parse().map(Self),
        }
    }
}

/// Opaque signal or method token
///
/// Copied from the toolkit's C string at the callback boundary. The probe does
/// not interpret it; it is only compared and displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Descriptor(String);

impl Descriptor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Descriptor {
    fn from(s: &str) -> Self {
        Descriptor::new(s)
    }
}

impl From<String> for Descriptor {
    fn from(s: String) -> Self {
        Descriptor::new(s)
    }
}

/// How the toolkit delivers an emitted signal to the slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchKind {
    #[default]
    Auto,
    Direct,
    Queued,
    AutoCompat,
    BlockingQueued,
    /// A tag this probe does not know, kept verbatim
    Other(i32),
}

/// Connection-type tag supplied by the toolkit on connect
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionType {
    pub kind: DispatchKind,
    /// Connection was requested as unique (duplicates refused by the toolkit)
    pub unique: bool,
}

impl ConnectionType {
    /// Decode the toolkit's raw integer tag
    #[must_use]
    pub fn from_raw(raw: i32) -> Self {
        let unique = raw & CONNECTION_UNIQUE_FLAG != 0;
        let kind = match raw & !CONNECTION_UNIQUE_FLAG {
            CONNECTION_AUTO => DispatchKind::Auto,
            CONNECTION_DIRECT => DispatchKind::Direct,
            CONNECTION_QUEUED => DispatchKind::Queued,
            CONNECTION_AUTO_COMPAT => DispatchKind::AutoCompat,
            CONNECTION_BLOCKING_QUEUED => DispatchKind::BlockingQueued,
            other => DispatchKind::Other(other),
        };
        Self { kind, unique }
    }

    /// Inverse of [`ConnectionType::from_raw`]
    #[must_use]
    pub fn to_raw(self) -> i32 {
        let base = match self.kind {
            DispatchKind::Auto => CONNECTION_AUTO,
            DispatchKind::Direct => CONNECTION_DIRECT,
            DispatchKind::Queued => CONNECTION_QUEUED,
            DispatchKind::AutoCompat => CONNECTION_AUTO_COMPAT,
            DispatchKind::BlockingQueued => CONNECTION_BLOCKING_QUEUED,
            DispatchKind::Other(raw) => raw,
        };
        if self.unique {
            base | CONNECTION_UNIQUE_FLAG
        } else {
            base
        }
    }
}

impl fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DispatchKind::Auto => f.write_str("auto")?,
            DispatchKind::Direct => f.write_str("direct")?,
            DispatchKind::Queued => f.write_str("queued")?,
            DispatchKind::AutoCompat => f.write_str("auto-compat")?,
            DispatchKind::BlockingQueued => f.write_str("blocking-queued")?,
            DispatchKind::Other(raw) => write!(f, "type({raw})")?,
        }
        if self.unique {
            f.write_str("|unique")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_id_from_null_is_none() {
        assert_eq!(ObjectId::from_ptr(std::ptr::null()), None);
    }

    #[test]
    fn test_object_id_display_and_parse() {
        let id = ObjectId(0xdead_beef);
        assert_eq!(id.to_string(), "0xdeadbeef");
        assert_eq!("0xdeadbeef".parse::<ObjectId>().unwrap(), id);
        assert_eq!("4096".parse::<ObjectId>().unwrap(), ObjectId(4096));
        assert!("0xnothex".parse::<ObjectId>().is_err());
    }

    #[test]
    fn test_object_id_pointer_identity() {
        let value = 7u32;
        let ptr = std::ptr::from_ref(&value).cast::<c_void>();
        let id = ObjectId::from_ptr(ptr).unwrap();
        assert_eq!(id.as_ptr().cast_const(), ptr);
    }

    #[test]
    fn test_connection_type_decoding() {
        assert_eq!(ConnectionType::from_raw(0), ConnectionType::default());
        let queued_unique = ConnectionType::from_raw(CONNECTION_QUEUED | CONNECTION_UNIQUE_FLAG);
        assert_eq!(queued_unique.kind, DispatchKind::Queued);
        assert!(queued_unique.unique);
        assert_eq!(queued_unique.to_string(), "queued|unique");
        assert_eq!(ConnectionType::from_raw(42).kind, DispatchKind::Other(42));
    }

    #[test]
    fn test_connection_type_raw_is_stable() {
        for raw in [0, 1, 2, 3, 4, 0x81, 0x84, 17] {
            assert_eq!(ConnectionType::from_raw(raw).to_raw(), raw);
        }
    }
}
