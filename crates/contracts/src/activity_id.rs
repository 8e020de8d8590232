//! ActivityId - remote activity identifier
//!
//! The remote service hands out 64-bit numeric identifiers. They travel as
//! plain numbers on the wire and in configuration, and are parsed from
//! command-line strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Activity identifier.
///
/// # Examples
/// ```
/// use contracts::ActivityId;
///
/// let id: ActivityId = "12345678".parse().unwrap();
/// assert_eq!(id.get(), 12345678);
/// assert_eq!(id.to_string(), "12345678");
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityId(u64);

impl ActivityId {
    /// Create a new ActivityId.
    #[inline]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the underlying numeric id.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for ActivityId {
    #[inline]
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ActivityId> for u64 {
    #[inline]
    fn from(id: ActivityId) -> Self {
        id.0
    }
}

impl FromStr for ActivityId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(Self)
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActivityId({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_parse() {
        let id: ActivityId = " 987654321 ".parse().unwrap();
        assert_eq!(id, ActivityId::new(987654321));
        assert!("abc".parse::<ActivityId>().is_err());
        assert!("-1".parse::<ActivityId>().is_err());
    }

    #[test]
    fn test_hashmap_key() {
        let mut map: HashMap<ActivityId, i32> = HashMap::new();
        map.insert(1.into(), 1);
        map.insert(2.into(), 2);

        assert_eq!(map.get(&ActivityId::new(1)), Some(&1));
        assert_eq!(map.get(&ActivityId::new(2)), Some(&2));
    }

    #[test]
    fn test_serde() {
        let id = ActivityId::new(42);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "42");

        let parsed: ActivityId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_display_and_debug() {
        let id = ActivityId::new(7);
        assert_eq!(format!("{id}"), "7");
        assert_eq!(format!("{id:?}"), "ActivityId(7)");
    }
}
