//! UUIDv7 utilities for time-ordered identifiers.
//!
//! Idea and user ids are UUIDv7: the first 48 bits embed a millisecond
//! Unix timestamp, so ids generated later sort lexicographically greater.
//! That keeps the primary-key index append-mostly under insert-heavy load.

use uuid::Uuid;

/// Generate a new UUIDv7 identifier.
#[inline]
pub fn new_v7() -> Uuid {
    Uuid::now_v7()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_v7_is_version_7() {
        let id = new_v7();
        assert_eq!(id.get_version_num(), 7);
    }

    #[test]
    fn test_new_v7_is_time_ordered() {
        let a = new_v7();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = new_v7();
        assert!(a < b);
    }
}
