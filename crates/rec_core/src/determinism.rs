//! Determinism utilities: the canonical entry order and stable comparisons.
//!
//! This module is **I/O-free**. Every tie in the engine is resolved by the
//! canonical entry order defined here: topic name ascending (byte-wise), then
//! level ascending. Nothing depends on hash order or insertion order.

use core::cmp::Ordering;

use crate::ids::{Level, TopicName};

/* -------------------------------------------------------------------------- */
/*                               Stable Ordering                              */
/* -------------------------------------------------------------------------- */

/// Provide a **total**, stable order for values that must sort canonically.
pub trait StableOrd {
    fn stable_cmp(&self, other: &Self) -> Ordering;
}

impl StableOrd for TopicName {
    #[inline]
    fn stable_cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl StableOrd for Level {
    #[inline]
    fn stable_cmp(&self, other: &Self) -> Ordering {
        self.get().cmp(&other.get())
    }
}

/// Position of one (topic, level) entry in the canonical order.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct EntryKey<'a> {
    pub topic: &'a TopicName,
    pub level: Level,
}

impl<'a> EntryKey<'a> {
    pub fn new(topic: &'a TopicName, level: Level) -> Self {
        Self { topic, level }
    }
}

impl StableOrd for EntryKey<'_> {
    /// Canonical entry order is **always** `(topic, level)`.
    #[inline]
    fn stable_cmp(&self, other: &Self) -> Ordering {
        match self.topic.stable_cmp(other.topic) {
            Ordering::Equal => self.level.stable_cmp(&other.level),
            o => o,
        }
    }
}

impl Ord for EntryKey<'_> {
    fn cmp(&self, other: &Self) -> Ordering { self.stable_cmp(other) }
}

impl PartialOrd for EntryKey<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

/* ---------------------------------- Tests --------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> TopicName { s.parse().unwrap() }

    #[test]
    fn entries_sort_by_topic_then_level() {
        let (math, bio) = (t("Math"), t("Biology"));
        let mut v = vec![
            EntryKey::new(&math, Level(2)),
            EntryKey::new(&bio, Level(3)),
            EntryKey::new(&math, Level(1)),
            EntryKey::new(&bio, Level(1)),
        ];
        v.sort_by(|a, b| a.stable_cmp(b));
        let got: Vec<(&str, u32)> = v.iter().map(|e| (e.topic.as_str(), e.level.get())).collect();
        assert_eq!(got, vec![("Biology", 1), ("Biology", 3), ("Math", 1), ("Math", 2)]);
    }

    #[test]
    fn level_order_is_numeric() {
        assert_eq!(Level(2).stable_cmp(&Level(10)), Ordering::Less);
    }
}
