//! Inventory, progress and allocation maps.
//!
//! All three are nested `BTreeMap`s keyed topic → level, so plain iteration
//! already yields the canonical entry order. Values are built once per call
//! and never mutated after the allocator returns.

use std::collections::BTreeMap;

use crate::determinism::EntryKey;
use crate::errors::CoreError;
use crate::ids::{Level, TopicName};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Per-level counts for one topic.
pub type LevelCounts = BTreeMap<Level, u64>;

/// Unused questions per (topic, level).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Inventory {
    topics: BTreeMap<TopicName, LevelCounts>,
}

impl Inventory {
    pub fn new() -> Self { Self::default() }

    /// Register a topic even if it ends up with no levels.
    pub fn add_topic(&mut self, topic: TopicName) {
        self.topics.entry(topic).or_default();
    }

    /// Set availability for one level; returns the previous value if any.
    pub fn insert(&mut self, topic: TopicName, level: Level, available: u64) -> Option<u64> {
        self.topics.entry(topic).or_default().insert(level, available)
    }

    pub fn available(&self, topic: &TopicName, level: Level) -> u64 {
        self.topics.get(topic).and_then(|l| l.get(&level)).copied().unwrap_or(0)
    }

    pub fn topics(&self) -> impl Iterator<Item = (&TopicName, &LevelCounts)> {
        self.topics.iter()
    }

    /// Every (topic, level) entry in canonical order with its availability.
    pub fn entries(&self) -> impl Iterator<Item = (EntryKey<'_>, u64)> {
        self.topics
            .iter()
            .flat_map(|(t, levels)| levels.iter().map(move |(l, &n)| (EntryKey::new(t, *l), n)))
    }

    pub fn topic_count(&self) -> usize { self.topics.len() }

    pub fn entry_count(&self) -> usize { self.topics.values().map(BTreeMap::len).sum() }

    /// Sum of all availability; u128 so it cannot overflow for any u64 inputs.
    pub fn total_available(&self) -> u128 {
        self.entries().map(|(_, n)| n as u128).sum()
    }

    pub fn is_empty(&self) -> bool { self.topics.is_empty() }
}

/// Solved / attempted counts for one level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LevelProgress {
    pub solved: u64,
    pub attempted: u64,
}

impl LevelProgress {
    pub fn new(solved: u64, attempted: u64) -> Result<Self, CoreError> {
        let p = Self { solved, attempted };
        p.check()?;
        Ok(p)
    }

    /// `solved <= attempted`.
    pub fn check(&self) -> Result<(), CoreError> {
        if self.solved > self.attempted {
            Err(CoreError::ProgressInconsistent { solved: self.solved, attempted: self.attempted })
        } else {
            Ok(())
        }
    }

    pub fn unsolved(&self) -> u64 { self.attempted.saturating_sub(self.solved) }
}

/// Recorded progress per (topic, level). Sparse: missing entries mean "no data".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Progress {
    topics: BTreeMap<TopicName, BTreeMap<Level, LevelProgress>>,
}

impl Progress {
    pub fn new() -> Self { Self::default() }

    pub fn insert(&mut self, topic: TopicName, level: Level, p: LevelProgress) -> Option<LevelProgress> {
        self.topics.entry(topic).or_default().insert(level, p)
    }

    pub fn get(&self, topic: &TopicName, level: Level) -> Option<&LevelProgress> {
        self.topics.get(topic).and_then(|l| l.get(&level))
    }

    pub fn entries(&self) -> impl Iterator<Item = (EntryKey<'_>, &LevelProgress)> {
        self.topics
            .iter()
            .flat_map(|(t, levels)| levels.iter().map(move |(l, p)| (EntryKey::new(t, *l), p)))
    }

    pub fn is_empty(&self) -> bool { self.topics.values().all(BTreeMap::is_empty) }
}

/// Recommended questions per (topic, level). Mirrors the inventory's shape:
/// every input entry is present, zero when nothing was recommended.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Allocation {
    topics: BTreeMap<TopicName, LevelCounts>,
}

impl Allocation {
    /// All-zero allocation with the same topics and levels as `inv`.
    pub fn zeroed_like(inv: &Inventory) -> Self {
        let topics = inv
            .topics()
            .map(|(t, levels)| (t.clone(), levels.keys().map(|l| (*l, 0u64)).collect()))
            .collect();
        Self { topics }
    }

    pub fn set(&mut self, topic: &TopicName, level: Level, count: u64) {
        match self.topics.get_mut(topic) {
            Some(levels) => {
                levels.insert(level, count);
            }
            None => {
                self.topics.insert(topic.clone(), BTreeMap::from([(level, count)]));
            }
        }
    }

    pub fn get(&self, topic: &TopicName, level: Level) -> u64 {
        self.topics.get(topic).and_then(|l| l.get(&level)).copied().unwrap_or(0)
    }

    pub fn topics(&self) -> impl Iterator<Item = (&TopicName, &LevelCounts)> {
        self.topics.iter()
    }

    pub fn entries(&self) -> impl Iterator<Item = (EntryKey<'_>, u64)> {
        self.topics
            .iter()
            .flat_map(|(t, levels)| levels.iter().map(move |(l, &n)| (EntryKey::new(t, *l), n)))
    }

    pub fn topic_total(&self, topic: &TopicName) -> u64 {
        self.topics.get(topic).map(|l| l.values().sum()).unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.entries().map(|(_, n)| n).sum()
    }
}
