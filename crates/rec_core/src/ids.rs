//! Newtypes for the two keys of every inventory entry: topic name and level.

use core::fmt;
use core::str::FromStr;

use crate::errors::CoreError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Upper bound on a topic name, in bytes.
pub const TOPIC_NAME_MAX_LEN: usize = 128;

fn is_topic_name(s: &str) -> bool {
    !s.trim().is_empty() && s.len() <= TOPIC_NAME_MAX_LEN && !s.chars().any(char::is_control)
}

/// Subject area name. Ordered byte-wise, which is the canonical topic order.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct TopicName(String);

impl TopicName {
    pub fn new(s: impl Into<String>) -> Result<Self, CoreError> {
        let s = s.into();
        if is_topic_name(&s) { Ok(Self(s)) } else { Err(CoreError::InvalidTopicName(s)) }
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for TopicName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TopicName {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> { Self::new(s) }
}

impl TryFrom<String> for TopicName {
    type Error = CoreError;
    fn try_from(s: String) -> Result<Self, Self::Error> { Self::new(s) }
}

impl From<TopicName> for String {
    fn from(t: TopicName) -> Self { t.0 }
}

/// Difficulty tier within a topic; lower ranks sort first.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Level(pub u32);

impl Level {
    pub const fn get(self) -> u32 { self.0 }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Level {
    fn from(v: u32) -> Self { Level(v) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_name_rules() {
        assert!(TopicName::new("Math").is_ok());
        assert!(TopicName::new("Linear Algebra").is_ok());
        assert!(TopicName::new("").is_err());
        assert!(TopicName::new("   ").is_err());
        assert!(TopicName::new("tab\there").is_err());
        assert!(TopicName::new("x".repeat(TOPIC_NAME_MAX_LEN)).is_ok());
        assert!(TopicName::new("x".repeat(TOPIC_NAME_MAX_LEN + 1)).is_err());
    }

    #[test]
    fn topic_order_is_bytewise() {
        let mut v: Vec<TopicName> = ["physics", "Math", "Algebra", "math"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        v.sort();
        let got: Vec<&str> = v.iter().map(|t| t.as_str()).collect();
        assert_eq!(got, vec!["Algebra", "Math", "math", "physics"]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn topic_name_rejects_empty_on_deserialize() {
        assert!(serde_json::from_str::<TopicName>("\"\"").is_err());
        let t: TopicName = serde_json::from_str("\"Math\"").unwrap();
        assert_eq!(t.as_str(), "Math");
        assert_eq!(serde_json::to_string(&Level(3)).unwrap(), "3");
    }
}
