//! Action patterns: the selectors the action bus routes messages by.
//!
//! A pattern is a set of `key:value` pairs written comma-separated, for
//! example `role:test,cmd:ping`. Key order is irrelevant: two patterns with
//! the same pairs are equal and display identically (sorted by key).

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PatternError;

/// Value used in a route-map pin to mark the key filled in per route.
pub const WILDCARD: &str = "*";

/// A parsed action pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pattern {
    pairs: BTreeMap<String, String>,
}

impl Pattern {
    /// A pattern holding the single pair `key:value`.
    #[must_use]
    pub fn pair(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            pairs: BTreeMap::from([(key.into(), value.into())]),
        }
    }

    /// Look up the value bound to `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs.get(key).map(String::as_str)
    }

    /// Iterate over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of pairs; more pairs means a more specific pattern.
    #[must_use]
    pub fn specificity(&self) -> usize {
        self.pairs.len()
    }

    /// Whether every pair of `other` is also present in `self`.
    ///
    /// A message pattern `role:test,cmd:ping,x:1` contains the handler
    /// pattern `role:test,cmd:ping`.
    #[must_use]
    pub fn contains(&self, other: &Pattern) -> bool {
        other
            .pairs
            .iter()
            .all(|(key, value)| self.pairs.get(key) == Some(value))
    }

    /// Keys whose value is the [`WILDCARD`].
    pub fn wildcard_keys(&self) -> impl Iterator<Item = &str> {
        self.pairs
            .iter()
            .filter(|(_, value)| value.as_str() == WILDCARD)
            .map(|(key, _)| key.as_str())
    }

    /// Return a copy with `key` bound to `value`, replacing any prior value.
    #[must_use]
    pub fn with(&self, key: &str, value: impl Into<String>) -> Self {
        let mut pairs = self.pairs.clone();
        pairs.insert(key.to_string(), value.into());
        Self { pairs }
    }
}

impl FromStr for Pattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut pairs = BTreeMap::new();

        for segment in s.split(',').map(str::trim).filter(|seg| !seg.is_empty()) {
            let (key, value) =
                segment
                    .split_once(':')
                    .ok_or_else(|| PatternError::MissingSeparator {
                        segment: segment.to_string(),
                    })?;
            let (key, value) = (key.trim(), value.trim());
            if key.is_empty() {
                return Err(PatternError::EmptyKey {
                    segment: segment.to_string(),
                });
            }
            if value.is_empty() {
                return Err(PatternError::EmptyValue {
                    key: key.to_string(),
                });
            }
            if pairs.insert(key.to_string(), value.to_string()).is_some() {
                return Err(PatternError::DuplicateKey {
                    key: key.to_string(),
                });
            }
        }

        if pairs.is_empty() {
            return Err(PatternError::Empty);
        }
        Ok(Self { pairs })
    }
}

impl TryFrom<String> for Pattern {
    type Error = PatternError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Pattern> for String {
    fn from(pattern: Pattern) -> Self {
        pattern.to_string()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, (key, value)) in self.pairs.iter().enumerate() {
            if idx > 0 {
                f.write_str(",")?;
            }
            write!(f, "{key}:{value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(s: &str) -> Pattern {
        s.parse().unwrap()
    }

    #[test]
    fn should_parse_pairs_and_display_sorted() {
        let p = pattern("role:test,cmd:ping");
        assert_eq!(p.get("role"), Some("test"));
        assert_eq!(p.get("cmd"), Some("ping"));
        assert_eq!(p.to_string(), "cmd:ping,role:test");
    }

    #[test]
    fn should_ignore_whitespace_and_empty_segments() {
        let p = pattern(" role : test , , cmd:ping ,");
        assert_eq!(p, pattern("cmd:ping,role:test"));
    }

    #[test]
    fn should_keep_colons_inside_values() {
        let p = pattern("role:web,url:http://x");
        assert_eq!(p.get("url"), Some("http://x"));
    }

    #[test]
    fn should_reject_empty_pattern() {
        assert_eq!("".parse::<Pattern>(), Err(PatternError::Empty));
        assert_eq!(" , ".parse::<Pattern>(), Err(PatternError::Empty));
    }

    #[test]
    fn should_reject_segment_without_separator() {
        assert_eq!(
            "role:test,ping".parse::<Pattern>(),
            Err(PatternError::MissingSeparator {
                segment: "ping".to_string()
            })
        );
    }

    #[test]
    fn should_reject_empty_key_or_value() {
        assert!(matches!(
            ":test".parse::<Pattern>(),
            Err(PatternError::EmptyKey { .. })
        ));
        assert_eq!(
            "role:".parse::<Pattern>(),
            Err(PatternError::EmptyValue {
                key: "role".to_string()
            })
        );
    }

    #[test]
    fn should_reject_duplicate_keys() {
        assert_eq!(
            "cmd:a,cmd:b".parse::<Pattern>(),
            Err(PatternError::DuplicateKey {
                key: "cmd".to_string()
            })
        );
    }

    #[test]
    fn should_contain_subset_pattern() {
        let message = pattern("role:test,cmd:ping,extra:1");
        assert!(message.contains(&pattern("role:test,cmd:ping")));
        assert!(message.contains(&pattern("role:test")));
        assert!(!message.contains(&pattern("role:test,cmd:pong")));
        assert!(!pattern("role:test").contains(&message));
    }

    #[test]
    fn should_list_wildcard_keys_and_fill_them() {
        let pin = pattern("role:test,cmd:*");
        assert_eq!(pin.wildcard_keys().collect::<Vec<_>>(), vec!["cmd"]);

        let filled = pin.with("cmd", "ping");
        assert_eq!(filled, pattern("role:test,cmd:ping"));
        assert_eq!(filled.wildcard_keys().count(), 0);
    }

    #[test]
    fn should_build_from_single_pair() {
        let pin = Pattern::pair("role", "web").with("cmd", WILDCARD);
        assert_eq!(pin, pattern("role:web,cmd:*"));
    }

    #[test]
    fn should_deserialize_from_string() {
        let p: Pattern = serde_json::from_str("\"role:test,cmd:ping\"").unwrap();
        assert_eq!(p.specificity(), 2);
        assert_eq!(serde_json::to_string(&p).unwrap(), "\"cmd:ping,role:test\"");
    }
}
