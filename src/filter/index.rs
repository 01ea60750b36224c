use crate::document::Channel;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    /// Channel ids are load-bearing for the index, so a collision in the
    /// input data is structural, not advisory.
    #[error("duplicate channel id '{0}' in listings")]
    DuplicateChannelId(String),
}

/// Precomputed channel-name matching.
///
/// Maps each distinct channel-name pattern used by the expression to the set
/// of channel ids whose display name matches it. Built once, after the
/// channel set is loaded and compilation has collected the patterns; consumed
/// by both the programme-domain and channel-domain name tests. Never mutated
/// afterwards.
#[derive(Debug)]
pub struct ChannelNameIndex {
    matched: HashMap<String, HashSet<String>>,
}

impl ChannelNameIndex {
    /// Build the index. A channel with several matching display names is
    /// still recorded once per pattern. The empty pattern matches any channel
    /// with at least one display name, empty text included.
    pub fn build(
        patterns: &[(String, Regex)],
        channels: &[Channel],
    ) -> Result<Self, IndexError> {
        let mut ids = HashSet::new();
        for channel in channels {
            if !ids.insert(channel.id.as_str()) {
                return Err(IndexError::DuplicateChannelId(channel.id.clone()));
            }
        }

        let mut matched: HashMap<String, HashSet<String>> = HashMap::new();
        for (text, regex) in patterns {
            let entry = matched.entry(text.clone()).or_default();
            for channel in channels {
                if channel
                    .display_names
                    .iter()
                    .any(|name| regex.is_match(&name.text))
                {
                    entry.insert(channel.id.clone());
                }
            }
        }

        Ok(ChannelNameIndex { matched })
    }

    /// Whether the channel id is in the matched set for this pattern.
    pub fn contains(&self, pattern: &str, channel_id: &str) -> bool {
        self.matched
            .get(pattern)
            .is_some_and(|ids| ids.contains(channel_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::FieldValue;

    fn channel(id: &str, names: &[&str]) -> Channel {
        Channel {
            id: id.to_string(),
            display_names: names.iter().map(|n| FieldValue::new(*n)).collect(),
        }
    }

    fn pattern(text: &str) -> (String, Regex) {
        (text.to_string(), Regex::new(text).unwrap())
    }

    #[test]
    fn test_display_name_matching() {
        let channels = vec![
            channel("a", &["News24"]),
            channel("b", &["SportsMax", "Sports Max HD"]),
        ];
        let index = ChannelNameIndex::build(&[pattern("Sports")], &channels).unwrap();

        assert!(index.contains("Sports", "b"));
        assert!(!index.contains("Sports", "a"));
        assert!(!index.contains("News", "a")); // pattern not in the index
    }

    #[test]
    fn test_empty_pattern_needs_a_display_name() {
        let channels = vec![channel("named", &[""]), channel("nameless", &[])];
        let index = ChannelNameIndex::build(&[pattern("")], &channels).unwrap();

        assert!(index.contains("", "named"));
        assert!(!index.contains("", "nameless"));
    }

    #[test]
    fn test_duplicate_channel_id_is_fatal() {
        let channels = vec![channel("a", &["One"]), channel("a", &["Two"])];
        assert!(matches!(
            ChannelNameIndex::build(&[], &channels),
            Err(IndexError::DuplicateChannelId(id)) if id == "a"
        ));
    }
}
