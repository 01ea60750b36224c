use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Position of a programme inside a clump: a group of programmes sharing
/// one timeslot on one channel. Rendered as `position/total`, e.g. `0/2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClumpIdx {
    pub position: u32,
    pub total: u32,
}

impl fmt::Display for ClumpIdx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.position, self.total)
    }
}

impl FromStr for ClumpIdx {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (position, total) = s
            .split_once('/')
            .ok_or_else(|| format!("expected 'position/total', got '{}'", s))?;
        let position = position
            .parse()
            .map_err(|_| format!("invalid clump position in '{}'", s))?;
        let total = total
            .parse()
            .map_err(|_| format!("invalid clump total in '{}'", s))?;
        Ok(ClumpIdx { position, total })
    }
}

impl TryFrom<String> for ClumpIdx {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ClumpIdx> for String {
    fn from(idx: ClumpIdx) -> Self {
        idx.to_string()
    }
}

/// One occurrence of a named field: its text plus an optional language tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValue {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

impl FieldValue {
    pub fn new(text: impl Into<String>) -> Self {
        FieldValue {
            text: text.into(),
            lang: None,
        }
    }
}

/// A broadcast source: an identifier plus zero or more display names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    #[serde(rename = "display-names", default)]
    pub display_names: Vec<FieldValue>,
}

/// A single broadcast item.
///
/// `channel` and `start` are mandatory; `stop` and `clumpidx` may be absent.
/// All other content lives in `fields`, an ordered mapping from field name to
/// the field's occurrences. An empty occurrence list and a missing map entry
/// both mean "field absent"; a field whose occurrence has empty text is
/// present-but-empty, which several tests treat differently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Programme {
    pub channel: String,
    pub start: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clumpidx: Option<ClumpIdx>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, Vec<FieldValue>>,
}

impl Programme {
    /// All occurrence texts for a named field, in document order.
    ///
    /// An empty result means the field is absent. The `stop` timestamp is
    /// addressable as a field so presence tests can reach it; `start` and
    /// `channel` are mandatory and are not exposed here.
    pub fn occurrences(&self, field: &str) -> Vec<&str> {
        match field {
            "stop" => self.stop.iter().map(String::as_str).collect(),
            _ => self
                .fields
                .get(field)
                .map(|values| values.iter().map(|v| v.text.as_str()).collect())
                .unwrap_or_default(),
        }
    }
}

impl fmt::Display for Programme {
    /// Canonical one-line rendering used by the whole-record pattern test.
    /// Deterministic (fields in name order, occurrences in document order),
    /// not meant to be pretty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "channel=\"{}\" start=\"{}\"", self.channel, self.start)?;
        if let Some(stop) = &self.stop {
            write!(f, " stop=\"{}\"", stop)?;
        }
        if let Some(clumpidx) = &self.clumpidx {
            write!(f, " clumpidx=\"{}\"", clumpidx)?;
        }
        for (name, values) in &self.fields {
            for value in values {
                write!(f, " {}=\"{}\"", name, value.text)?;
            }
        }
        Ok(())
    }
}

/// The whole listings document: encoding marker, opaque credits block, the
/// channel set, and the programme sequence. Credits and encoding pass through
/// the filter untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub credits: Value,
    #[serde(default)]
    pub channels: Vec<Channel>,
    #[serde(default)]
    pub programmes: Vec<Programme>,
}
