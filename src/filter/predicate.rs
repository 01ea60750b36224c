use super::index::ChannelNameIndex;
use crate::clock::{self, Timestamp};
use crate::document::{Channel, Programme};
use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Escape-hatch predicate: externally-authored logic with read/modify access
/// to the programme under test. Registered through
/// [`CompileOptions`](super::compiler::CompileOptions); never compiled from
/// source at runtime.
#[derive(Clone)]
pub struct EvalPredicate(pub Arc<dyn Fn(&mut Programme) -> bool + Send + Sync>);

impl fmt::Debug for EvalPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EvalPredicate(..)")
    }
}

/// How a field test inspects the field's occurrences.
#[derive(Debug, Clone)]
pub enum FieldMatcher {
    /// Field has at least one occurrence, empty text included.
    Present,
    /// At least one occurrence text matches. The empty pattern matches every
    /// occurrence, empty text included.
    Pattern(Regex),
}

/// A test evaluated against each programme.
#[derive(Debug, Clone)]
pub enum ProgrammeTest {
    Field {
        field: &'static str,
        matcher: FieldMatcher,
    },
    /// Whole-record match against the canonical rendering (legacy bare form).
    BarePattern(Regex),
    /// Programme's channel reference equals the given id exactly.
    ChannelId(String),
    /// Programme's channel reference is in the index set for this pattern.
    ChannelName(String),
    OnAfter(Timestamp),
    OnBefore(Timestamp),
    Eval(EvalPredicate),
}

/// A test evaluated against each channel. Only channel-referencing options
/// produce these; every other test leaves the channel domain alone.
#[derive(Debug, Clone)]
pub enum ChannelTest {
    Id(String),
    Name(String),
}

/// A test plus its negation flag.
#[derive(Debug, Clone)]
pub struct Signed<T> {
    pub test: T,
    pub negated: bool,
}

impl ProgrammeTest {
    /// Evaluate against one programme. Mutable access exists solely for the
    /// eval escape hatch; built-in tests only read.
    pub fn matches(
        &self,
        prog: &mut Programme,
        index: &ChannelNameIndex,
        diagnostics: &mut Diagnostics,
    ) -> bool {
        match self {
            ProgrammeTest::Field { field, matcher } => {
                let occurrences = prog.occurrences(field);
                match matcher {
                    FieldMatcher::Present => !occurrences.is_empty(),
                    FieldMatcher::Pattern(re) => occurrences.iter().any(|text| re.is_match(text)),
                }
            }
            ProgrammeTest::BarePattern(re) => re.is_match(&prog.to_string()),
            ProgrammeTest::ChannelId(id) => prog.channel == *id,
            ProgrammeTest::ChannelName(pattern) => index.contains(pattern, &prog.channel),
            ProgrammeTest::OnAfter(cutoff) => on_after(prog, *cutoff, diagnostics),
            ProgrammeTest::OnBefore(cutoff) => on_before(prog, *cutoff, diagnostics),
            ProgrammeTest::Eval(predicate) => (predicate.0)(prog),
        }
    }
}

impl ChannelTest {
    pub fn matches(&self, channel: &Channel, index: &ChannelNameIndex) -> bool {
        match self {
            ChannelTest::Id(id) => channel.id == *id,
            ChannelTest::Name(pattern) => index.contains(pattern, &channel.id),
        }
    }
}

/// A programme is "on after" the cutoff when it is still airing or yet to air
/// at that instant. It airs over `[start, stop)`, so the comparison against a
/// known stop time is strict. Without a stop time the start time stands in,
/// which systematically drops programmes that were actually still airing; the
/// first time that happens on a channel an advisory is recorded.
fn on_after(prog: &Programme, cutoff: Timestamp, diagnostics: &mut Diagnostics) -> bool {
    match &prog.stop {
        Some(raw) => match clock::normalize(raw) {
            Ok(stop) => stop > cutoff,
            Err(_) => {
                diagnostics.warn_bad_timestamp(&prog.channel, raw);
                false
            }
        },
        None => match clock::normalize(&prog.start) {
            Ok(start) => {
                let keep = start > cutoff;
                if !keep {
                    diagnostics.warn_missing_stop(&prog.channel);
                }
                keep
            }
            Err(_) => {
                diagnostics.warn_bad_timestamp(&prog.channel, &prog.start);
                false
            }
        },
    }
}

/// A programme is "on before" the cutoff when it has started by then,
/// regardless of whether it is still airing. Start times are mandatory, so no
/// fallback applies.
fn on_before(prog: &Programme, cutoff: Timestamp, diagnostics: &mut Diagnostics) -> bool {
    match clock::normalize(&prog.start) {
        Ok(start) => start <= cutoff,
        Err(_) => {
            diagnostics.warn_bad_timestamp(&prog.channel, &prog.start);
            false
        }
    }
}

/// Advisory diagnostics gathered during one filtering run.
///
/// Data anomalies are not fatal: filtering proceeds under the documented
/// fallback rules and the collected messages are reported afterwards. Each
/// advisory fires once per key so ten stop-less programmes on one channel
/// produce one line, not ten.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<String>,
    seen: HashSet<String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    fn warn_once(&mut self, key: String, message: String) {
        if self.seen.insert(key) {
            self.warnings.push(message);
        }
    }

    /// First missing-stop fallback exclusion on a channel.
    pub fn warn_missing_stop(&mut self, channel: &str) {
        self.warn_once(
            format!("missing-stop:{}", channel),
            format!(
                "programmes on channel '{}' have no stop time; --on-after may drop \
                 programmes that were still airing. A sort pass that fills in stop \
                 times would give exact results.",
                channel
            ),
        );
    }

    /// First unparseable start/stop timestamp on a channel.
    pub fn warn_bad_timestamp(&mut self, channel: &str, raw: &str) {
        self.warn_once(
            format!("bad-timestamp:{}", channel),
            format!(
                "channel '{}' has an unparseable timestamp '{}'; affected time tests \
                 treat the programme as not matching",
                channel, raw
            ),
        );
    }
}
