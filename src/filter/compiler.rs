use super::catalog::{self, ArgKind, Target};
use super::error::FilterError;
use super::index::ChannelNameIndex;
use super::predicate::{
    ChannelTest, Diagnostics, EvalPredicate, FieldMatcher, ProgrammeTest, Signed,
};
use crate::clock;
use crate::document::{Channel, Programme};
use regex::{Regex, RegexBuilder};
use std::mem;
use std::sync::Arc;

/// Factory for escape-hatch predicates: given the option's argument, produce
/// a predicate or explain why it does not compile. Hosts that disallow
/// externally-authored predicates simply register none.
pub type EvalFactory = dyn Fn(&str) -> Result<EvalPredicate, String> + Send + Sync;

/// Knobs the expression compiler takes from the outside world.
#[derive(Clone, Default)]
pub struct CompileOptions {
    /// Applied uniformly to every regexp-bearing test and the bare pattern.
    pub ignore_case: bool,
    /// Escape-hatch capability; `None` makes `--eval` a configuration error.
    pub eval: Option<Arc<EvalFactory>>,
}

/// A compiled expression: a disjunction of conjunctions of signed tests, kept
/// separately for the programme and channel domains.
///
/// The two domains are structurally parallel: conjunction `i` on the channel
/// side holds exactly the channel-referencing tests of programme conjunction
/// `i`, and may be empty when that conjunction had none. The engine treats an
/// all-empty channel side as "keep every channel".
#[derive(Debug)]
pub struct TestPlan {
    programme: Vec<Vec<Signed<ProgrammeTest>>>,
    channel: Vec<Vec<Signed<ChannelTest>>>,
    channel_name_patterns: Vec<(String, Regex)>,
}

impl TestPlan {
    /// Distinct channel-name patterns referenced by the expression, compiled
    /// under the run's case flag. Input for [`ChannelNameIndex::build`].
    pub fn channel_name_patterns(&self) -> &[(String, Regex)] {
        &self.channel_name_patterns
    }

    /// Whether any conjunction constrains the channel domain at all.
    pub fn has_channel_tests(&self) -> bool {
        self.channel.iter().any(|conjunction| !conjunction.is_empty())
    }

    /// True iff at least one programme conjunction holds. Short-circuits on
    /// the first false test within a conjunction and stops at the first
    /// conjunction that holds.
    pub fn matches_programme(
        &self,
        prog: &mut Programme,
        index: &ChannelNameIndex,
        diagnostics: &mut Diagnostics,
    ) -> bool {
        for conjunction in &self.programme {
            let mut holds = true;
            for signed in conjunction {
                if signed.test.matches(prog, index, diagnostics) == signed.negated {
                    holds = false;
                    break;
                }
            }
            if holds {
                return true;
            }
        }
        false
    }

    /// True iff at least one channel conjunction holds. An empty conjunction
    /// is vacuously true: that disjunct put no constraint on channels, so its
    /// programmes may live anywhere. Callers gate on
    /// [`has_channel_tests`](Self::has_channel_tests) first.
    pub fn matches_channel(&self, channel: &Channel, index: &ChannelNameIndex) -> bool {
        for conjunction in &self.channel {
            if conjunction
                .iter()
                .all(|signed| signed.test.matches(channel, index) != signed.negated)
            {
                return true;
            }
        }
        false
    }
}

fn build_regex(pattern: &str, ignore_case: bool) -> Result<Regex, FilterError> {
    RegexBuilder::new(pattern)
        .case_insensitive(ignore_case)
        .build()
        .map_err(|e| FilterError::BadPattern {
            pattern: pattern.to_string(),
            source: e,
        })
}

/// Working registers of the expression state machine: the conjunctions being
/// accumulated in both domains, the pending-negation flag, and the disjuncts
/// committed so far.
#[derive(Default)]
struct Compiler {
    plan_programme: Vec<Vec<Signed<ProgrammeTest>>>,
    plan_channel: Vec<Vec<Signed<ChannelTest>>>,
    current_programme: Vec<Signed<ProgrammeTest>>,
    current_channel: Vec<Signed<ChannelTest>>,
    negate: bool,
    channel_name_patterns: Vec<(String, Regex)>,
}

impl Compiler {
    /// Append a programme-only test, consuming the pending negation.
    fn push(&mut self, test: ProgrammeTest) {
        let negated = mem::take(&mut self.negate);
        self.current_programme.push(Signed { test, negated });
    }

    /// Append a channel-referencing test to both domains in lockstep, so
    /// filtering programmes by channel criteria also filters the channel
    /// list consistently.
    fn push_pair(&mut self, prog: ProgrammeTest, chan: ChannelTest) {
        let negated = mem::take(&mut self.negate);
        self.current_programme.push(Signed {
            test: prog,
            negated,
        });
        self.current_channel.push(Signed {
            test: chan,
            negated,
        });
    }

    /// Commit the current conjunctions as one disjunct of the plan.
    fn commit(&mut self) {
        self.plan_programme.push(mem::take(&mut self.current_programme));
        self.plan_channel.push(mem::take(&mut self.current_channel));
    }

    fn record_channel_name_pattern(&mut self, text: &str, regex: Regex) {
        if !self.channel_name_patterns.iter().any(|(t, _)| t == text) {
            self.channel_name_patterns.push((text.to_string(), regex));
        }
    }
}

/// Compile an ordered token stream into a [`TestPlan`].
///
/// Tokens starting with `--` are resolved against the test catalog with
/// unambiguous-prefix rules; consecutive tests combine with implicit AND,
/// `--or` starts a new disjunct, `--not` negates the next test. A single
/// non-option token with no tests anywhere is the legacy bare-pattern form: a
/// whole-record match against the programme's canonical rendering.
///
/// All configuration errors surface here, before any record is touched.
pub fn compile(tokens: &[String], options: &CompileOptions) -> Result<TestPlan, FilterError> {
    let mut compiler = Compiler::default();
    let mut bare: Option<String> = None;

    let mut stream = tokens.iter();
    while let Some(token) = stream.next() {
        let Some(name) = token.strip_prefix("--") else {
            if compiler.negate {
                return Err(FilterError::DanglingNot);
            }
            if bare.is_some() {
                return Err(FilterError::UnexpectedArgument(token.clone()));
            }
            bare = Some(token.clone());
            continue;
        };

        let spec = catalog::resolve(name)?;
        match spec.target {
            // Implicit AND between consecutive tests makes the explicit
            // operator a no-op; a pending negation has nothing to bind to.
            Target::And => {
                if compiler.negate {
                    return Err(FilterError::DanglingNot);
                }
                continue;
            }
            Target::Not => {
                compiler.negate = !compiler.negate;
                continue;
            }
            Target::Or => {
                if compiler.negate {
                    return Err(FilterError::DanglingNot);
                }
                if compiler.current_programme.is_empty() {
                    return Err(FilterError::NothingBeforeOr);
                }
                compiler.commit();
                continue;
            }
            _ => {}
        }

        let argument = match spec.arg {
            ArgKind::None => None,
            _ => Some(stream.next().ok_or(FilterError::MissingArgument {
                option: spec.name,
                expected: spec.arg.describe(),
            })?),
        };

        match spec.target {
            Target::Field(field) => {
                let matcher = match spec.arg {
                    ArgKind::None => FieldMatcher::Present,
                    ArgKind::Regexp => {
                        let pattern = argument.expect("regexp tests take an argument");
                        FieldMatcher::Pattern(build_regex(pattern, options.ignore_case)?)
                    }
                    ArgKind::EmptyMarker => {
                        let given = argument.expect("empty-marker tests take an argument");
                        if !given.is_empty() {
                            return Err(FilterError::NotQueryable {
                                option: spec.name,
                                given: given.clone(),
                            });
                        }
                        FieldMatcher::Present
                    }
                    _ => unreachable!("field tests declare none/regexp/empty-marker arguments"),
                };
                compiler.push(ProgrammeTest::Field { field, matcher });
            }
            Target::ChannelId => {
                let id = argument.expect("channel-id takes an argument").clone();
                compiler.push_pair(
                    ProgrammeTest::ChannelId(id.clone()),
                    ChannelTest::Id(id),
                );
            }
            Target::ChannelName => {
                let pattern = argument.expect("channel-name takes an argument");
                let regex = build_regex(pattern, options.ignore_case)?;
                compiler.record_channel_name_pattern(pattern, regex);
                compiler.push_pair(
                    ProgrammeTest::ChannelName(pattern.clone()),
                    ChannelTest::Name(pattern.clone()),
                );
            }
            Target::OnAfter | Target::OnBefore => {
                let raw = argument.expect("time tests take an argument");
                let cutoff = clock::normalize(raw).map_err(|e| FilterError::BadCutoff {
                    option: spec.name,
                    raw: raw.clone(),
                    source: e,
                })?;
                compiler.push(match spec.target {
                    Target::OnAfter => ProgrammeTest::OnAfter(cutoff),
                    _ => ProgrammeTest::OnBefore(cutoff),
                });
            }
            Target::Eval => {
                let source = argument.expect("eval takes an argument");
                let factory = options.eval.as_ref().ok_or(FilterError::EvalUnavailable)?;
                let predicate = factory(source).map_err(FilterError::EvalCompile)?;
                compiler.push(ProgrammeTest::Eval(predicate));
            }
            Target::And | Target::Or | Target::Not => unreachable!("operators handled above"),
        }
    }

    if compiler.negate {
        return Err(FilterError::DanglingNot);
    }

    let has_tests =
        !compiler.plan_programme.is_empty() || !compiler.current_programme.is_empty();
    if let Some(pattern) = bare {
        if has_tests {
            return Err(FilterError::MixedBareAndTests);
        }
        let regex = build_regex(&pattern, options.ignore_case)?;
        compiler.push(ProgrammeTest::BarePattern(regex));
    }

    if !compiler.current_programme.is_empty() {
        compiler.commit();
    } else if !compiler.plan_programme.is_empty() {
        // tokens ended right after an --or
        return Err(FilterError::NothingAfterOr);
    }

    if compiler.plan_programme.is_empty() {
        return Err(FilterError::EmptyExpression);
    }

    Ok(TestPlan {
        programme: compiler.plan_programme,
        channel: compiler.plan_channel,
        channel_name_patterns: compiler.channel_name_patterns,
    })
}
