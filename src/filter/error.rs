use crate::clock::ClockError;
use thiserror::Error;

/// Configuration errors raised while compiling a test expression.
///
/// All of these are fatal and are reported before any record is read.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("ambiguous option '--{given}': could be {candidates}")]
    AmbiguousOption { given: String, candidates: String },

    #[error("unknown option '--{0}'")]
    UnknownOption(String),

    #[error("option '--{option}' requires {expected} argument")]
    MissingArgument {
        option: &'static str,
        expected: &'static str,
    },

    #[error(
        "option '--{option}' takes only an empty string argument (got '{given}'): \
         this field can be tested for presence, not matched by pattern"
    )]
    NotQueryable { option: &'static str, given: String },

    #[error("nothing to the left of --or")]
    NothingBeforeOr,

    #[error("nothing to the right of --or")]
    NothingAfterOr,

    #[error("--not must be followed by a test")]
    DanglingNot,

    #[error("cannot combine a bare pattern with test options")]
    MixedBareAndTests,

    #[error("unexpected argument '{0}'")]
    UnexpectedArgument(String),

    #[error("no tests given: supply at least one test option or a bare pattern")]
    EmptyExpression,

    #[error("invalid regular expression '{pattern}': {source}")]
    BadPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid date '{raw}' for --{option}: {source}")]
    BadCutoff {
        option: &'static str,
        raw: String,
        #[source]
        source: ClockError,
    },

    #[error("--eval tests are not available here")]
    EvalUnavailable,

    #[error("--eval predicate failed to compile: {0}")]
    EvalCompile(String),
}
