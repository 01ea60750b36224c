use super::error::FilterError;

/// What a test option expects after its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// No argument; the test is "field present with any value".
    None,
    /// A regular expression matched against the field's occurrence texts.
    Regexp,
    /// Literally the empty string; anything else is a configuration error.
    /// Reserved so the option can grow content matching later.
    EmptyMarker,
    /// A channel identifier, compared for exact equality.
    ChannelId,
    /// A timestamp, normalized at compile time.
    Date,
    /// Externally-authored predicate source for the escape hatch.
    Code,
}

impl ArgKind {
    /// Human description used in missing-argument errors.
    pub fn describe(&self) -> &'static str {
        match self {
            ArgKind::None => "no",
            ArgKind::Regexp => "a regular expression",
            ArgKind::EmptyMarker => "an empty string ('')",
            ArgKind::ChannelId => "a channel id",
            ArgKind::Date => "a date",
            ArgKind::Code => "a predicate",
        }
    }
}

/// What the compiler does with a resolved option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    And,
    Or,
    Not,
    /// A test over the named content field of each programme.
    Field(&'static str),
    ChannelId,
    ChannelName,
    OnAfter,
    OnBefore,
    Eval,
}

/// One registered test or operator option.
#[derive(Debug)]
pub struct TestSpec {
    pub name: &'static str,
    pub arg: ArgKind,
    pub target: Target,
}

const fn field(name: &'static str, arg: ArgKind) -> TestSpec {
    TestSpec {
        name,
        arg,
        target: Target::Field(name),
    }
}

const fn op(name: &'static str, target: Target) -> TestSpec {
    TestSpec {
        name,
        arg: ArgKind::None,
        target,
    }
}

/// Every option the expression compiler understands. Operators live in the
/// same table so prefix resolution treats them like any other long option.
pub const CATALOG: &[TestSpec] = &[
    op("and", Target::And),
    op("or", Target::Or),
    op("not", Target::Not),
    field("title", ArgKind::Regexp),
    field("sub-title", ArgKind::Regexp),
    field("desc", ArgKind::Regexp),
    field("category", ArgKind::Regexp),
    field("language", ArgKind::Regexp),
    field("orig-language", ArgKind::Regexp),
    field("country", ArgKind::Regexp),
    field("url", ArgKind::Regexp),
    field("episode-num", ArgKind::Regexp),
    field("premiere", ArgKind::Regexp),
    field("last-chance", ArgKind::Regexp),
    field("new", ArgKind::None),
    field("previously-shown", ArgKind::None),
    field("video", ArgKind::EmptyMarker),
    field("audio", ArgKind::EmptyMarker),
    field("subtitles", ArgKind::EmptyMarker),
    field("stop", ArgKind::EmptyMarker),
    TestSpec {
        name: "channel-id",
        arg: ArgKind::ChannelId,
        target: Target::ChannelId,
    },
    TestSpec {
        name: "channel-name",
        arg: ArgKind::Regexp,
        target: Target::ChannelName,
    },
    TestSpec {
        name: "on-after",
        arg: ArgKind::Date,
        target: Target::OnAfter,
    },
    TestSpec {
        name: "on-before",
        arg: ArgKind::Date,
        target: Target::OnBefore,
    },
    TestSpec {
        name: "eval",
        arg: ArgKind::Code,
        target: Target::Eval,
    },
];

/// Resolve a long-option name against the catalog.
///
/// An exact match wins immediately; otherwise the name must be a prefix of
/// exactly one catalog entry. Two or more prefix matches are reported as
/// ambiguous, naming every candidate.
pub fn resolve(name: &str) -> Result<&'static TestSpec, FilterError> {
    if let Some(spec) = CATALOG.iter().find(|spec| spec.name == name) {
        return Ok(spec);
    }

    let matches: Vec<&'static TestSpec> = CATALOG
        .iter()
        .filter(|spec| spec.name.starts_with(name))
        .collect();

    match matches.as_slice() {
        [] => Err(FilterError::UnknownOption(name.to_string())),
        [spec] => Ok(spec),
        _ => Err(FilterError::AmbiguousOption {
            given: name.to_string(),
            candidates: matches
                .iter()
                .map(|spec| format!("--{}", spec.name))
                .collect::<Vec<_>>()
                .join(", "),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_wins_over_prefix() {
        // "or" also prefixes "orig-language", but the exact entry wins
        assert_eq!(resolve("or").unwrap().name, "or");
        assert_eq!(resolve("new").unwrap().name, "new");
    }

    #[test]
    fn test_unambiguous_prefix_resolves() {
        assert_eq!(resolve("tit").unwrap().name, "title");
        assert_eq!(resolve("on-a").unwrap().name, "on-after");
        assert_eq!(resolve("channel-n").unwrap().name, "channel-name");
    }

    #[test]
    fn test_shared_prefix_is_ambiguous() {
        let err = resolve("channel-").unwrap_err();
        match err {
            FilterError::AmbiguousOption { given, candidates } => {
                assert_eq!(given, "channel-");
                assert!(candidates.contains("--channel-id"));
                assert!(candidates.contains("--channel-name"));
            }
            other => panic!("expected ambiguity, got {:?}", other),
        }

        // sub-title, subtitles and stop all begin with "s"
        assert!(matches!(
            resolve("s"),
            Err(FilterError::AmbiguousOption { .. })
        ));
    }

    #[test]
    fn test_unknown_option() {
        assert!(matches!(
            resolve("frobnicate"),
            Err(FilterError::UnknownOption(_))
        ));
    }
}
