//! Test expression compilation and record filtering
//!
//! A listings filter is a find(1)-style boolean expression over named tests,
//! compiled into a disjunctive-normal-form plan and applied independently to
//! every programme and every channel.
//!
//! # Syntax
//!
//! ```text
//! --title PATTERN          Field test: some occurrence matches the pattern
//! --new                    Presence test: field present with any value
//! --video ''               Presence test for fields not queryable by content
//! --channel-id ID          Exact channel match, in both domains
//! --channel-name PATTERN   Display-name match, in both domains
//! --on-after DATE          Still airing or yet to air at DATE
//! --on-before DATE         Started by DATE
//! --not TEST               Negate the next test
//! TEST TEST                Implicit AND (also spelled --and)
//! TEST --or TEST           OR; binds looser than AND
//! PATTERN                  Legacy bare form: whole-record match
//! ```
//!
//! Long options resolve by unambiguous prefix: `--tit News` works, while
//! `--channel- x` is rejected naming both candidates.
//!
//! # Examples
//!
//! ```text
//! --title Simpsons                         Programmes titled like "Simpsons"
//! --channel-name BBC --not --category Film Non-film programmes on BBC channels
//! --on-after 20260830 --on-before 20260830 Airing at that instant
//! --stop '' --or --new                     Has a stop time, or is flagged new
//! ```

pub mod catalog;
pub mod compiler;
pub mod engine;
pub mod error;
pub mod index;
pub mod predicate;

pub use compiler::{CompileOptions, EvalFactory, TestPlan, compile};
pub use engine::{ClumpGroups, FilterEngine};
pub use error::FilterError;
pub use index::{ChannelNameIndex, IndexError};
pub use predicate::{Diagnostics, EvalPredicate};
