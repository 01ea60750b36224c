pub mod cli;
pub mod clock;
pub mod document;
pub mod filter;

use anyhow::Context;
use colored::Colorize;

pub use cli::{Cli, cli_parse};
pub use document::{Channel, ClumpIdx, FieldValue, Listings, Programme, read_listings, write_listings};
pub use filter::{
    ChannelNameIndex, CompileOptions, Diagnostics, FilterEngine, FilterError, TestPlan, compile,
};

/// Run one filtering pass: compile the expression, read the listings, build
/// the channel-name index, filter, report advisories, write.
///
/// Configuration errors abort before any record is read; data anomalies are
/// collected during filtering and printed to stderr afterwards.
pub fn run() -> anyhow::Result<()> {
    let cli = cli_parse();

    let options = CompileOptions {
        ignore_case: cli.ignore_case,
        // No escape-hatch predicates in the standalone tool.
        eval: None,
    };
    let plan = compile(&cli.expression, &options).context("invalid test expression")?;

    let listings = read_listings(cli.input.as_deref())?;
    let index = ChannelNameIndex::build(plan.channel_name_patterns(), &listings.channels)?;

    let mut diagnostics = Diagnostics::new();
    let filtered = FilterEngine::new(&plan, &index).apply(listings, &mut diagnostics);

    for warning in diagnostics.warnings() {
        eprintln!("{} {}", "warning:".yellow().bold(), warning);
    }

    write_listings(&filtered, cli.output.as_deref())?;
    Ok(())
}
