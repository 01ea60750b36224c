use clap::Parser;
use std::path::PathBuf;

/// A tool to filter TV listings with a boolean test expression
///
/// The expression is given as trailing arguments, find(1)-style:
/// `tvgrep --input listings.json --title Simpsons --or --channel-name BBC`.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Match regular expressions case-insensitively
    #[arg(short = 'i', long)]
    pub ignore_case: bool,

    /// Listings file to read (standard input when omitted)
    #[arg(short = 'f', long)]
    pub input: Option<PathBuf>,

    /// Destination for the filtered listings (standard output when omitted)
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Test expression tokens (e.g. --title News --or --channel-name Sports).
    /// Handed verbatim to the expression compiler.
    #[arg(
        value_name = "EXPRESSION",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub expression: Vec<String>,
}

pub fn cli_parse() -> Cli {
    Cli::parse()
}
