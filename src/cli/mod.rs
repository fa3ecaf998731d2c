// CLI module
// Command-line interface, argument parsing and the top-level run

mod args;
mod run;

pub use args::{CliArgs, StrategyType, TransferPolicyArg};
pub use run::run;

use clap::Parser;

/// Parse command-line arguments using clap
///
/// On invalid arguments or `--help`, clap prints the message and exits the
/// process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}
