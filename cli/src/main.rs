//! Tools for running the curb segment resolver offline. These are bundled as a single executable.

#[macro_use]
extern crate log;

mod resolve;

use anyhow::Result;
use structopt::StructOpt;

use curb_model::ResolverConfig;

#[derive(StructOpt)]
#[structopt(name = "curbcli", about = "Resolves curb segments and the rules along them")]
enum Command {
    /// Runs one full pass over the input feeds, writing the resolved segments as JSON
    Resolve {
        #[structopt(flatten)]
        job: resolve::Job,
    },
    /// Print the default resolver config as JSON, to use as a starting point for `--config`
    DefaultConfig,
}

fn main() -> Result<()> {
    let cmd = Command::from_args();

    // Printing the config shouldn't be mixed up with logs
    if !matches!(cmd, Command::DefaultConfig) {
        abstutil::logger::setup();
    }

    // Short implementations can stay in this file, but larger subcommands get their own module.
    match cmd {
        Command::Resolve { job } => job.run()?,
        Command::DefaultConfig => {
            println!("{}", abstio::to_json(&ResolverConfig::default())?);
        }
    }
    Ok(())
}
