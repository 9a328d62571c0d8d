use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    boot::{self, BootArgs},
    lookup::{self, LookupArgs},
    subduce::{self, SubduceArgs},
};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "corr-sim", about = "Correlator subduction and bootstrap CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Subduce raw correlators into lattice irreps.
    Subduce(SubduceArgs),
    /// Bin and bootstrap subduced (and optionally raw) correlators.
    Boot(BootArgs),
    /// Print the GEVP blocks of one total momentum as JSON.
    Lookup(LookupArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    match cli.command {
        Command::Subduce(args) => subduce::run(&args),
        Command::Boot(args) => boot::run(&args),
        Command::Lookup(args) => lookup::run(&args),
    }
}
