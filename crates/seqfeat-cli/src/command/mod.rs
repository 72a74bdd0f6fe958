use clap::{Parser, Subcommand};

use self::{calculate::CalculateArg, compare::CompareArg, scan::ScanArg};

mod calculate;
mod compare;
mod scan;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Scan sequences for recurring sub-sequences
    Scan(#[clap(flatten)] ScanArg),
    /// Compute per-channel weights of a distribution file
    Calculate(#[clap(flatten)] CalculateArg),
    /// Compute the per-channel difference between two distribution files
    Compare(#[clap(flatten)] CompareArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Scan(arg) => scan::run(&arg)?,
        Mode::Calculate(arg) => calculate::run(&arg)?,
        Mode::Compare(arg) => compare::run(&arg)?,
    }
    Ok(())
}
