use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use seqfeat_stats::distribution::Distribution;

use crate::{
    schema::report::{ChannelWeights, DifferenceReport},
    util::{self, Output},
};

#[derive(Debug, Clone, Args)]
pub(crate) struct CompareArg {
    /// Path to the base distribution JSON file
    base: PathBuf,
    /// Path to the distribution JSON file compared against the base
    other: PathBuf,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &CompareArg) -> anyhow::Result<()> {
    let base: Distribution = util::read_json_file("distribution", &arg.base)?;
    let other: Distribution = util::read_json_file("distribution", &arg.other)?;

    let difference = base.difference(&other).with_context(|| {
        format!(
            "Cannot compare {} with {}",
            arg.base.display(),
            arg.other.display()
        )
    })?;

    let report = DifferenceReport {
        base: ChannelWeights::from_distribution(&base),
        other: ChannelWeights::from_distribution(&other),
        difference,
    };
    Output::save_json(&report, arg.output.as_deref())
}
