use std::path::PathBuf;

use clap::Args;
use seqfeat_stats::distribution::Distribution;

use crate::{
    schema::report::ChannelWeights,
    util::{self, Output},
};

#[derive(Debug, Clone, Args)]
pub(crate) struct CalculateArg {
    /// Path to the distribution JSON file
    distribution: PathBuf,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &CalculateArg) -> anyhow::Result<()> {
    let distribution: Distribution = util::read_json_file("distribution", &arg.distribution)?;
    tracing::debug!(
        name = distribution.name(),
        vectors = distribution.vectors().len(),
        dimensions = distribution.dimensions(),
        "loaded distribution"
    );
    let weights = ChannelWeights::from_distribution(&distribution);
    Output::save_json(&weights, arg.output.as_deref())
}
