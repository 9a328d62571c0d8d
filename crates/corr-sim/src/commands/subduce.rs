use std::error::Error;

use clap::Args;
use corr_sim::subduce_momentum;
use corr_subduce::TableProvider;

use super::StageArgs;

#[derive(Args, Debug)]
pub struct SubduceArgs {
    #[command(flatten)]
    pub stage: StageArgs,
}

pub fn run(args: &SubduceArgs) -> Result<(), Box<dyn Error>> {
    let (config, store, momenta) = args.stage.load()?;
    let provider = TableProvider::load(&config.paths.coefficients)?;
    for p in momenta {
        let report = subduce_momentum(&config, p, &provider, &store).map_err(|err| {
            log::error!("subduce failed for p = {p}: {err}");
            err
        })?;
        println!(
            "p = {}: {} subduced correlators, manifest {}",
            report.p_total,
            report.correlators,
            report.manifest.display()
        );
    }
    Ok(())
}
