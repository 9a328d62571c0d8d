use std::error::Error;

use clap::Args;
use corr_sim::bootstrap_momentum;

use super::StageArgs;

#[derive(Args, Debug)]
pub struct BootArgs {
    #[command(flatten)]
    pub stage: StageArgs,
    /// Override the configured number of bootstrap samples.
    #[arg(long)]
    pub boot_size: Option<usize>,
}

pub fn run(args: &BootArgs) -> Result<(), Box<dyn Error>> {
    let (mut config, store, momenta) = args.stage.load()?;
    if let Some(boot_size) = args.boot_size {
        config.bootstrap.boot_size = boot_size;
        config.bootstrap.validate()?;
    }
    for p in momenta {
        let report = bootstrap_momentum(&config, p, &store).map_err(|err| {
            log::error!("bootstrap failed for p = {p}: {err}");
            err
        })?;
        println!(
            "p = {}: {} bootstrapped correlators, manifest {}",
            report.p_total,
            report.correlators,
            report.manifest.display()
        );
    }
    Ok(())
}
