use std::path::PathBuf;

use clap::Args;
use corr_core::config::{load_config, AnalysisConfig};
use corr_core::errors::CorrError;
use corr_store::{DataStore, Layout};

pub mod boot;
pub mod lookup;
pub mod subduce;

/// Arguments shared by the batch stages.
#[derive(Args, Debug)]
pub struct StageArgs {
    /// YAML configuration of the analysis.
    #[arg(long)]
    pub config: PathBuf,
    /// Process only this squared total momentum instead of the configured list.
    #[arg(long)]
    pub p: Option<i32>,
}

impl StageArgs {
    pub fn load(&self) -> Result<(AnalysisConfig, DataStore, Vec<i32>), CorrError> {
        let config = load_config(&self.config)?;
        let store = DataStore::new(Layout::new(&config.paths, config.diagram.clone()));
        let momenta = match self.p {
            Some(p) => vec![p],
            None => config.momenta.clone(),
        };
        Ok((config, store, momenta))
    }
}
