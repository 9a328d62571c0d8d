use std::error::Error;

use clap::Args;
use corr_core::momentum::GevpBlock;
use corr_subduce::{admissible_pairs, gevp_blocks};
use serde::Serialize;

#[derive(Args, Debug)]
pub struct LookupArgs {
    /// Squared total momentum.
    #[arg(long)]
    pub p: i32,
    /// Cutoff on the squared single-particle momenta.
    #[arg(long, default_value_t = 4)]
    pub p_max: i32,
}

#[derive(Debug, Serialize)]
struct LookupReport {
    p_total: i32,
    p_max: i32,
    combinations: usize,
    blocks: Vec<GevpBlock>,
}

pub fn run(args: &LookupArgs) -> Result<(), Box<dyn Error>> {
    if args.p < 0 || args.p_max < 0 {
        return Err("squared momenta must be non-negative".into());
    }
    let report = LookupReport {
        p_total: args.p,
        p_max: args.p_max,
        combinations: admissible_pairs(args.p, args.p_max).len(),
        blocks: gevp_blocks(args.p, args.p_max),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
