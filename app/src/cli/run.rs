use std::time::Duration;

use printer::Print;
use synth::{SynthConfig, SynthError, improve, stop};
use verify::ExhaustiveOracle;

use crate::scenarios;

#[derive(clap::Args)]
pub struct Args {
    /// Name of the scenario to run (see `qry list`)
    pub scenario: String,
    /// Give up after this many seconds
    #[clap(long, default_value_t = 10)]
    pub timeout: u64,
}

pub fn exec(args: Args) -> miette::Result<()> {
    let Some((job, builder, cost_model)) = scenarios::prepare(&args.scenario) else {
        return Err(miette::miette!(
            "unknown scenario `{}`; `qry list` shows the available ones",
            args.scenario
        ));
    };

    let oracle = ExhaustiveOracle::default();
    let stop = stop::deadline(Duration::from_secs(args.timeout));

    println!("target: {}", job.target.print_to_string(None));
    println!("cost:   {}", cost_model.cost(&job.target));

    let mut synth = improve(
        job,
        cost_model.as_ref(),
        builder.as_ref(),
        &oracle,
        &stop,
        SynthConfig::default(),
    )
    .map_err(miette::Report::new)?;

    loop {
        match synth.next_improvement() {
            Ok(Some(better)) => {
                println!(
                    "improved: {} (cost {})",
                    better.print_to_string(None),
                    cost_model.cost(&better)
                );
            }
            Ok(None) => {
                println!("converged.");
                return Ok(());
            }
            Err(SynthError::Stopped) => {
                println!("stopped: timeout after {}s.", args.timeout);
                return Ok(());
            }
            Err(err) => return Err(miette::Report::new(err)),
        }
    }
}
