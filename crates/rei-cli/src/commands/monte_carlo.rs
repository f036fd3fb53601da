use clap::Args;
use serde_json::Value;

use rei_core::monte_carlo::simulation::{self, SimulationInput};

use crate::input;

/// Arguments for the Monte Carlo rental simulation
#[derive(Args)]
pub struct SimulateArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Override the number of trials from the input file
    #[arg(long)]
    pub simulations: Option<u32>,

    /// Override the random seed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn run_simulate(args: SimulateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut sim_input: SimulationInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required for simulation".into());
    };

    if let Some(n) = args.simulations {
        sim_input.simulation_settings.num_simulations = n;
    }
    if let Some(seed) = args.seed {
        sim_input.simulation_settings.random_seed = Some(seed);
    }

    let result = simulation::run_simulation(&sim_input)?;
    Ok(serde_json::to_value(result)?)
}
