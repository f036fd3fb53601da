//! Monte Carlo rental-investment simulator.
//!
//! Pipeline: [`rng::RandomSource`] → [`distributions`] → [`scenario`] →
//! [`cash_flow`] (once per trial) → [`stats`] → [`recommendations`],
//! orchestrated by [`simulation::run_simulation`].

pub mod cash_flow;
pub mod distributions;
pub mod recommendations;
pub mod rng;
pub mod scenario;
pub mod simulation;
pub mod stats;

pub use cash_flow::{InvestmentParameters, TrialResult};
pub use distributions::{DistributionKind, DistributionSpec};
pub use recommendations::{Priority, Recommendation};
pub use rng::RandomSource;
pub use scenario::{Scenario, VariableDistributions};
pub use simulation::{
    run_simulation, SimulationInput, SimulationOutput, SimulationSettings, TargetMetrics,
};
