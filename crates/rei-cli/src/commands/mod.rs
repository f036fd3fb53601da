pub mod exchange;
pub mod lending;
pub mod monte_carlo;
pub mod partnership;
pub mod solver;
