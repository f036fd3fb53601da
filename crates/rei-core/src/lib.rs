pub mod error;
pub mod solver;
pub mod types;

#[cfg(feature = "monte_carlo")]
pub mod monte_carlo;

#[cfg(feature = "lending")]
pub mod lending;

#[cfg(feature = "exchange")]
pub mod exchange;

#[cfg(feature = "partnership")]
pub mod partnership;

pub use error::ReiError;
pub use types::*;

/// Standard result type for all rei-core operations
pub type ReiResult<T> = Result<T, ReiError>;
