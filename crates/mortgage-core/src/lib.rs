pub mod amortization;
pub mod config;
pub mod engine;
pub mod error;
pub mod time_value;
pub mod types;
pub mod underwriting;

#[cfg(feature = "refinance")]
pub mod refinance;

#[cfg(feature = "scenarios")]
pub mod scenarios;

pub use config::UnderwritingPolicy;
pub use engine::MortgageEngine;
pub use error::MortgageError;
pub use types::*;

/// Standard result type for all mortgage operations
pub type MortgageResult<T> = Result<T, MortgageError>;
