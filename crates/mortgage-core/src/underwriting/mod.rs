pub mod ratios;

#[cfg(feature = "affordability")]
pub mod affordability;
