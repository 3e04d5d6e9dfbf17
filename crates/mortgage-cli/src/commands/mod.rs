pub mod amortization;
pub mod refinance;
pub mod scenarios;
pub mod underwriting;
