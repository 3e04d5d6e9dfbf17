pub mod analysis;

pub use analysis::{analyze_refinance, RefinanceAnalysis, RefinanceInput, RefinanceRecommendation};
