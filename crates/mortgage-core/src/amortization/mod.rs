pub mod equity;
pub mod payment;
pub mod schedule;

pub use equity::equity_buildup;
pub use payment::{monthly_payment, LoanTerms};
pub use schedule::{generate_schedule, total_interest, PaymentRecord};
