pub mod emi;
pub mod schedule;

pub use emi::{calculate_emi, compute_emi, AmortizationResult, LoanParameters};
pub use schedule::{amortization_schedule, AmortizationSchedule, ScheduleRow, YearSummary};
