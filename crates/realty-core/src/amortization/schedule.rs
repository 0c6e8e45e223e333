use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::emi::{compute_emi, AmortizationResult, LoanParameters};
use crate::error::RealtyError;
use crate::types::{with_metadata, ComputationOutput, PRECISION_F64};
use crate::RealtyResult;

/// Longest schedule we will materialise (100 years of monthly rows).
const MAX_SCHEDULE_MONTHS: f64 = 1_200.0;

/// One month of a reducing-balance repayment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub month: u32,
    pub opening_balance: f64,
    pub installment: f64,
    pub interest: f64,
    pub principal: f64,
    pub closing_balance: f64,
}

/// Twelve-month rollup of the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearSummary {
    pub year: u32,
    pub interest_paid: f64,
    pub principal_paid: f64,
    pub closing_balance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub summary: AmortizationResult,
    pub rows: Vec<ScheduleRow>,
    pub yearly: Vec<YearSummary>,
}

/// Month-by-month interest/principal breakdown.
///
/// Each month pays interest on the opening balance and the rest of the EMI
/// goes to principal. The final row settles whatever balance is left, so the
/// schedule always closes at exactly zero; with a fractional installment
/// count that row also covers the part-month.
pub fn amortization_schedule(
    params: &LoanParameters,
) -> RealtyResult<ComputationOutput<AmortizationSchedule>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let summary = compute_emi(
        params.principal,
        params.annual_rate_percent,
        params.tenure_years,
    )?;

    if summary.installments > MAX_SCHEDULE_MONTHS {
        return Err(RealtyError::invalid_input(
            "tenure_years",
            format!(
                "schedule limited to {} months, requested {}",
                MAX_SCHEDULE_MONTHS, summary.installments
            ),
        ));
    }

    let months = summary.installments.ceil() as u32;
    if summary.installments.fract() != 0.0 {
        warnings.push(format!(
            "Final installment (month {months}) settles a part-month balance"
        ));
    }

    let rows = build_rows(params.principal, &summary, months);
    let yearly = roll_up_years(&rows);

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Reducing-balance amortization schedule",
        params,
        warnings,
        elapsed,
        PRECISION_F64,
        AmortizationSchedule {
            summary,
            rows,
            yearly,
        },
    ))
}

fn build_rows(principal: f64, summary: &AmortizationResult, months: u32) -> Vec<ScheduleRow> {
    let r = summary.monthly_rate;
    let emi = summary.monthly_installment;
    let mut balance = principal;
    let mut rows = Vec::with_capacity(months as usize);

    for month in 1..=months {
        let opening_balance = balance;
        let interest = opening_balance * r;
        let principal_part = if month == months {
            opening_balance
        } else {
            (emi - interest).min(opening_balance)
        };
        balance = opening_balance - principal_part;

        rows.push(ScheduleRow {
            month,
            opening_balance,
            installment: interest + principal_part,
            interest,
            principal: principal_part,
            closing_balance: balance,
        });
    }

    rows
}

fn roll_up_years(rows: &[ScheduleRow]) -> Vec<YearSummary> {
    rows.chunks(12)
        .enumerate()
        .map(|(i, chunk)| YearSummary {
            year: i as u32 + 1,
            interest_paid: chunk.iter().map(|r| r.interest).sum(),
            principal_paid: chunk.iter().map(|r| r.principal).sum(),
            closing_balance: chunk.last().map(|r| r.closing_balance).unwrap_or_default(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_reference_loan() {
        let out = amortization_schedule(&LoanParameters::default()).unwrap();
        let schedule = out.result;

        assert_eq!(schedule.rows.len(), 240);
        assert_eq!(schedule.yearly.len(), 20);
        assert!(out.warnings.is_empty());

        let first = schedule.rows[0];
        assert_eq!(first.month, 1);
        assert_eq!(first.opening_balance, 5_000_000.0);
        assert!((first.interest - 5_000_000.0 * 8.5 / 1200.0).abs() < 1e-6);

        let last = schedule.rows[239];
        assert_eq!(last.closing_balance, 0.0);
        assert!((last.installment - schedule.summary.monthly_installment).abs() < 0.01);
    }

    #[test]
    fn test_schedule_sums_match_totals() {
        let params = LoanParameters::new(2_400_000.0, 9.0, 10.0);
        let schedule = amortization_schedule(&params).unwrap().result;

        let principal_sum: f64 = schedule.rows.iter().map(|r| r.principal).sum();
        let interest_sum: f64 = schedule.rows.iter().map(|r| r.interest).sum();

        assert!((principal_sum - 2_400_000.0).abs() < 1e-4);
        assert!((interest_sum - schedule.summary.total_interest).abs() < 0.01);
    }

    #[test]
    fn test_schedule_balance_is_non_increasing() {
        let schedule = amortization_schedule(&LoanParameters::new(750_000.0, 11.0, 5.0))
            .unwrap()
            .result;
        for pair in schedule.rows.windows(2) {
            assert!(pair[1].opening_balance <= pair[0].opening_balance);
            assert_eq!(pair[1].opening_balance, pair[0].closing_balance);
        }
    }

    #[test]
    fn test_schedule_yearly_rollup() {
        let schedule = amortization_schedule(&LoanParameters::new(1_000_000.0, 10.0, 3.0))
            .unwrap()
            .result;
        assert_eq!(schedule.yearly.len(), 3);
        let year_one_interest: f64 = schedule.rows[..12].iter().map(|r| r.interest).sum();
        assert!((schedule.yearly[0].interest_paid - year_one_interest).abs() < 1e-9);
        assert_eq!(schedule.yearly[2].closing_balance, 0.0);
        // Interest share falls as the balance amortises
        assert!(schedule.yearly[0].interest_paid > schedule.yearly[2].interest_paid);
    }

    #[test]
    fn test_schedule_fractional_tenure_adds_final_row() {
        let out = amortization_schedule(&LoanParameters::new(100_000.0, 12.0, 1.05)).unwrap();
        assert_eq!(out.result.rows.len(), 13);
        assert_eq!(out.result.yearly.len(), 2);
        assert_eq!(out.result.rows[12].closing_balance, 0.0);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_schedule_rejects_excessive_tenure() {
        let err = amortization_schedule(&LoanParameters::new(100_000.0, 8.0, 150.0)).unwrap_err();
        match err {
            RealtyError::InvalidInput { field, .. } => assert_eq!(field, "tenure_years"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_schedule_propagates_validation() {
        assert!(amortization_schedule(&LoanParameters::new(0.0, 8.0, 10.0)).is_err());
    }
}
