use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::RealtyError;
use crate::types::{with_metadata, ComputationOutput, Percent, PRECISION_F64};
use crate::RealtyResult;

const MONTHS_PER_YEAR: f64 = 12.0;

/// Loan inputs as collected by the EMI calculator form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanParameters {
    /// Amount borrowed, in rupees
    pub principal: f64,
    /// Annual interest rate in percent (8.5 = 8.5%)
    pub annual_rate_percent: Percent,
    /// Repayment period in years; converted to months without rounding
    pub tenure_years: f64,
}

impl Default for LoanParameters {
    /// The calculator's reset state: ₹50L at 8.5% over 20 years.
    fn default() -> Self {
        Self {
            principal: 5_000_000.0,
            annual_rate_percent: 8.5,
            tenure_years: 20.0,
        }
    }
}

impl LoanParameters {
    pub fn new(principal: f64, annual_rate_percent: Percent, tenure_years: f64) -> Self {
        Self {
            principal,
            annual_rate_percent,
            tenure_years,
        }
    }

    /// Checks every field is finite and strictly positive, in declaration order.
    pub fn validate(&self) -> RealtyResult<()> {
        require_positive("principal", self.principal)?;
        require_positive("annual_rate_percent", self.annual_rate_percent)?;
        require_positive("tenure_years", self.tenure_years)?;
        Ok(())
    }

    /// Fractional monthly rate.
    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate_percent / MONTHS_PER_YEAR / 100.0
    }

    /// Number of installments. Not rounded.
    pub fn installments(&self) -> f64 {
        self.tenure_years * MONTHS_PER_YEAR
    }
}

/// Fixed installment and totals for a reducing-balance loan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizationResult {
    pub monthly_installment: f64,
    pub total_payable: f64,
    pub total_interest: f64,
    pub installments: f64,
    pub monthly_rate: f64,
}

/// Equated Monthly Installment under reducing-balance amortization.
///
/// r = annual% / 12 / 100, n = years * 12
/// EMI = P * r * (1+r)^n / ((1+r)^n - 1)
///
/// Values are returned unrounded; rounding for display is the caller's job.
pub fn compute_emi(
    principal: f64,
    annual_rate_percent: Percent,
    tenure_years: f64,
) -> RealtyResult<AmortizationResult> {
    let params = LoanParameters::new(principal, annual_rate_percent, tenure_years);
    params.validate()?;

    let r = params.monthly_rate();
    let n = params.installments();

    let growth = (1.0 + r).powf(n);
    let denominator = growth - 1.0;

    if denominator == 0.0 {
        return Err(RealtyError::DegenerateLoan {
            context: format!(
                "(1 + r)^n - 1 evaluated to zero for r = {r:e}, n = {n}; \
                 the rate is too small to represent"
            ),
        });
    }

    let monthly_installment = principal * r * growth / denominator;
    if !monthly_installment.is_finite() {
        return Err(RealtyError::DegenerateLoan {
            context: format!("installment is not finite for r = {r:e}, n = {n}"),
        });
    }

    let total_payable = monthly_installment * n;
    let total_interest = total_payable - principal;

    Ok(AmortizationResult {
        monthly_installment,
        total_payable,
        total_interest,
        installments: n,
        monthly_rate: r,
    })
}

/// Compute the EMI and wrap it in the standard output envelope.
pub fn calculate_emi(
    params: &LoanParameters,
) -> RealtyResult<ComputationOutput<AmortizationResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let result = compute_emi(
        params.principal,
        params.annual_rate_percent,
        params.tenure_years,
    )?;

    if params.annual_rate_percent > 30.0 {
        warnings.push(format!(
            "Annual rate of {}% is far above typical home-loan rates; verify the input",
            params.annual_rate_percent
        ));
    }
    if params.tenure_years > 40.0 {
        warnings.push(format!(
            "Tenure of {} years exceeds the usual 30-40 year maximum",
            params.tenure_years
        ));
    }
    if params.tenure_years.fract() != 0.0 {
        warnings.push(format!(
            "Fractional tenure: {} installments is not a whole number of months",
            result.installments
        ));
    }
    if result.total_interest > 2.0 * params.principal {
        warnings.push(format!(
            "Total interest ({:.0}) exceeds twice the principal",
            result.total_interest
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Reducing-balance EMI: P*r*(1+r)^n / ((1+r)^n - 1)",
        params,
        warnings,
        elapsed,
        PRECISION_F64,
        result,
    ))
}

fn require_positive(field: &str, value: f64) -> RealtyResult<()> {
    if !value.is_finite() {
        return Err(RealtyError::invalid_input(field, "must be a finite number"));
    }
    if value <= 0.0 {
        return Err(RealtyError::invalid_input(
            field,
            format!("must be greater than zero, got {value}"),
        ));
    }
    Ok(())
}
