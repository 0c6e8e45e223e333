use clap::Args;
use serde_json::{json, Value};

use realty_core::amortization::{self, LoanParameters};

use crate::input;
use crate::output::currency::format_inr_f64;

/// Arguments for the EMI calculator
#[derive(Args)]
pub struct EmiArgs {
    /// Loan amount in rupees [default: 5000000]
    #[arg(long, alias = "amount")]
    pub principal: Option<f64>,

    /// Annual interest rate in percent, e.g. 8.5 [default: 8.5]
    #[arg(long, alias = "interest-rate")]
    pub rate: Option<f64>,

    /// Loan tenure in years [default: 20]
    #[arg(long, alias = "years")]
    pub tenure: Option<f64>,

    /// Include the month-by-month amortization schedule
    #[arg(long)]
    pub schedule: bool,

    /// With --schedule, show yearly totals instead of monthly rows
    #[arg(long, requires = "schedule")]
    pub yearly: bool,

    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_emi(args: EmiArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params = match input::from_file_or_stdin::<LoanParameters>(args.input.as_deref())? {
        Some(params) => params,
        None => {
            let defaults = LoanParameters::default();
            LoanParameters {
                principal: args.principal.unwrap_or(defaults.principal),
                annual_rate_percent: args.rate.unwrap_or(defaults.annual_rate_percent),
                tenure_years: args.tenure.unwrap_or(defaults.tenure_years),
            }
        }
    };

    tracing::debug!(
        principal = params.principal,
        rate = params.annual_rate_percent,
        tenure = params.tenure_years,
        schedule = args.schedule,
        "computing EMI"
    );

    if !args.schedule {
        let output = amortization::calculate_emi(&params)?;
        let formatted = formatted_totals(&output.result);
        let mut value = serde_json::to_value(output)?;
        value["formatted"] = formatted;
        return Ok(value);
    }

    let output = amortization::amortization_schedule(&params)?;
    let formatted = formatted_totals(&output.result.summary);
    let rows = if args.yearly {
        serde_json::to_value(&output.result.yearly)?
    } else {
        serde_json::to_value(&output.result.rows)?
    };
    tracing::debug!(months = output.result.rows.len(), "built amortization schedule");

    let mut value = serde_json::to_value(output)?;
    value["formatted"] = formatted;
    value["results"] = rows;
    Ok(value)
}

fn formatted_totals(result: &amortization::AmortizationResult) -> Value {
    json!({
        "monthly_installment": format_inr_f64(result.monthly_installment),
        "total_interest": format_inr_f64(result.total_interest),
        "total_payable": format_inr_f64(result.total_payable),
        "installments": result.installments,
    })
}
