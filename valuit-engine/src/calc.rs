//! Shared financial calculation primitives.
//!
//! Pure numeric helpers used across the valuation models: WACC via
//! CAPM, Gordon-growth terminal value, cash-flow discounting, the
//! enterprise-to-equity bridge, and margin/growth-rate series helpers.

use valuit_common::{Error, Result};

/// Weighted Average Cost of Capital.
///
/// Cost of equity comes from CAPM (`risk_free + beta × premium`); the
/// debt leg is tax-shielded.
pub fn wacc(
    risk_free_rate: f64,
    market_risk_premium: f64,
    beta: f64,
    cost_of_debt: f64,
    tax_rate: f64,
    debt_weight: f64,
    equity_weight: f64,
) -> f64 {
    let cost_of_equity = risk_free_rate + beta * market_risk_premium;
    equity_weight * cost_of_equity + debt_weight * cost_of_debt * (1.0 - tax_rate)
}

/// Terminal value via the perpetuity-growth (Gordon) model.
///
/// Fails with [`Error::InvalidParameter`] when the discount rate does
/// not exceed the growth rate, which would otherwise produce an
/// infinite or negative perpetuity.
pub fn terminal_value(final_fcf: f64, growth_rate: f64, discount_rate: f64) -> Result<f64> {
    if discount_rate <= growth_rate {
        return Err(Error::invalid_parameter(format!(
            "discount rate ({discount_rate}) must exceed terminal growth rate ({growth_rate})"
        )));
    }
    Ok(final_fcf * (1.0 + growth_rate) / (discount_rate - growth_rate))
}

/// Present value of a single cash flow `years` periods out.
pub fn present_value(cash_flow: f64, discount_rate: f64, years: u32) -> f64 {
    cash_flow / (1.0 + discount_rate).powi(years as i32)
}

/// Discount a forecast series to present values. Year 1 is the first
/// element.
pub fn discount_cash_flows(cash_flows: &[f64], discount_rate: f64) -> Vec<f64> {
    cash_flows
        .iter()
        .enumerate()
        .map(|(i, cf)| present_value(*cf, discount_rate, i as u32 + 1))
        .collect()
}

/// Equity value from enterprise value: EV − debt + cash.
pub fn equity_value(enterprise_value: f64, debt: f64, cash: f64) -> f64 {
    enterprise_value - debt + cash
}

/// Per-share value; `None` when shares outstanding is zero.
pub fn share_price(equity_value: f64, shares_outstanding: f64) -> Option<f64> {
    if shares_outstanding == 0.0 {
        None
    } else {
        Some(equity_value / shares_outstanding)
    }
}

/// Year-over-year growth rates for a chronological series. Zero-base
/// periods contribute a 0 growth rate rather than dividing by zero.
pub fn growth_rates(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .map(|w| if w[0] != 0.0 { (w[1] - w[0]) / w[0] } else { 0.0 })
        .collect()
}

/// Element-wise margins (e.g., EBITDA / revenue). Zero denominators
/// contribute a 0 margin.
pub fn margins(numerator: &[f64], denominator: &[f64]) -> Vec<f64> {
    numerator
        .iter()
        .zip(denominator)
        .map(|(n, d)| if *d != 0.0 { n / d } else { 0.0 })
        .collect()
}

/// Enterprise-value multiple over a metric; `None` when the metric is
/// zero and the ratio is meaningless.
pub fn ev_multiple(enterprise_value: f64, metric: f64) -> Option<f64> {
    if metric == 0.0 {
        None
    } else {
        Some(enterprise_value / metric)
    }
}
