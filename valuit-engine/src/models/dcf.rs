//! Discounted cash flow model.
//!
//! Values a company by projecting free cash flows from a resolved
//! base-year figure, discounting them at WACC, and adding a
//! perpetuity-growth terminal value.

use serde::{Deserialize, Serialize};

use crate::calc;
use crate::dataset::FinancialDataset;
use crate::models::{ValuationDetail, ValuationMethod, ValuationResult};
use crate::resolver::{MetricResolver, MetricSource};
use crate::sensitivity::SensitivityGrid;
use valuit_common::{Error, Result};

/// WACC offsets for the sensitivity grid rows.
const WACC_OFFSETS: [f64; 5] = [-0.02, -0.01, 0.0, 0.01, 0.02];
/// Terminal-growth offsets for the sensitivity grid columns.
const GROWTH_OFFSETS: [f64; 5] = [-0.01, -0.005, 0.0, 0.005, 0.01];

/// DCF parameters. Rates are decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DcfParams {
    /// Annual FCF growth over the explicit forecast
    pub growth_rate: f64,
    /// Discount rate
    pub wacc: f64,
    /// Perpetuity growth beyond the forecast horizon
    pub terminal_growth_rate: f64,
    /// Number of explicit forecast years (>= 1)
    pub forecast_years: u32,
}

/// DCF detail record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DcfDetail {
    pub base_fcf: f64,
    /// Provenance of the base FCF (reported / derived / default)
    pub base_fcf_source: MetricSource,
    pub fcf_forecast: Vec<f64>,
    pub present_values: Vec<f64>,
    pub terminal_value: f64,
    pub pv_terminal_value: f64,
    pub debt: f64,
    pub cash: f64,
    /// Enterprise value across WACC × terminal growth
    pub sensitivity: SensitivityGrid,
}

/// Discounted cash flow valuation model.
pub struct DcfModel {
    params: DcfParams,
}

impl DcfParams {
    /// Parameters seeded from the industry baseline assumptions, with
    /// a five-year explicit forecast.
    pub fn for_industry(industry: &str) -> Self {
        let a = crate::assumptions::for_industry(industry);
        Self {
            growth_rate: a.revenue_growth,
            wacc: a.wacc,
            terminal_growth_rate: a.terminal_growth,
            forecast_years: 5,
        }
    }
}

impl DcfModel {
    pub fn new(params: DcfParams) -> Self {
        Self { params }
    }

    /// Run the DCF valuation.
    pub fn run(&self, dataset: &FinancialDataset) -> Result<ValuationResult> {
        let p = &self.params;

        if p.forecast_years == 0 {
            return Err(Error::invalid_parameter("forecast_years must be at least 1"));
        }
        if p.wacc <= p.terminal_growth_rate {
            return Err(Error::invalid_parameter(format!(
                "wacc ({}) must exceed terminal growth rate ({})",
                p.wacc, p.terminal_growth_rate
            )));
        }

        let resolver = MetricResolver::new(dataset);
        let base_fcf = resolver.base_fcf();
        let debt = resolver.debt();
        let cash = resolver.cash();

        let fcf_forecast = project_fcf(base_fcf.value, p.growth_rate, p.forecast_years);
        let present_values = calc::discount_cash_flows(&fcf_forecast, p.wacc);

        let final_fcf = *fcf_forecast.last().unwrap_or(&base_fcf.value);
        let terminal_value = calc::terminal_value(final_fcf, p.terminal_growth_rate, p.wacc)?;
        let pv_terminal_value = calc::present_value(terminal_value, p.wacc, p.forecast_years);

        let enterprise_value: f64 = present_values.iter().sum::<f64>() + pv_terminal_value;
        let equity_value = calc::equity_value(enterprise_value, debt.value, cash.value);

        let sensitivity = self.sensitivity_grid(&fcf_forecast);

        tracing::debug!(
            enterprise_value,
            equity_value,
            base_fcf = base_fcf.value,
            used_default = base_fcf.used_default(),
            "DCF valuation complete"
        );

        Ok(ValuationResult {
            enterprise_value,
            equity_value,
            method: ValuationMethod::Dcf,
            detail: ValuationDetail::Dcf(DcfDetail {
                base_fcf: base_fcf.value,
                base_fcf_source: base_fcf.source,
                fcf_forecast,
                present_values,
                terminal_value,
                pv_terminal_value,
                debt: debt.value,
                cash: cash.value,
                sensitivity,
            }),
        })
    }

    /// Enterprise value over the 5×5 WACC × terminal-growth grid.
    ///
    /// The FCF forecast is fixed (growth_rate is not varied); each
    /// cell re-discounts it and recomputes the terminal value. Cells
    /// where the perturbed WACC does not exceed the perturbed growth
    /// rate are left empty.
    fn sensitivity_grid(&self, fcf_forecast: &[f64]) -> SensitivityGrid {
        let p = &self.params;
        let wacc_values: Vec<f64> = WACC_OFFSETS.iter().map(|o| p.wacc + o).collect();
        let growth_values: Vec<f64> =
            GROWTH_OFFSETS.iter().map(|o| p.terminal_growth_rate + o).collect();

        let final_fcf = *fcf_forecast.last().unwrap_or(&0.0);
        let years = p.forecast_years;

        SensitivityGrid::from_fn(
            "wacc",
            "terminal_growth_rate",
            wacc_values,
            growth_values,
            |w, g| {
                if w <= g {
                    return None;
                }
                let pvs: f64 = calc::discount_cash_flows(fcf_forecast, w).iter().sum();
                let tv = final_fcf * (1.0 + g) / (w - g);
                Some(pvs + calc::present_value(tv, w, years))
            },
        )
    }
}

/// Compound a base FCF forward at a constant growth rate.
fn project_fcf(base_fcf: f64, growth_rate: f64, years: u32) -> Vec<f64> {
    let mut forecast = Vec::with_capacity(years as usize);
    let mut current = base_fcf;
    for _ in 0..years {
        current *= 1.0 + growth_rate;
        forecast.push(current);
    }
    forecast
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Metric;

    fn params() -> DcfParams {
        DcfParams {
            growth_rate: 0.05,
            wacc: 0.10,
            terminal_growth_rate: 0.02,
            forecast_years: 2,
        }
    }

    fn dataset_with_fcf(fcf: f64) -> FinancialDataset {
        let mut ds = FinancialDataset::new();
        ds.insert_latest(Metric::Fcf, "2023", fcf);
        ds
    }

    fn detail(result: &ValuationResult) -> &DcfDetail {
        match &result.detail {
            ValuationDetail::Dcf(d) => d,
            other => panic!("expected DCF detail, got {:?}", other),
        }
    }

    #[test]
    fn test_reference_scenario() {
        let result = DcfModel::new(params()).run(&dataset_with_fcf(100.0)).unwrap();
        let d = detail(&result);

        assert_eq!(d.fcf_forecast, vec![105.0, 110.25]);
        assert!((d.present_values[0] - 95.454545).abs() < 1e-4);
        assert!((d.present_values[1] - 91.115702).abs() < 1e-4);
        assert!((d.terminal_value - 1405.3125).abs() < 1e-9);
        assert!((d.pv_terminal_value - 1405.3125 / 1.21).abs() < 1e-4);

        let expected_ev = 105.0 / 1.1 + 110.25 / 1.21 + 1405.3125 / 1.21;
        assert!((result.enterprise_value - expected_ev).abs() < 1e-6);
        // No debt or cash in the dataset
        assert_eq!(result.equity_value, result.enterprise_value);
        assert_eq!(d.base_fcf_source, MetricSource::Reported);
    }

    #[test]
    fn test_equity_bridge_uses_debt_and_cash() {
        let mut ds = dataset_with_fcf(100.0);
        ds.insert_latest(Metric::TotalDebt, "2023", 200.0);
        ds.insert_latest(Metric::Cash, "2023", 50.0);

        let result = DcfModel::new(params()).run(&ds).unwrap();
        assert!((result.equity_value - (result.enterprise_value - 200.0 + 50.0)).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_wacc_not_above_terminal_growth() {
        let mut p = params();
        p.terminal_growth_rate = 0.10;
        let err = DcfModel::new(p).run(&dataset_with_fcf(100.0)).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));

        let mut p = params();
        p.terminal_growth_rate = 0.12;
        assert!(DcfModel::new(p).run(&dataset_with_fcf(100.0)).is_err());
    }

    #[test]
    fn test_rejects_zero_forecast_years() {
        let mut p = params();
        p.forecast_years = 0;
        assert!(DcfModel::new(p).run(&dataset_with_fcf(100.0)).is_err());
    }

    #[test]
    fn test_enterprise_value_positive_and_increasing_in_growth() {
        let ds = dataset_with_fcf(100.0);
        let mut previous = 0.0;
        for growth_bp in [0, 2, 4, 6, 8] {
            let mut p = params();
            p.growth_rate = growth_bp as f64 / 100.0;
            p.forecast_years = 5;
            let result = DcfModel::new(p).run(&ds).unwrap();
            assert!(result.enterprise_value > 0.0);
            assert!(
                result.enterprise_value > previous,
                "EV must increase with growth_rate"
            );
            previous = result.enterprise_value;
        }
    }

    #[test]
    fn test_sensitivity_grid_center_matches_headline() {
        let result = DcfModel::new(params()).run(&dataset_with_fcf(100.0)).unwrap();
        let d = detail(&result);

        assert_eq!(d.sensitivity.row_values.len(), 5);
        assert_eq!(d.sensitivity.col_values.len(), 5);
        let center = d.sensitivity.get(2, 2).expect("center cell computed");
        assert!((center - result.enterprise_value).abs() < 1e-6);
    }

    #[test]
    fn test_sensitivity_grid_blanks_degenerate_cells() {
        // wacc 3%, growth 2.5%: low-WACC rows cross the growth axis
        let p = DcfParams {
            growth_rate: 0.05,
            wacc: 0.03,
            terminal_growth_rate: 0.025,
            forecast_years: 3,
        };
        let result = DcfModel::new(p).run(&dataset_with_fcf(100.0)).unwrap();
        let d = detail(&result);

        // Row 0 is wacc 1%; every growth column is >= 1.5%
        assert!(d.sensitivity.values[0].iter().all(Option::is_none));
        // Center cell is the valid base case
        assert!(d.sensitivity.get(2, 2).is_some());
    }

    #[test]
    fn test_industry_seeded_params_are_runnable() {
        for industry in ["Technology", "Utilities", "Carrier Pigeons"] {
            let p = DcfParams::for_industry(industry);
            assert!(p.wacc > p.terminal_growth_rate, "bad spread for {industry}");
            assert!(DcfModel::new(p).run(&dataset_with_fcf(100.0)).is_ok());
        }
    }

    #[test]
    fn test_default_base_fcf_on_empty_dataset() {
        let result = DcfModel::new(params()).run(&FinancialDataset::new()).unwrap();
        let d = detail(&result);
        assert_eq!(d.base_fcf, 1_000_000.0);
        assert_eq!(d.base_fcf_source, MetricSource::Default);
    }
}
