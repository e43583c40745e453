//! Leveraged buyout analysis.
//!
//! Estimates sponsor returns for a buyout at an entry multiple implied
//! by the target IRR, under a fixed 70/30 debt/equity structure and a
//! tiered EBITDA growth path. The IRR is a closed-form approximation
//! from the equity multiple, not solved from an explicit cash-flow
//! stream.

use serde::{Deserialize, Serialize};

use crate::dataset::FinancialDataset;
use crate::models::{ValuationDetail, ValuationMethod, ValuationResult};
use crate::resolver::{MetricResolver, MetricSource};
use crate::sensitivity::{IrrSensitivity, SensitivityGrid};
use valuit_common::{Error, Result};

/// LBO parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LboParams {
    /// Holding period in years (>= 1)
    pub exit_year: u32,
    /// EV/EBITDA multiple at exit
    pub exit_multiple: f64,
    /// Sponsor's target IRR (decimal), drives the entry multiple tier
    pub target_irr: f64,
}

/// Named LBO modelling assumptions. Kept as configuration so the
/// heuristics are auditable rather than inlined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LboAssumptions {
    /// Debt share of the purchase price
    pub debt_fraction: f64,
    /// Equity share of the purchase price
    pub equity_fraction: f64,
    /// EBITDA growth during the operational-improvement years
    pub early_growth: f64,
    /// EBITDA growth thereafter
    pub late_growth: f64,
    /// Number of years at the early growth rate
    pub early_years: u32,
    /// Maximum supportable debt as a multiple of EBITDA
    pub max_debt_ebitda_multiple: f64,
    /// (IRR floor, entry multiple) tiers; the first tier whose floor
    /// the target IRR strictly exceeds wins
    pub entry_multiple_tiers: Vec<(f64, f64)>,
    /// Entry multiple when no tier matches
    pub fallback_entry_multiple: f64,
    /// Entry multiples swept for IRR sensitivity
    pub sweep_multiples: Vec<f64>,
}

impl Default for LboAssumptions {
    fn default() -> Self {
        Self {
            debt_fraction: 0.70,
            equity_fraction: 0.30,
            early_growth: 0.10,
            late_growth: 0.05,
            early_years: 2,
            max_debt_ebitda_multiple: 5.0,
            entry_multiple_tiers: vec![(0.25, 6.0), (0.20, 7.0), (0.15, 8.0)],
            fallback_entry_multiple: 9.0,
            sweep_multiples: vec![5.0, 6.0, 7.0, 8.0, 9.0],
        }
    }
}

/// LBO detail record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LboDetail {
    pub base_ebitda: f64,
    pub base_ebitda_source: MetricSource,
    pub entry_multiple: f64,
    pub purchase_price: f64,
    pub new_debt: f64,
    pub new_equity: f64,
    pub ebitda_projection: Vec<f64>,
    pub exit_ebitda: f64,
    pub exit_value: f64,
    pub exit_debt: f64,
    pub exit_equity: f64,
    pub equity_multiple: f64,
    /// Closed-form approximation: equity_multiple^(1/years) − 1
    pub irr: f64,
    pub max_debt: f64,
    /// IRR across the fixed entry-multiple sweep
    pub irr_sensitivity: IrrSensitivity,
    /// IRR across exit year × exit multiple
    pub exit_sensitivity: SensitivityGrid,
}

/// One computed buyout scenario.
struct LboOutcome {
    purchase_price: f64,
    new_debt: f64,
    new_equity: f64,
    ebitda_projection: Vec<f64>,
    exit_ebitda: f64,
    exit_value: f64,
    exit_debt: f64,
    exit_equity: f64,
    equity_multiple: f64,
    irr: f64,
}

/// Leveraged buyout valuation model.
pub struct LboModel {
    params: LboParams,
    assumptions: LboAssumptions,
}

impl LboModel {
    /// Create a model with the standard assumptions.
    pub fn new(params: LboParams) -> Self {
        Self {
            params,
            assumptions: LboAssumptions::default(),
        }
    }

    /// Create a model with custom assumptions.
    pub fn with_assumptions(params: LboParams, assumptions: LboAssumptions) -> Self {
        Self { params, assumptions }
    }

    /// Entry multiple implied by the target IRR tier table.
    ///
    /// Comparisons are strict: a target IRR sitting exactly on a tier
    /// floor maps to the next lower tier (0.25 → 7.0x, not 6.0x).
    pub fn entry_multiple(&self) -> f64 {
        for &(floor, multiple) in &self.assumptions.entry_multiple_tiers {
            if self.params.target_irr > floor {
                return multiple;
            }
        }
        self.assumptions.fallback_entry_multiple
    }

    /// Run the LBO analysis.
    pub fn run(&self, dataset: &FinancialDataset) -> Result<ValuationResult> {
        if self.params.exit_year == 0 {
            return Err(Error::invalid_parameter("exit_year must be at least 1"));
        }

        let resolver = MetricResolver::new(dataset);
        let base_ebitda = resolver.base_ebitda();

        let entry_multiple = self.entry_multiple();
        let outcome = self.compute(entry_multiple, base_ebitda.value)?;

        let max_debt = base_ebitda.value * self.assumptions.max_debt_ebitda_multiple;

        let irr_sensitivity = self.entry_multiple_sweep(base_ebitda.value)?;
        let exit_sensitivity = self.exit_grid(base_ebitda.value, &outcome);

        tracing::debug!(
            purchase_price = outcome.purchase_price,
            entry_multiple,
            irr = outcome.irr,
            used_default = base_ebitda.used_default(),
            "LBO analysis complete"
        );

        Ok(ValuationResult {
            enterprise_value: outcome.purchase_price,
            equity_value: outcome.new_equity,
            method: ValuationMethod::Lbo,
            detail: ValuationDetail::Lbo(LboDetail {
                base_ebitda: base_ebitda.value,
                base_ebitda_source: base_ebitda.source,
                entry_multiple,
                purchase_price: outcome.purchase_price,
                new_debt: outcome.new_debt,
                new_equity: outcome.new_equity,
                ebitda_projection: outcome.ebitda_projection,
                exit_ebitda: outcome.exit_ebitda,
                exit_value: outcome.exit_value,
                exit_debt: outcome.exit_debt,
                exit_equity: outcome.exit_equity,
                equity_multiple: outcome.equity_multiple,
                irr: outcome.irr,
                max_debt,
                irr_sensitivity,
                exit_sensitivity,
            }),
        })
    }

    /// Full buyout chain for one entry multiple.
    fn compute(&self, entry_multiple: f64, base_ebitda: f64) -> Result<LboOutcome> {
        let a = &self.assumptions;
        let exit_year = self.params.exit_year;

        let purchase_price = entry_multiple * base_ebitda;
        let new_debt = purchase_price * a.debt_fraction;
        let new_equity = purchase_price * a.equity_fraction;

        if new_equity == 0.0 {
            return Err(Error::invalid_parameter(
                "sponsor equity is zero; returns are undefined",
            ));
        }

        let ebitda_projection = self.project_ebitda(base_ebitda, exit_year);
        let exit_ebitda = *ebitda_projection.last().unwrap_or(&base_ebitda);
        let exit_value = exit_ebitda * self.params.exit_multiple;

        // Linear amortization over the holding period; the full
        // schedule retires the balance exactly, so exit debt is zero
        // by construction.
        let annual_payment = new_debt / exit_year as f64;
        let exit_debt = new_debt - annual_payment * exit_year as f64;

        let exit_equity = exit_value - exit_debt;
        let equity_multiple = exit_equity / new_equity;
        let irr = equity_multiple.powf(1.0 / exit_year as f64) - 1.0;

        Ok(LboOutcome {
            purchase_price,
            new_debt,
            new_equity,
            ebitda_projection,
            exit_ebitda,
            exit_value,
            exit_debt,
            exit_equity,
            equity_multiple,
            irr,
        })
    }

    /// Tiered EBITDA growth path: early years at the improvement rate,
    /// later years at the steady rate.
    fn project_ebitda(&self, base_ebitda: f64, years: u32) -> Vec<f64> {
        let a = &self.assumptions;
        let mut projection = Vec::with_capacity(years as usize);
        let mut current = base_ebitda;
        for year in 1..=years {
            let growth = if year <= a.early_years {
                a.early_growth
            } else {
                a.late_growth
            };
            current *= 1.0 + growth;
            projection.push(current);
        }
        projection
    }

    /// IRR across the fixed entry-multiple sweep, holding exit
    /// multiple and growth fixed.
    fn entry_multiple_sweep(&self, base_ebitda: f64) -> Result<IrrSensitivity> {
        let mut irr_values = Vec::with_capacity(self.assumptions.sweep_multiples.len());
        for &multiple in &self.assumptions.sweep_multiples {
            irr_values.push(self.compute(multiple, base_ebitda)?.irr);
        }
        Ok(IrrSensitivity {
            entry_multiples: self.assumptions.sweep_multiples.clone(),
            irr_values,
        })
    }

    /// IRR across exit year × exit multiple, holding the entry
    /// capital structure fixed.
    ///
    /// The amortization payment stays on the primary schedule, so
    /// earlier exits leave residual debt and later exits overpay into
    /// negative residuals, matching the reference sensitivity table.
    fn exit_grid(&self, base_ebitda: f64, outcome: &LboOutcome) -> SensitivityGrid {
        let exit_year = self.params.exit_year;
        let exit_multiple = self.params.exit_multiple;

        let years: Vec<f64> = vec![
            exit_year as f64 - 1.0,
            exit_year as f64,
            exit_year as f64 + 1.0,
        ];
        let multiples: Vec<f64> = (-2..=2).map(|o| exit_multiple + o as f64).collect();

        let annual_payment = outcome.new_debt / exit_year as f64;
        let new_debt = outcome.new_debt;
        let new_equity = outcome.new_equity;

        SensitivityGrid::from_fn("exit_year", "exit_multiple", years, multiples, |y, m| {
            if y < 1.0 {
                return None;
            }
            let year = y as u32;
            let exit_ebitda = *self.project_ebitda(base_ebitda, year).last()?;
            let remaining_debt = new_debt - annual_payment * year as f64;
            let exit_equity = exit_ebitda * m - remaining_debt;
            let equity_multiple = exit_equity / new_equity;
            if equity_multiple <= 0.0 {
                // Equity wiped out; the closed-form IRR is undefined
                return None;
            }
            Some(equity_multiple.powf(1.0 / y) - 1.0)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Metric;

    fn params(target_irr: f64) -> LboParams {
        LboParams {
            exit_year: 5,
            exit_multiple: 8.0,
            target_irr,
        }
    }

    fn dataset_with_ebitda(ebitda: f64) -> FinancialDataset {
        let mut ds = FinancialDataset::new();
        ds.insert_latest(Metric::Ebitda, "2023", ebitda);
        ds
    }

    fn detail(result: &ValuationResult) -> &LboDetail {
        match &result.detail {
            ValuationDetail::Lbo(d) => d,
            other => panic!("expected LBO detail, got {:?}", other),
        }
    }

    #[test]
    fn test_entry_multiple_tiers_are_strict() {
        // Exactly on the 25% floor maps to the next lower tier
        assert_eq!(LboModel::new(params(0.25)).entry_multiple(), 7.0);
        assert_eq!(LboModel::new(params(0.2500001)).entry_multiple(), 6.0);

        assert_eq!(LboModel::new(params(0.30)).entry_multiple(), 6.0);
        assert_eq!(LboModel::new(params(0.22)).entry_multiple(), 7.0);
        assert_eq!(LboModel::new(params(0.20)).entry_multiple(), 8.0);
        assert_eq!(LboModel::new(params(0.16)).entry_multiple(), 8.0);
        assert_eq!(LboModel::new(params(0.15)).entry_multiple(), 9.0);
        assert_eq!(LboModel::new(params(0.10)).entry_multiple(), 9.0);
    }

    #[test]
    fn test_tiered_ebitda_projection() {
        let model = LboModel::new(LboParams {
            exit_year: 4,
            exit_multiple: 8.0,
            target_irr: 0.20,
        });
        let result = model.run(&dataset_with_ebitda(100.0)).unwrap();
        let projection = &detail(&result).ebitda_projection;

        // 10% for two years, 5% thereafter
        assert!((projection[0] - 110.0).abs() < 1e-9);
        assert!((projection[1] - 121.0).abs() < 1e-9);
        assert!((projection[2] - 127.05).abs() < 1e-9);
        assert!((projection[3] - 133.4025).abs() < 1e-9);
    }

    #[test]
    fn test_capital_structure_and_exit_debt() {
        let result = LboModel::new(params(0.18))
            .run(&dataset_with_ebitda(100.0))
            .unwrap();
        let d = detail(&result);

        assert_eq!(d.entry_multiple, 8.0);
        assert_eq!(d.purchase_price, 800.0);
        assert!((d.new_debt - 560.0).abs() < 1e-9);
        assert!((d.new_equity - 240.0).abs() < 1e-9);
        // Linear amortization retires the full balance by exit
        assert_eq!(d.exit_debt, 0.0);
        assert_eq!(d.max_debt, 500.0);

        assert_eq!(result.enterprise_value, d.purchase_price);
        assert_eq!(result.equity_value, d.new_equity);
    }

    #[test]
    fn test_return_identities() {
        let result = LboModel::new(params(0.18))
            .run(&dataset_with_ebitda(100.0))
            .unwrap();
        let d = detail(&result);

        assert!((d.exit_value - d.exit_ebitda * 8.0).abs() < 1e-9);
        assert!((d.exit_equity - (d.exit_value - d.exit_debt)).abs() < 1e-9);
        assert!((d.equity_multiple - d.exit_equity / d.new_equity).abs() < 1e-12);
        let expected_irr = d.equity_multiple.powf(1.0 / 5.0) - 1.0;
        assert!((d.irr - expected_irr).abs() < 1e-12);
    }

    #[test]
    fn test_default_ebitda_on_empty_dataset() {
        let result = LboModel::new(params(0.18)).run(&FinancialDataset::new()).unwrap();
        let d = detail(&result);

        assert_eq!(d.base_ebitda, 100_000_000.0);
        assert_eq!(d.base_ebitda_source, MetricSource::Default);
        assert_eq!(d.purchase_price, 800_000_000.0);
    }

    #[test]
    fn test_rejects_zero_exit_year() {
        let model = LboModel::new(LboParams {
            exit_year: 0,
            exit_multiple: 8.0,
            target_irr: 0.20,
        });
        assert!(model.run(&dataset_with_ebitda(100.0)).is_err());
    }

    #[test]
    fn test_sweep_irr_decreases_with_entry_multiple() {
        let result = LboModel::new(params(0.18))
            .run(&dataset_with_ebitda(100.0))
            .unwrap();
        let sweep = &detail(&result).irr_sensitivity;

        assert_eq!(sweep.entry_multiples, vec![5.0, 6.0, 7.0, 8.0, 9.0]);
        assert_eq!(sweep.irr_values.len(), 5);
        for pair in sweep.irr_values.windows(2) {
            assert!(pair[0] > pair[1], "IRR must fall as the entry price rises");
        }
    }

    #[test]
    fn test_exit_grid_center_matches_headline_irr() {
        let result = LboModel::new(params(0.18))
            .run(&dataset_with_ebitda(100.0))
            .unwrap();
        let d = detail(&result);
        let grid = &d.exit_sensitivity;

        assert_eq!(grid.row_values, vec![4.0, 5.0, 6.0]);
        assert_eq!(grid.col_values.len(), 5);
        // Center cell: primary exit year and multiple
        let center = grid.get(1, 2).expect("center cell computed");
        assert!((center - d.irr).abs() < 1e-12);
    }

    #[test]
    fn test_exit_grid_skips_year_zero() {
        let model = LboModel::new(LboParams {
            exit_year: 1,
            exit_multiple: 8.0,
            target_irr: 0.18,
        });
        let result = model.run(&dataset_with_ebitda(100.0)).unwrap();
        let grid = &detail(&result).exit_sensitivity;

        assert_eq!(grid.row_values[0], 0.0);
        assert!(grid.values[0].iter().all(Option::is_none));
        assert!(grid.get(1, 2).is_some());
    }
}
