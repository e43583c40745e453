//! Precedent transactions analysis.
//!
//! Structurally the comparable-company model with transaction
//! multiples instead of trading multiples: only the EV/EBITDA and
//! EV/Revenue paths apply (M&A comparables carry no P/E), and the
//! comparables come from the transaction lookup collaborator.

use serde::{Deserialize, Serialize};

use crate::calc;
use crate::comps::{transactions_or_empty, PrecedentTransaction, TransactionLookup};
use crate::dataset::{FinancialDataset, Metric};
use crate::models::{MultipleBasis, ValuationDetail, ValuationMethod, ValuationResult};
use crate::resolver::MetricResolver;
use valuit_common::Result;

/// Precedent-transaction parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecedentTransactionsParams {
    pub industry: String,
    pub ev_ebitda_multiple: f64,
    pub ev_revenue_multiple: f64,
}

/// Precedent-transaction detail record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecedentTransactionsDetail {
    pub ebitda: Option<f64>,
    pub revenue: Option<f64>,
    pub debt: f64,
    pub cash: f64,
    pub ev_ebitda_valuation: Option<f64>,
    pub ev_revenue_valuation: Option<f64>,
    pub primary_basis: MultipleBasis,
    pub transactions: Vec<PrecedentTransaction>,
}

impl PrecedentTransactionsParams {
    /// Parameters seeded from the industry baseline multiples.
    pub fn for_industry(industry: impl Into<String>) -> Self {
        let industry = industry.into();
        let a = crate::assumptions::for_industry(&industry);
        Self {
            industry,
            ev_ebitda_multiple: a.ev_ebitda,
            ev_revenue_multiple: a.ev_revenue,
        }
    }
}

/// Precedent transactions valuation model.
pub struct PrecedentTransactionsModel {
    params: PrecedentTransactionsParams,
}

impl PrecedentTransactionsModel {
    pub fn new(params: PrecedentTransactionsParams) -> Self {
        Self { params }
    }

    /// Run the precedent-transactions valuation.
    pub fn run(
        &self,
        dataset: &FinancialDataset,
        lookup: &dyn TransactionLookup,
    ) -> Result<ValuationResult> {
        let p = &self.params;
        let resolver = MetricResolver::new(dataset);

        let ebitda = resolver.latest(Metric::Ebitda);
        let revenue = resolver.latest(Metric::Revenue);
        let debt = resolver.debt().value;
        let cash = resolver.cash().value;

        let ev_ebitda_valuation = ebitda.map(|e| e * p.ev_ebitda_multiple);
        let ev_revenue_valuation = revenue.map(|r| r * p.ev_revenue_multiple);

        let transactions = transactions_or_empty(lookup, &p.industry);

        // EV/EBITDA first, then EV/Revenue
        let (enterprise_value, equity_value, primary_basis) =
            if let Some(ev) = ev_ebitda_valuation {
                (ev, calc::equity_value(ev, debt, cash), MultipleBasis::EvEbitda)
            } else if let Some(ev) = ev_revenue_valuation {
                (ev, calc::equity_value(ev, debt, cash), MultipleBasis::EvRevenue)
            } else {
                (0.0, 0.0, MultipleBasis::None)
            };

        tracing::debug!(
            enterprise_value,
            equity_value,
            primary_basis = %primary_basis,
            transaction_count = transactions.len(),
            "Precedent transactions valuation complete"
        );

        Ok(ValuationResult {
            enterprise_value,
            equity_value,
            method: ValuationMethod::PrecedentTransactions,
            detail: ValuationDetail::PrecedentTransactions(PrecedentTransactionsDetail {
                ebitda,
                revenue,
                debt,
                cash,
                ev_ebitda_valuation,
                ev_revenue_valuation,
                primary_basis,
                transactions,
            }),
        })
    }
}
