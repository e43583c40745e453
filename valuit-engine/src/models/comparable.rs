//! Comparable company analysis.
//!
//! Applies peer trading multiples (EV/EBITDA, EV/Revenue, P/E) to the
//! subject's own metrics. Each multiple with an available metric
//! yields a candidate value; the primary result follows a fixed
//! priority order.

use serde::{Deserialize, Serialize};

use crate::calc;
use crate::comps::{peers_or_empty, ComparablePeer, PeerLookup};
use crate::dataset::{FinancialDataset, Metric};
use crate::models::{MultipleBasis, ValuationDetail, ValuationMethod, ValuationResult};
use crate::resolver::MetricResolver;
use valuit_common::Result;

/// Comparable-company parameters. The identifiers are opaque to the
/// engine and passed through to the peer lookup collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparableCompanyParams {
    pub industry: String,
    pub ticker: String,
    pub ev_ebitda_multiple: f64,
    pub pe_ratio: f64,
    pub ev_revenue_multiple: f64,
}

/// Comparable-company detail record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparableCompanyDetail {
    pub ebitda: Option<f64>,
    pub net_income: Option<f64>,
    pub revenue: Option<f64>,
    pub debt: f64,
    pub cash: f64,
    /// EV candidate from EBITDA × multiple
    pub ev_ebitda_valuation: Option<f64>,
    /// Equity candidate from net income × P/E
    pub pe_valuation: Option<f64>,
    /// EV candidate from revenue × multiple
    pub ev_revenue_valuation: Option<f64>,
    /// Which candidate produced the headline numbers
    pub primary_basis: MultipleBasis,
    pub comparable_companies: Vec<ComparablePeer>,
}

impl ComparableCompanyParams {
    /// Parameters seeded from the industry baseline multiples.
    pub fn for_industry(industry: impl Into<String>, ticker: impl Into<String>) -> Self {
        let industry = industry.into();
        let a = crate::assumptions::for_industry(&industry);
        Self {
            industry,
            ticker: ticker.into(),
            ev_ebitda_multiple: a.ev_ebitda,
            pe_ratio: a.pe_ratio,
            ev_revenue_multiple: a.ev_revenue,
        }
    }
}

/// Comparable company analysis model.
pub struct ComparableCompanyModel {
    params: ComparableCompanyParams,
}

impl ComparableCompanyModel {
    pub fn new(params: ComparableCompanyParams) -> Self {
        Self { params }
    }

    /// Run the comparable-company valuation.
    ///
    /// Lookup failure degrades to an empty peer list and does not
    /// affect the computed numbers.
    pub fn run(
        &self,
        dataset: &FinancialDataset,
        lookup: &dyn PeerLookup,
    ) -> Result<ValuationResult> {
        let p = &self.params;
        let resolver = MetricResolver::new(dataset);

        let ebitda = resolver.latest(Metric::Ebitda);
        let net_income = resolver.latest(Metric::NetIncome);
        let revenue = resolver.latest(Metric::Revenue);
        let debt = resolver.debt().value;
        let cash = resolver.cash().value;

        let ev_ebitda_valuation = ebitda.map(|e| e * p.ev_ebitda_multiple);
        let pe_valuation = net_income.map(|n| n * p.pe_ratio);
        let ev_revenue_valuation = revenue.map(|r| r * p.ev_revenue_multiple);

        let comparable_companies = peers_or_empty(lookup, &p.ticker, &p.industry);

        // First available wins: EV/EBITDA, then EV/Revenue, then P/E
        let (enterprise_value, equity_value, primary_basis) =
            if let Some(ev) = ev_ebitda_valuation {
                (ev, calc::equity_value(ev, debt, cash), MultipleBasis::EvEbitda)
            } else if let Some(ev) = ev_revenue_valuation {
                (ev, calc::equity_value(ev, debt, cash), MultipleBasis::EvRevenue)
            } else if let Some(equity) = pe_valuation {
                // P/E prices equity directly; back-derive EV for consistency
                (equity + debt - cash, equity, MultipleBasis::PriceEarnings)
            } else {
                (0.0, 0.0, MultipleBasis::None)
            };

        tracing::debug!(
            enterprise_value,
            equity_value,
            primary_basis = %primary_basis,
            peer_count = comparable_companies.len(),
            "Comparable company valuation complete"
        );

        Ok(ValuationResult {
            enterprise_value,
            equity_value,
            method: ValuationMethod::ComparableCompany,
            detail: ValuationDetail::ComparableCompany(ComparableCompanyDetail {
                ebitda,
                net_income,
                revenue,
                debt,
                cash,
                ev_ebitda_valuation,
                pe_valuation,
                ev_revenue_valuation,
                primary_basis,
                comparable_companies,
            }),
        })
    }
}
