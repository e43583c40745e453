//! Metric resolution with documented fallback chains.
//!
//! Models never fail on missing data. Each required figure resolves
//! through a fixed priority chain: reported value first, then
//! derivations from related metrics, terminating in a named default
//! from [`FallbackPolicy`]. The chains, multipliers, and defaults are
//! product-level heuristics and must be reproduced exactly for output
//! parity with downstream reports.
//!
//! Every resolution records where the figure came from
//! ([`MetricSource`]), so detail records can flag defaulted inputs.

use serde::{Deserialize, Serialize};

use crate::dataset::{FinancialDataset, Metric};

/// Named fallback constants used when metrics cannot be resolved from
/// the dataset. Kept as configuration so the policy is auditable and
/// independently testable rather than buried in model code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackPolicy {
    /// Default total assets when nothing is derivable ($1M)
    pub default_total_assets: f64,
    /// Default base free cash flow when nothing is derivable ($1M)
    pub default_base_fcf: f64,
    /// Default base EBITDA on the LBO path ($100M)
    pub default_base_ebitda: f64,
    /// Total liabilities estimated as this multiple of total debt,
    /// covering non-debt liabilities
    pub liability_debt_multiplier: f64,
    /// Liability-to-asset ratio used as the last-resort liability
    /// estimate
    pub liability_asset_ratio: f64,
    /// FCF estimated as this fraction of EBITDA
    pub fcf_ebitda_conversion: f64,
    /// EBITDA margin assumed when estimating EBITDA from revenue
    pub default_ebitda_margin: f64,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self {
            default_total_assets: 1_000_000.0,
            default_base_fcf: 1_000_000.0,
            default_base_ebitda: 100_000_000.0,
            liability_debt_multiplier: 1.5,
            liability_asset_ratio: 0.6,
            fcf_ebitda_conversion: 0.6,
            default_ebitda_margin: 0.20,
        }
    }
}

/// Where a resolved figure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricSource {
    /// Read directly from the dataset
    Reported,
    /// Derived from other reported metrics via a fallback rule
    Derived,
    /// Literal default from the fallback policy
    Default,
}

/// A resolved figure together with its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resolved {
    pub value: f64,
    pub source: MetricSource,
}

impl Resolved {
    fn reported(value: f64) -> Self {
        Self {
            value,
            source: MetricSource::Reported,
        }
    }

    fn derived(value: f64) -> Self {
        Self {
            value,
            source: MetricSource::Derived,
        }
    }

    fn default_value(value: f64) -> Self {
        Self {
            value,
            source: MetricSource::Default,
        }
    }

    /// Whether the fallback chain bottomed out in a literal default.
    pub fn used_default(&self) -> bool {
        self.source == MetricSource::Default
    }
}

/// Balance-sheet figures resolved through the cross-derivation chain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheet {
    pub total_assets: Resolved,
    pub total_liabilities: Resolved,
}

/// Resolves required figures from a dataset, applying the fallback
/// chains of the policy. Borrows the dataset; models construct one per
/// run.
pub struct MetricResolver<'a> {
    dataset: &'a FinancialDataset,
    policy: FallbackPolicy,
}

impl<'a> MetricResolver<'a> {
    /// Create a resolver with the default fallback policy.
    pub fn new(dataset: &'a FinancialDataset) -> Self {
        Self {
            dataset,
            policy: FallbackPolicy::default(),
        }
    }

    /// Create a resolver with a custom fallback policy.
    pub fn with_policy(dataset: &'a FinancialDataset, policy: FallbackPolicy) -> Self {
        Self { dataset, policy }
    }

    /// The policy in effect.
    pub fn policy(&self) -> &FallbackPolicy {
        &self.policy
    }

    /// Most recent reported value, no fallback.
    pub fn latest(&self, metric: Metric) -> Option<f64> {
        self.dataset.latest(metric)
    }

    /// Total debt: reported value, else 0.
    pub fn debt(&self) -> Resolved {
        match self.dataset.latest(Metric::TotalDebt) {
            Some(v) => Resolved::reported(v),
            None => Resolved::default_value(0.0),
        }
    }

    /// Cash and equivalents: reported value, else 0.
    pub fn cash(&self) -> Resolved {
        match self.dataset.latest(Metric::Cash) {
            Some(v) => Resolved::reported(v),
            None => Resolved::default_value(0.0),
        }
    }

    /// Base free cash flow for DCF projection.
    ///
    /// Chain: reported FCF → conversion from EBITDA → conversion from
    /// an assumed EBITDA margin on revenue → policy default.
    pub fn base_fcf(&self) -> Resolved {
        if let Some(fcf) = self.dataset.latest(Metric::Fcf) {
            return Resolved::reported(fcf);
        }
        if let Some(ebitda) = self.dataset.latest(Metric::Ebitda) {
            return Resolved::derived(ebitda * self.policy.fcf_ebitda_conversion);
        }
        if let Some(revenue) = self.dataset.latest(Metric::Revenue) {
            let estimated_ebitda = revenue * self.policy.default_ebitda_margin;
            return Resolved::derived(estimated_ebitda * self.policy.fcf_ebitda_conversion);
        }
        Resolved::default_value(self.policy.default_base_fcf)
    }

    /// Base EBITDA for the LBO path.
    ///
    /// Chain: reported EBITDA → assumed margin on revenue → policy
    /// default.
    pub fn base_ebitda(&self) -> Resolved {
        if let Some(ebitda) = self.dataset.latest(Metric::Ebitda) {
            return Resolved::reported(ebitda);
        }
        if let Some(revenue) = self.dataset.latest(Metric::Revenue) {
            return Resolved::derived(revenue * self.policy.default_ebitda_margin);
        }
        Resolved::default_value(self.policy.default_base_ebitda)
    }

    /// Resolve total assets and total liabilities together.
    ///
    /// The two figures cross-derive, so they are resolved as a pair:
    ///
    /// 1. liabilities: reported → debt × multiplier
    /// 2. assets: reported → equity + liabilities (if both known)
    /// 3. liabilities (still unknown): assets − equity (if both known)
    /// 4. assets (still unknown): policy default
    /// 5. liabilities (still unknown): assets × liability ratio
    pub fn balance_sheet(&self) -> BalanceSheet {
        let equity = self.dataset.latest(Metric::Equity);

        let mut liabilities = match self.dataset.latest(Metric::TotalLiabilities) {
            Some(v) => Some(Resolved::reported(v)),
            None => self
                .dataset
                .latest(Metric::TotalDebt)
                .map(|debt| Resolved::derived(debt * self.policy.liability_debt_multiplier)),
        };

        let mut assets = self.dataset.latest(Metric::TotalAssets).map(Resolved::reported);

        if assets.is_none() {
            if let (Some(eq), Some(liab)) = (equity, liabilities) {
                assets = Some(Resolved::derived(eq + liab.value));
            }
        }

        if liabilities.is_none() {
            if let (Some(a), Some(eq)) = (assets, equity) {
                liabilities = Some(Resolved::derived(a.value - eq));
            }
        }

        let total_assets =
            assets.unwrap_or_else(|| Resolved::default_value(self.policy.default_total_assets));
        let total_liabilities = liabilities.unwrap_or_else(|| {
            Resolved::default_value(total_assets.value * self.policy.liability_asset_ratio)
        });

        BalanceSheet {
            total_assets,
            total_liabilities,
        }
    }
}
