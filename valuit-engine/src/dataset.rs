//! Financial dataset types.
//!
//! A [`FinancialDataset`] maps each [`Metric`] to an ordered series of
//! period observations. Series are **most-recent-first**: the "latest"
//! value of a metric is positionally the first entry. This is a
//! contract on the input ordering (the data-access collaborator builds
//! series in descending chronological order), not a timestamp
//! comparison performed here.
//!
//! The dataset is read-only to the engine. An absent metric reads as
//! an empty series, never as an error; a present metric always has at
//! least one observation (empty series are dropped on insert).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A financial metric tracked in a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Revenue,
    Ebitda,
    NetIncome,
    TotalAssets,
    TotalLiabilities,
    TotalDebt,
    Cash,
    Equity,
    Fcf,
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Revenue => "revenue",
            Self::Ebitda => "ebitda",
            Self::NetIncome => "net_income",
            Self::TotalAssets => "total_assets",
            Self::TotalLiabilities => "total_liabilities",
            Self::TotalDebt => "total_debt",
            Self::Cash => "cash",
            Self::Equity => "equity",
            Self::Fcf => "fcf",
        };
        write!(f, "{}", name)
    }
}

/// One labelled observation in a metric series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodValue {
    /// Period label (e.g., "2023", "2023-Q4")
    pub period: String,
    /// Observed value
    pub value: f64,
}

impl From<(String, f64)> for PeriodValue {
    fn from((period, value): (String, f64)) -> Self {
        Self { period, value }
    }
}

impl From<(&str, f64)> for PeriodValue {
    fn from((period, value): (&str, f64)) -> Self {
        Self {
            period: period.to_string(),
            value,
        }
    }
}

/// Historical financial data for one company.
///
/// Built per request by an external data-access collaborator and
/// handed to the engine read-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialDataset {
    /// Metric series, each most-recent-first
    #[serde(flatten)]
    series: HashMap<Metric, Vec<PeriodValue>>,
}

impl FinancialDataset {
    /// Create an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a series for a metric, replacing any existing one.
    ///
    /// The series must be most-recent-first. An empty series is
    /// dropped so that "present but empty" can never be observed.
    pub fn insert(&mut self, metric: Metric, values: Vec<PeriodValue>) {
        if values.is_empty() {
            self.series.remove(&metric);
        } else {
            self.series.insert(metric, values);
        }
    }

    /// Convenience: insert a single most-recent observation.
    pub fn insert_latest(&mut self, metric: Metric, period: impl Into<String>, value: f64) {
        self.insert(
            metric,
            vec![PeriodValue {
                period: period.into(),
                value,
            }],
        );
    }

    /// Get the series for a metric; absent metrics read as empty.
    pub fn get(&self, metric: Metric) -> &[PeriodValue] {
        self.series.get(&metric).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Most recent value of a metric, i.e. the first entry of its
    /// series (positional-recency contract).
    pub fn latest(&self, metric: Metric) -> Option<f64> {
        self.series
            .get(&metric)
            .and_then(|s| s.first())
            .map(|pv| pv.value)
    }

    /// Whether any data exists for the metric.
    pub fn has(&self, metric: Metric) -> bool {
        self.series.contains_key(&metric)
    }

    /// Metrics present in this dataset.
    pub fn metrics(&self) -> impl Iterator<Item = Metric> + '_ {
        self.series.keys().copied()
    }
}
