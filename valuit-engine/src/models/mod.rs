//! Valuation model variants.
//!
//! The five methodologies share one shape: construct with parameters,
//! run against a dataset, produce a [`ValuationResult`] carrying the
//! headline numbers plus a method-specific detail record. The
//! [`ValuationModel`] enum is the single entry point; callers that
//! know the method statically can use the model types directly.

pub mod asset_based;
pub mod comparable;
pub mod dcf;
pub mod lbo;
pub mod precedent;

use serde::{Deserialize, Serialize};

use crate::comps::{PeerLookup, TransactionLookup};
use crate::dataset::FinancialDataset;
use valuit_common::Result;

pub use asset_based::{AssetBasedDetail, AssetBasedModel, AssetBasedParams};
pub use comparable::{ComparableCompanyDetail, ComparableCompanyModel, ComparableCompanyParams};
pub use dcf::{DcfDetail, DcfModel, DcfParams};
pub use lbo::{LboAssumptions, LboDetail, LboModel, LboParams};
pub use precedent::{
    PrecedentTransactionsDetail, PrecedentTransactionsModel, PrecedentTransactionsParams,
};

/// Valuation methodology tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValuationMethod {
    Dcf,
    ComparableCompany,
    PrecedentTransactions,
    AssetBased,
    Lbo,
}

impl std::fmt::Display for ValuationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dcf => write!(f, "DCF"),
            Self::ComparableCompany => write!(f, "Comparable Company Analysis"),
            Self::PrecedentTransactions => write!(f, "Precedent Transactions"),
            Self::AssetBased => write!(f, "Asset-Based Valuation"),
            Self::Lbo => write!(f, "LBO"),
        }
    }
}

/// Which multiple produced the headline numbers in a multiples-based
/// model. `None` means no metric was available and the result is
/// reported as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultipleBasis {
    EvEbitda,
    EvRevenue,
    PriceEarnings,
    None,
}

impl std::fmt::Display for MultipleBasis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EvEbitda => write!(f, "EV/EBITDA"),
            Self::EvRevenue => write!(f, "EV/Revenue"),
            Self::PriceEarnings => write!(f, "P/E"),
            Self::None => write!(f, "N/A"),
        }
    }
}

/// Method-specific detail record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValuationDetail {
    Dcf(DcfDetail),
    ComparableCompany(ComparableCompanyDetail),
    PrecedentTransactions(PrecedentTransactionsDetail),
    AssetBased(AssetBasedDetail),
    Lbo(LboDetail),
}

/// The outcome of one valuation run.
///
/// Created fresh per invocation and immutable once returned; the
/// report/export collaborators only read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    pub enterprise_value: f64,
    pub equity_value: f64,
    pub method: ValuationMethod,
    pub detail: ValuationDetail,
}

/// A valuation model selected at runtime, with its parameters.
///
/// Serde-tagged so a model selection can travel as JSON
/// (`{"method": "dcf", "growth_rate": ...}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum ValuationModel {
    Dcf(DcfParams),
    ComparableCompany(ComparableCompanyParams),
    PrecedentTransactions(PrecedentTransactionsParams),
    AssetBased(AssetBasedParams),
    Lbo(LboParams),
}

impl ValuationModel {
    /// The methodology tag for this variant.
    pub fn method(&self) -> ValuationMethod {
        match self {
            Self::Dcf(_) => ValuationMethod::Dcf,
            Self::ComparableCompany(_) => ValuationMethod::ComparableCompany,
            Self::PrecedentTransactions(_) => ValuationMethod::PrecedentTransactions,
            Self::AssetBased(_) => ValuationMethod::AssetBased,
            Self::Lbo(_) => ValuationMethod::Lbo,
        }
    }

    /// Run the selected model against a dataset.
    ///
    /// The lookup collaborators are only consulted by the
    /// multiples-based variants; the others ignore them.
    pub fn run(
        &self,
        dataset: &FinancialDataset,
        peers: &dyn PeerLookup,
        transactions: &dyn TransactionLookup,
    ) -> Result<ValuationResult> {
        match self {
            Self::Dcf(params) => DcfModel::new(params.clone()).run(dataset),
            Self::ComparableCompany(params) => {
                ComparableCompanyModel::new(params.clone()).run(dataset, peers)
            }
            Self::PrecedentTransactions(params) => {
                PrecedentTransactionsModel::new(params.clone()).run(dataset, transactions)
            }
            Self::AssetBased(params) => AssetBasedModel::new(params.clone()).run(dataset),
            Self::Lbo(params) => LboModel::new(params.clone()).run(dataset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_display_tags() {
        assert_eq!(ValuationMethod::Dcf.to_string(), "DCF");
        assert_eq!(
            ValuationMethod::ComparableCompany.to_string(),
            "Comparable Company Analysis"
        );
        assert_eq!(MultipleBasis::None.to_string(), "N/A");
    }

    #[test]
    fn test_model_selection_from_json() {
        let json = r#"{
            "method": "dcf",
            "growth_rate": 0.05,
            "wacc": 0.10,
            "terminal_growth_rate": 0.02,
            "forecast_years": 5
        }"#;
        let model: ValuationModel = serde_json::from_str(json).unwrap();
        assert_eq!(model.method(), ValuationMethod::Dcf);
    }
}
