//! Asset-based valuation.
//!
//! Values the company from its balance sheet: resolved total assets
//! less total liabilities, with an optional haircut applied to the
//! asset side for liquidation-style scenarios.

use serde::{Deserialize, Serialize};

use crate::dataset::FinancialDataset;
use crate::models::{ValuationDetail, ValuationMethod, ValuationResult};
use crate::resolver::{MetricResolver, MetricSource};
use valuit_common::{Error, Result};

/// Asset-based parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetBasedParams {
    /// Haircut applied to total assets, in [0, 1)
    pub asset_discount: f64,
}

/// Asset-based detail record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetBasedDetail {
    pub total_assets: f64,
    pub total_assets_source: MetricSource,
    pub total_liabilities: f64,
    pub total_liabilities_source: MetricSource,
    /// Equity at book value, before the haircut
    pub book_equity: f64,
    pub asset_discount: f64,
    pub adjusted_assets: f64,
    pub adjusted_equity: f64,
}

/// Asset-based valuation model.
pub struct AssetBasedModel {
    params: AssetBasedParams,
}

impl AssetBasedModel {
    pub fn new(params: AssetBasedParams) -> Self {
        Self { params }
    }

    /// Run the asset-based valuation.
    pub fn run(&self, dataset: &FinancialDataset) -> Result<ValuationResult> {
        let discount = self.params.asset_discount;
        if !(0.0..1.0).contains(&discount) {
            return Err(Error::invalid_parameter(format!(
                "asset_discount ({discount}) must be in [0, 1)"
            )));
        }

        let balance = MetricResolver::new(dataset).balance_sheet();
        let assets = balance.total_assets.value;
        let liabilities = balance.total_liabilities.value;

        let book_equity = assets - liabilities;
        let adjusted_assets = assets * (1.0 - discount);
        let adjusted_equity = adjusted_assets - liabilities;

        tracing::debug!(
            total_assets = assets,
            total_liabilities = liabilities,
            adjusted_equity,
            "Asset-based valuation complete"
        );

        Ok(ValuationResult {
            enterprise_value: adjusted_assets,
            equity_value: adjusted_equity,
            method: ValuationMethod::AssetBased,
            detail: ValuationDetail::AssetBased(AssetBasedDetail {
                total_assets: assets,
                total_assets_source: balance.total_assets.source,
                total_liabilities: liabilities,
                total_liabilities_source: balance.total_liabilities.source,
                book_equity,
                asset_discount: discount,
                adjusted_assets,
                adjusted_equity,
            }),
        })
    }
}
