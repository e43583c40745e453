//! Per-industry default modelling assumptions.
//!
//! When a caller supplies no multiples or rate assumptions, the engine
//! falls back to these industry baselines. They are deliberately
//! coarse: named configuration for the tool's starting point, not
//! market estimates.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default modelling assumptions for one industry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndustryAssumptions {
    /// Annual revenue growth (decimal)
    pub revenue_growth: f64,
    /// EBITDA margin (decimal)
    pub ebitda_margin: f64,
    /// Discount rate (decimal)
    pub wacc: f64,
    /// Terminal growth rate (decimal)
    pub terminal_growth: f64,
    pub ev_ebitda: f64,
    pub pe_ratio: f64,
    pub ev_revenue: f64,
}

static INDUSTRY_DEFAULTS: Lazy<HashMap<&'static str, IndustryAssumptions>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert(
        "Technology",
        IndustryAssumptions {
            revenue_growth: 0.15,
            ebitda_margin: 0.25,
            wacc: 0.10,
            terminal_growth: 0.03,
            ev_ebitda: 15.0,
            pe_ratio: 25.0,
            ev_revenue: 5.0,
        },
    );
    m.insert(
        "Healthcare",
        IndustryAssumptions {
            revenue_growth: 0.10,
            ebitda_margin: 0.20,
            wacc: 0.09,
            terminal_growth: 0.025,
            ev_ebitda: 12.0,
            pe_ratio: 20.0,
            ev_revenue: 3.0,
        },
    );
    m.insert(
        "Financial Services",
        IndustryAssumptions {
            revenue_growth: 0.07,
            ebitda_margin: 0.40,
            wacc: 0.08,
            terminal_growth: 0.02,
            ev_ebitda: 10.0,
            pe_ratio: 15.0,
            ev_revenue: 2.0,
        },
    );
    m.insert(
        "Consumer Goods",
        IndustryAssumptions {
            revenue_growth: 0.05,
            ebitda_margin: 0.15,
            wacc: 0.07,
            terminal_growth: 0.02,
            ev_ebitda: 10.0,
            pe_ratio: 18.0,
            ev_revenue: 1.5,
        },
    );
    m.insert(
        "Energy",
        IndustryAssumptions {
            revenue_growth: 0.03,
            ebitda_margin: 0.30,
            wacc: 0.10,
            terminal_growth: 0.015,
            ev_ebitda: 8.0,
            pe_ratio: 12.0,
            ev_revenue: 1.2,
        },
    );
    m.insert(
        "Industrials",
        IndustryAssumptions {
            revenue_growth: 0.06,
            ebitda_margin: 0.18,
            wacc: 0.09,
            terminal_growth: 0.02,
            ev_ebitda: 11.0,
            pe_ratio: 17.0,
            ev_revenue: 1.8,
        },
    );
    m.insert(
        "Communication Services",
        IndustryAssumptions {
            revenue_growth: 0.08,
            ebitda_margin: 0.22,
            wacc: 0.08,
            terminal_growth: 0.025,
            ev_ebitda: 10.0,
            pe_ratio: 18.0,
            ev_revenue: 3.5,
        },
    );
    m.insert(
        "Utilities",
        IndustryAssumptions {
            revenue_growth: 0.03,
            ebitda_margin: 0.35,
            wacc: 0.06,
            terminal_growth: 0.015,
            ev_ebitda: 9.0,
            pe_ratio: 16.0,
            ev_revenue: 2.5,
        },
    );
    m.insert(
        "Real Estate",
        IndustryAssumptions {
            revenue_growth: 0.04,
            ebitda_margin: 0.55,
            wacc: 0.07,
            terminal_growth: 0.018,
            ev_ebitda: 14.0,
            pe_ratio: 20.0,
            ev_revenue: 7.0,
        },
    );
    m.insert(
        "Basic Materials",
        IndustryAssumptions {
            revenue_growth: 0.05,
            ebitda_margin: 0.20,
            wacc: 0.09,
            terminal_growth: 0.017,
            ev_ebitda: 9.0,
            pe_ratio: 14.0,
            ev_revenue: 1.5,
        },
    );
    m.insert("Default", DEFAULT_ASSUMPTIONS);
    m
});

/// Generic assumptions used when the industry is not covered.
pub const DEFAULT_ASSUMPTIONS: IndustryAssumptions = IndustryAssumptions {
    revenue_growth: 0.07,
    ebitda_margin: 0.20,
    wacc: 0.09,
    terminal_growth: 0.025,
    ev_ebitda: 10.0,
    pe_ratio: 15.0,
    ev_revenue: 2.0,
};

/// Assumptions for an industry, falling back to the generic row.
pub fn for_industry(industry: &str) -> IndustryAssumptions {
    INDUSTRY_DEFAULTS
        .get(industry)
        .copied()
        .unwrap_or(DEFAULT_ASSUMPTIONS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_industry() {
        let tech = for_industry("Technology");
        assert_eq!(tech.ev_ebitda, 15.0);
        assert!(tech.wacc > tech.terminal_growth);
    }

    #[test]
    fn test_unknown_industry_falls_back() {
        assert_eq!(for_industry("Shipping Containers"), DEFAULT_ASSUMPTIONS);
    }

    #[test]
    fn test_all_rows_have_valid_rate_spread() {
        for industry in INDUSTRY_DEFAULTS.keys() {
            let a = for_industry(industry);
            assert!(a.wacc > a.terminal_growth, "bad spread for {industry}");
        }
    }
}
