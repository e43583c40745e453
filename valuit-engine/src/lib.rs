//! ValuIt Valuation Engine
//!
//! Estimates a company's enterprise and equity value from partial,
//! possibly-incomplete historical financial data, using five
//! independent methodologies.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     valuit-engine                               │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────────┐  │
//! │  │   Metric     │  │  Financial   │  │  Valuation Models    │  │
//! │  │   Resolver   │  │ Calculations │  │  DCF / Comps / Txns  │  │
//! │  │  (fallbacks) │  │ (WACC, TV)   │  │  Asset-Based / LBO   │  │
//! │  └──────────────┘  └──────────────┘  └──────────────────────┘  │
//! │  ┌──────────────┐  ┌──────────────────────────────────────┐    │
//! │  │ Sensitivity  │  │  Peer / Transaction Lookup (traits)  │    │
//! │  │   Analyzer   │  │  external market-data collaborators  │    │
//! │  └──────────────┘  └──────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Concepts
//!
//! - **Fallback chains**: every required metric resolves through a
//!   documented derivation chain and terminates in a named default,
//!   so a valuation never fails on missing data. Each resolved figure
//!   carries its [`resolver::MetricSource`] for transparency.
//! - **Positional recency**: dataset series are most-recent-first; the
//!   "latest" value of a metric is the first entry, by contract.
//! - **Pure models**: every model is a synchronous, side-effect-free
//!   function over immutable inputs. Identical inputs yield
//!   bit-identical results.
//!
//! # Usage
//!
//! ```ignore
//! use valuit_engine::dataset::{FinancialDataset, Metric};
//! use valuit_engine::models::dcf::{DcfModel, DcfParams};
//!
//! let mut dataset = FinancialDataset::new();
//! dataset.insert(Metric::Fcf, vec![("2023", 100.0).into()]);
//!
//! let model = DcfModel::new(DcfParams {
//!     growth_rate: 0.05,
//!     wacc: 0.10,
//!     terminal_growth_rate: 0.02,
//!     forecast_years: 5,
//! });
//! let result = model.run(&dataset)?;
//! println!("EV: {:.0}", result.enterprise_value);
//! ```

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod assumptions;
pub mod calc;
pub mod comps;
pub mod dataset;
pub mod models;
pub mod resolver;
pub mod sensitivity;

pub use dataset::{FinancialDataset, Metric, PeriodValue};
pub use models::{ValuationDetail, ValuationMethod, ValuationModel, ValuationResult};
pub use resolver::{FallbackPolicy, MetricResolver, MetricSource, Resolved};
pub use sensitivity::{IrrSensitivity, SensitivityGrid};
