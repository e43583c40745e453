//! Valuit - company valuation engine.
//!
//! Reads a valuation request as JSON (from a file argument or stdin),
//! runs the selected model against the supplied financial dataset, and
//! prints the result as JSON on stdout.
//!
//! ```text
//! valuit request.json
//! cat request.json | valuit
//! ```

use std::io::Read;

use anyhow::{Context, Result};
use serde::Deserialize;

use valuit_common::logging::init_logging;
use valuit_engine::comps::{InMemoryPeers, SampleTransactionBook};
use valuit_engine::models::DcfParams;
use valuit_engine::{FinancialDataset, ValuationModel};

/// A single valuation request: the dataset plus the model selection.
/// When no model is given, a DCF seeded from the industry baseline
/// assumptions is run.
#[derive(Debug, Deserialize)]
struct ValuationRequest {
    dataset: FinancialDataset,
    model: Option<ValuationModel>,
    industry: Option<String>,
}

fn main() -> Result<()> {
    let log_level = std::env::var("VALUIT_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_format = std::env::var("VALUIT_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());
    init_logging(&log_level, &log_format);

    tracing::info!("Valuit v{}", env!("CARGO_PKG_VERSION"));

    let raw = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read request file {path}"))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read request from stdin")?;
            buf
        }
    };

    let request: ValuationRequest =
        serde_json::from_str(&raw).context("failed to parse valuation request")?;

    let model = request.model.unwrap_or_else(|| {
        let industry = request.industry.as_deref().unwrap_or("Default");
        tracing::info!(industry, "No model given, running DCF with industry baseline");
        ValuationModel::Dcf(DcfParams::for_industry(industry))
    });

    let peers = InMemoryPeers::default();
    let transactions = SampleTransactionBook;

    let result = model
        .run(&request.dataset, &peers, &transactions)
        .context("valuation failed")?;

    tracing::info!(
        method = %result.method,
        enterprise_value = result.enterprise_value,
        equity_value = result.equity_value,
        "valuation complete"
    );

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
