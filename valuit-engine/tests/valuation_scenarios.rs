//! End-to-end valuation scenarios through the [`ValuationModel`]
//! entry point, including JSON request parsing, lookup degradation,
//! and determinism across repeated runs.

use valuit_engine::comps::{
    ComparablePeer, InMemoryPeers, PeerLookup, PrecedentTransaction, SampleTransactionBook,
    TransactionLookup,
};
use valuit_engine::models::{DcfParams, LboParams};
use valuit_engine::{
    FinancialDataset, Metric, MetricSource, ValuationDetail, ValuationMethod, ValuationModel,
};

// ============================================================================
// Fixtures
// ============================================================================

/// Lookup collaborators that always fail, to exercise degradation.
struct Unavailable;

impl PeerLookup for Unavailable {
    fn peers(
        &self,
        _ticker: &str,
        _industry: &str,
    ) -> valuit_common::Result<Vec<ComparablePeer>> {
        Err(valuit_common::Error::external("market data offline"))
    }
}

impl TransactionLookup for Unavailable {
    fn transactions(&self, _industry: &str) -> valuit_common::Result<Vec<PrecedentTransaction>> {
        Err(valuit_common::Error::external("deal database offline"))
    }
}

fn sample_dataset() -> FinancialDataset {
    let mut ds = FinancialDataset::new();
    ds.insert(
        Metric::Fcf,
        vec![("2023", 100.0).into(), ("2022", 90.0).into()],
    );
    ds.insert_latest(Metric::Revenue, "2023", 500.0);
    ds.insert_latest(Metric::Ebitda, "2023", 120.0);
    ds.insert_latest(Metric::NetIncome, "2023", 60.0);
    ds.insert_latest(Metric::TotalDebt, "2023", 50.0);
    ds.insert_latest(Metric::Cash, "2023", 20.0);
    ds
}

fn dcf_model() -> ValuationModel {
    ValuationModel::Dcf(DcfParams {
        growth_rate: 0.05,
        wacc: 0.10,
        terminal_growth_rate: 0.02,
        forecast_years: 2,
    })
}

// ============================================================================
// Dispatch and JSON surface
// ============================================================================

#[test]
fn test_model_parses_from_tagged_json() {
    let raw = r#"{
        "method": "dcf",
        "growth_rate": 0.05,
        "wacc": 0.10,
        "terminal_growth_rate": 0.02,
        "forecast_years": 2
    }"#;
    let model: ValuationModel = serde_json::from_str(raw).unwrap();
    assert_eq!(model.method(), ValuationMethod::Dcf);
    assert_eq!(model, dcf_model());
}

#[test]
fn test_dataset_parses_from_json() {
    let raw = r#"{
        "fcf": [{ "period": "2023", "value": 100.0 }],
        "total_debt": [{ "period": "2023", "value": 50.0 }]
    }"#;
    let ds: FinancialDataset = serde_json::from_str(raw).unwrap();
    assert_eq!(ds.latest(Metric::Fcf), Some(100.0));
    assert_eq!(ds.latest(Metric::TotalDebt), Some(50.0));
    assert_eq!(ds.latest(Metric::Ebitda), None);
}

#[test]
fn test_every_method_dispatches() {
    let dataset = sample_dataset();
    let peers = InMemoryPeers::new(vec![ComparablePeer {
        ticker: "PEER".to_string(),
        name: "Peer Co".to_string(),
        market_cap: Some(1_000.0),
        ev_ebitda: Some(11.0),
        pe_ratio: Some(18.0),
        ev_revenue: Some(3.0),
    }]);
    let transactions = SampleTransactionBook;

    let models: Vec<ValuationModel> = vec![
        dcf_model(),
        serde_json::from_value(serde_json::json!({
            "method": "comparable_company",
            "industry": "Technology",
            "ticker": "ACME",
            "ev_ebitda_multiple": 12.0,
            "pe_ratio": 20.0,
            "ev_revenue_multiple": 4.0
        }))
        .unwrap(),
        serde_json::from_value(serde_json::json!({
            "method": "precedent_transactions",
            "industry": "Technology",
            "ev_ebitda_multiple": 14.0,
            "ev_revenue_multiple": 5.0
        }))
        .unwrap(),
        serde_json::from_value(serde_json::json!({
            "method": "asset_based",
            "asset_discount": 0.2
        }))
        .unwrap(),
        ValuationModel::Lbo(LboParams {
            exit_year: 5,
            exit_multiple: 8.0,
            target_irr: 0.20,
        }),
    ];

    for model in models {
        let result = model.run(&dataset, &peers, &transactions).unwrap();
        assert_eq!(result.method, model.method());
        assert!(
            result.enterprise_value.is_finite(),
            "{} produced a non-finite EV",
            result.method
        );
        // The detail record must round-trip through JSON
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"kind\""));
    }
}

// ============================================================================
// Reference DCF scenario
// ============================================================================

#[test]
fn test_dcf_reference_scenario_end_to_end() {
    let dataset = sample_dataset();
    let result = dcf_model()
        .run(&dataset, &InMemoryPeers::default(), &SampleTransactionBook)
        .unwrap();

    // FCF 100 at 5% growth for two years, discounted at 10%, terminal
    // growth 2%: forecast [105, 110.25], TV = 112.455 / 0.08.
    let expected_ev = 105.0 / 1.1 + 110.25 / 1.21 + (110.25 * 1.02 / 0.08) / 1.21;
    assert!((result.enterprise_value - expected_ev).abs() < 1e-6);
    assert!((result.equity_value - (expected_ev - 50.0 + 20.0)).abs() < 1e-6);

    match result.detail {
        ValuationDetail::Dcf(d) => {
            assert_eq!(d.base_fcf, 100.0);
            assert_eq!(d.base_fcf_source, MetricSource::Reported);
            assert!((d.terminal_value - 110.25 * 1.02 / 0.08).abs() < 1e-9);
            assert_eq!(d.sensitivity.values.len(), 5);
        }
        other => panic!("expected DCF detail, got {other:?}"),
    }
}

// ============================================================================
// Degradation and determinism
// ============================================================================

#[test]
fn test_multiples_models_survive_offline_lookups() {
    let dataset = sample_dataset();

    let comps: ValuationModel = serde_json::from_value(serde_json::json!({
        "method": "comparable_company",
        "industry": "Technology",
        "ticker": "ACME",
        "ev_ebitda_multiple": 12.0,
        "pe_ratio": 20.0,
        "ev_revenue_multiple": 4.0
    }))
    .unwrap();
    let result = comps.run(&dataset, &Unavailable, &Unavailable).unwrap();
    // EBITDA 120 × 12 with no peer context
    assert!((result.enterprise_value - 1440.0).abs() < 1e-9);
    match result.detail {
        ValuationDetail::ComparableCompany(d) => assert!(d.comparable_companies.is_empty()),
        other => panic!("expected comparable-company detail, got {other:?}"),
    }

    let precedent: ValuationModel = serde_json::from_value(serde_json::json!({
        "method": "precedent_transactions",
        "industry": "Technology",
        "ev_ebitda_multiple": 14.0,
        "ev_revenue_multiple": 5.0
    }))
    .unwrap();
    let result = precedent.run(&dataset, &Unavailable, &Unavailable).unwrap();
    assert!((result.enterprise_value - 120.0 * 14.0).abs() < 1e-9);
    match result.detail {
        ValuationDetail::PrecedentTransactions(d) => assert!(d.transactions.is_empty()),
        other => panic!("expected precedent detail, got {other:?}"),
    }
}

#[test]
fn test_repeated_runs_are_bit_identical() {
    let dataset = sample_dataset();
    let peers = InMemoryPeers::default();
    let transactions = SampleTransactionBook;

    for model in [
        dcf_model(),
        ValuationModel::Lbo(LboParams {
            exit_year: 5,
            exit_multiple: 8.0,
            target_irr: 0.20,
        }),
    ] {
        let first = model.run(&dataset, &peers, &transactions).unwrap();
        let second = model.run(&dataset, &peers, &transactions).unwrap();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap(),
            "{} must be deterministic",
            model.method()
        );
    }
}

#[test]
fn test_invalid_parameters_are_rejected() {
    let dataset = sample_dataset();
    let peers = InMemoryPeers::default();
    let transactions = SampleTransactionBook;

    // WACC at the terminal growth rate makes the perpetuity undefined
    let bad_dcf = ValuationModel::Dcf(DcfParams {
        growth_rate: 0.05,
        wacc: 0.02,
        terminal_growth_rate: 0.02,
        forecast_years: 5,
    });
    let err = bad_dcf.run(&dataset, &peers, &transactions).unwrap_err();
    assert!(err.to_string().to_lowercase().contains("invalid parameter"));

    let bad_lbo = ValuationModel::Lbo(LboParams {
        exit_year: 0,
        exit_multiple: 8.0,
        target_irr: 0.20,
    });
    assert!(bad_lbo.run(&dataset, &peers, &transactions).is_err());
}
