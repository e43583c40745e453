//! Peer and transaction lookup collaborators.
//!
//! The multiples-based models consult external market data: a peer
//! list for comparable-company analysis and an M&A transaction list
//! for precedent-transaction analysis. Both are modelled as
//! synchronous traits so callers can plug in live data sources,
//! caches, or fixtures.
//!
//! Lookup failure never fails a valuation: the models degrade to an
//! empty peer list (logged at warn) and keep the primary numbers.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use valuit_common::Result;

/// A comparable public company with its trading multiples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparablePeer {
    pub ticker: String,
    pub name: String,
    /// Market capitalization, when known
    pub market_cap: Option<f64>,
    pub ev_ebitda: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub ev_revenue: Option<f64>,
}

/// A precedent M&A transaction with its implied multiples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecedentTransaction {
    pub target: String,
    pub acquirer: String,
    /// Announcement/close date
    pub date: NaiveDate,
    /// Transaction value in $B
    pub value: f64,
    pub ev_ebitda: f64,
    pub ev_revenue: f64,
}

/// Source of comparable-company peers for a subject company.
pub trait PeerLookup {
    /// Peers for the subject's ticker and industry.
    fn peers(&self, ticker: &str, industry: &str) -> Result<Vec<ComparablePeer>>;
}

/// Source of precedent M&A transactions for an industry.
///
/// By convention an unknown industry yields a non-empty generic
/// sequence, not an empty one.
pub trait TransactionLookup {
    /// Recent transactions in the industry.
    fn transactions(&self, industry: &str) -> Result<Vec<PrecedentTransaction>>;
}

/// Fetch peers, degrading to an empty list on collaborator failure.
pub fn peers_or_empty(
    lookup: &dyn PeerLookup,
    ticker: &str,
    industry: &str,
) -> Vec<ComparablePeer> {
    match lookup.peers(ticker, industry) {
        Ok(peers) => peers,
        Err(e) => {
            tracing::warn!(error = %e, ticker, industry, "Peer lookup failed, continuing without comparables");
            Vec::new()
        }
    }
}

/// Fetch transactions, degrading to an empty list on collaborator
/// failure.
pub fn transactions_or_empty(
    lookup: &dyn TransactionLookup,
    industry: &str,
) -> Vec<PrecedentTransaction> {
    match lookup.transactions(industry) {
        Ok(txns) => txns,
        Err(e) => {
            tracing::warn!(error = %e, industry, "Transaction lookup failed, continuing without precedents");
            Vec::new()
        }
    }
}

/// Fixed peer list supplied by the caller. Useful for tests and for
/// callers that fetch market data upstream.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPeers {
    pub peers: Vec<ComparablePeer>,
}

impl InMemoryPeers {
    pub fn new(peers: Vec<ComparablePeer>) -> Self {
        Self { peers }
    }
}

impl PeerLookup for InMemoryPeers {
    fn peers(&self, _ticker: &str, _industry: &str) -> Result<Vec<ComparablePeer>> {
        Ok(self.peers.clone())
    }
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("literal date")
}

fn txn(
    target: &str,
    acquirer: &str,
    date: NaiveDate,
    value: f64,
    ev_ebitda: f64,
    ev_revenue: f64,
) -> PrecedentTransaction {
    PrecedentTransaction {
        target: target.to_string(),
        acquirer: acquirer.to_string(),
        date,
        value,
        ev_ebitda,
        ev_revenue,
    }
}

/// Built-in sample transactions per industry, with a generic table for
/// industries not covered.
static SAMPLE_TRANSACTIONS: Lazy<HashMap<&'static str, Vec<PrecedentTransaction>>> =
    Lazy::new(|| {
        let mut m = HashMap::new();
        m.insert(
            "Technology",
            vec![
                txn("Activision Blizzard", "Microsoft", day(2022, 1, 18), 68.7, 28.0, 7.5),
                txn("VMware", "Broadcom", day(2022, 5, 26), 61.0, 18.5, 5.9),
                txn("Twitter", "Elon Musk", day(2022, 10, 27), 44.0, 42.0, 8.2),
            ],
        );
        m.insert(
            "Healthcare",
            vec![
                txn("Allergan", "AbbVie", day(2020, 5, 8), 63.0, 15.8, 6.5),
                txn("Alexion", "AstraZeneca", day(2021, 7, 21), 39.0, 16.2, 7.1),
                txn("Pfizer Consumer Health", "GSK", day(2019, 8, 1), 12.7, 17.5, 3.2),
            ],
        );
        m.insert(
            "Financial Services",
            vec![
                txn("E*TRADE", "Morgan Stanley", day(2020, 10, 2), 13.0, 11.0, 3.8),
                txn("TD Ameritrade", "Charles Schwab", day(2020, 10, 6), 22.0, 10.5, 4.1),
                txn("Credit Karma", "Intuit", day(2020, 12, 3), 7.1, 23.0, 7.2),
            ],
        );
        m.insert(
            "Default",
            vec![
                txn("Sample Target A", "Sample Acquirer X", day(2022, 1, 1), 10.0, 12.0, 3.0),
                txn("Sample Target B", "Sample Acquirer Y", day(2021, 6, 15), 5.0, 10.0, 2.5),
                txn("Sample Target C", "Sample Acquirer Z", day(2020, 11, 30), 8.0, 11.0, 2.8),
            ],
        );
        m
    });

/// Built-in transaction source backed by a static per-industry table.
///
/// Unknown industries fall back to the generic table, keeping the
/// non-empty-by-convention contract of [`TransactionLookup`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleTransactionBook;

impl TransactionLookup for SampleTransactionBook {
    fn transactions(&self, industry: &str) -> Result<Vec<PrecedentTransaction>> {
        let table = SAMPLE_TRANSACTIONS
            .get(industry)
            .unwrap_or_else(|| &SAMPLE_TRANSACTIONS["Default"]);
        Ok(table.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use valuit_common::Error;

    struct FailingPeers;

    impl PeerLookup for FailingPeers {
        fn peers(&self, _ticker: &str, _industry: &str) -> Result<Vec<ComparablePeer>> {
            Err(Error::external("upstream unavailable"))
        }
    }

    #[test]
    fn test_sample_book_known_industry() {
        let book = SampleTransactionBook;
        let txns = book.transactions("Technology").unwrap();
        assert_eq!(txns.len(), 3);
        assert_eq!(txns[0].target, "Activision Blizzard");
    }

    #[test]
    fn test_sample_book_unknown_industry_is_nonempty() {
        let book = SampleTransactionBook;
        let txns = book.transactions("Underwater Basket Weaving").unwrap();
        assert!(!txns.is_empty());
        assert_eq!(txns[0].target, "Sample Target A");
    }

    #[test]
    fn test_peer_failure_degrades_to_empty() {
        let peers = peers_or_empty(&FailingPeers, "ACME", "Technology");
        assert!(peers.is_empty());
    }

    #[test]
    fn test_in_memory_peers_round_trip() {
        let peer = ComparablePeer {
            ticker: "AAPL".to_string(),
            name: "Apple Inc.".to_string(),
            market_cap: Some(2.9e12),
            ev_ebitda: Some(22.0),
            pe_ratio: Some(29.0),
            ev_revenue: Some(7.3),
        };
        let lookup = InMemoryPeers::new(vec![peer.clone()]);
        assert_eq!(lookup.peers("ACME", "Technology").unwrap(), vec![peer]);
    }
}
