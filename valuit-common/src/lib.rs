//! Shared infrastructure for the ValuIt valuation engine.
//!
//! Provides the unified error type used across the workspace and the
//! logging bootstrap. Valuation logic itself lives in `valuit-engine`;
//! this crate carries only the cross-cutting pieces.

pub mod error;
pub mod logging;

pub use error::{Error, Result};
