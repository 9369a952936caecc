//! Multi-hop currency conversion and transfer-cost calculator.
//!
//! Two pure evaluators sit at the core:
//!
//! - [`evaluate_chain`] runs an amount through an ordered list of
//!   [`ConversionStep`]s (rate, percentage fee, fixed fee) and reports
//!   per-step losses and round-trip profit.
//! - [`compare_methods`] converts one source amount through several
//!   [`Method`]s and measures each against the fee-free mid-market rate.
//!
//! Around them: input snapshots ([`snapshot`]), a periodic mid-market
//! refresh ([`poller`]) fed by a [`rates::RateSource`], persisted
//! preferences ([`storage`]) and flat export rows ([`export`]).

pub mod config;
pub mod error;
pub mod export;
pub mod logic;
pub mod models;
pub mod poller;
pub mod rates;
pub mod snapshot;
pub mod storage;
pub mod utils;

pub use error::{Error, FetchError, Result, StorageError};
pub use logic::{compare_methods, evaluate_chain};
pub use models::{
    ChainOutcome, Comparison, ComparisonOutcome, ConversionStep, CrossRate, Direction,
    FeeCurrency, Method, StepResult,
};
pub use snapshot::{ArbitrageInputs, TransferInputs};
