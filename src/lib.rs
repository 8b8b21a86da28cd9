//! Optimizer log parser and ranking engine.
//!
//! This crate reads the two log files an optimizer run leaves behind:
//!
//! - the **state log**, one row per iteration with the iteration count, the
//!   primary error `ERR0`, an optional temperature `T` and a block of variable
//!   trajectories closed by a `|` column,
//! - the **char log**, one row per evaluated solution with its error components
//!   to the right of a `|` header cell,
//!
//! and derives what a viewer shows for them: variables ranked by volatility with
//! baseline-normalized trajectories, and per-solution error components ranked by
//! magnitude with their share of the total.
//!
//! The binary `optlog` prints the computed views as JSON.

pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod ranking;
pub mod view;

pub use error::{FormatError, LogError};
