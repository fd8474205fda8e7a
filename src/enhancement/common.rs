//! Common utilities module
//!
//! This module contains the error types shared across the enhancement engine.

pub mod error;

pub use error::{EnhancementError, FilterError, FilterOutcome, Result};
