//! Filter catalog module
//!
//! Spatial, frequency-domain and hybrid enhancement filters, the ACE-ME
//! composite filter, and the ordered catalog the evaluator runs.

pub mod spatial;
pub mod clahe;
pub mod frequency;
pub mod wavelet;
pub mod gamma;
pub mod hybrid;
pub mod novel;
pub mod catalog;


pub use catalog::{FilterCatalog, FilterDomain, FilterFn, FilterSpec, names};
pub use clahe::Clahe;
pub use frequency::TransferFunction;
pub use novel::{AceMeOutput, adaptive_gamma};
