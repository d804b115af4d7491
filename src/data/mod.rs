//! Data pipeline: CSV loading, per-country extraction and smoothing.
//!
//! # Module Structure
//!
//! - `loader`: reads the observation table and derives the case rate
//! - `extractor`: selects, forward-fills and smooths one country
//! - `smoothing`: the Gaussian filter itself

pub mod extractor;
pub mod loader;
pub mod smoothing;

pub use extractor::{extract_series, forward_fill};
pub use loader::{load_dataset, parse_dataset};
pub use smoothing::gaussian_filter1d;
