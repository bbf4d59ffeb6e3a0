//! Token estimators for the Context Router.
//!
//! [`BpeTokenEstimator`] counts exact `cl100k_base` tokens and is the
//! default. [`HeuristicTokenEstimator`] stands in when the encoding cannot
//! be built.

mod bpe;
mod heuristic;

pub use bpe::BpeTokenEstimator;
pub use heuristic::HeuristicTokenEstimator;

use duet_application::TokenEstimator;
use std::sync::Arc;
use tracing::{debug, warn};

/// The `cl100k_base` estimator, or the heuristic one if it fails to load.
pub fn default_estimator() -> Arc<dyn TokenEstimator> {
    match BpeTokenEstimator::cl100k_base() {
        Ok(estimator) => {
            debug!("Using cl100k_base token estimator");
            Arc::new(estimator)
        }
        Err(e) => {
            warn!(error = %e, "Failed to load cl100k_base encoding, using approximate counting");
            Arc::new(HeuristicTokenEstimator::new())
        }
    }
}
