//! Report assembly and presentation helpers.
//!
//! This module turns validated raw audit and bundle documents into the
//! stored [`types::AnalyticsReport`], classifies bundle assets into a size
//! breakdown, and derives averaged category scores for display.

pub mod assets;
pub mod builder;
pub mod scores;
pub mod types;
