//! Point-to-cell binning: assignment, aggregation and the memoized pipeline
//! that ties them together.

pub mod aggregate;
pub mod assign;
pub mod indexer;
pub mod pipeline;

pub use aggregate::*;
pub use assign::*;
pub use indexer::*;
pub use pipeline::*;

#[cfg(test)]
mod test_support;
