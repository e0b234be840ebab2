//! Reporting core: season comparison aggregation and efficiency analysis.

pub mod aggregation;
pub mod efficiency;

pub use aggregation::*;
pub use efficiency::*;
