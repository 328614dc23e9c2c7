//! Pipeline stages.

pub mod export;
pub mod listings;
pub mod merge;
pub mod metrics;
pub mod pipeline;

pub use export::export_dataset;
pub use listings::collect_listings;
pub use merge::merge;
pub use metrics::collect_metrics;
pub use pipeline::{run_all, PipelineOutput};
