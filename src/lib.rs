pub mod aggregation;
pub mod errors;
pub mod extraction;
pub mod matching;
pub mod utils;

pub use aggregation::{aggregate_documents, filter_by_type, AggregatedResult, DocumentAggregator};
pub use errors::{CleanupError, CleanupResult};
pub use utils::config::PipelineConfig;
