pub mod aggregator;
pub mod filter;
pub mod structure;
pub mod summary;

pub use aggregator::{
    aggregate_documents, AggregatedResult, AggregationStats, BorrowerDocuments, DocumentAggregator,
};
pub use filter::{filter_by_type, FilteredViews};
