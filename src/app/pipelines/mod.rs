pub mod aggregation_pipeline;
pub mod substitution_pipeline;

pub use aggregation_pipeline::AggregationPipeline;
pub use substitution_pipeline::SubstitutionPipeline;
