pub mod retriever;
pub mod summarizer;
pub mod verifier;

pub use retriever::{AggregatorConfig, ContextAggregator, ContextBundle, TierBuckets, NO_CONTEXT};
pub use summarizer::SummarizerAgent;
pub use verifier::{CheckOutcome, VerifierAgent};
