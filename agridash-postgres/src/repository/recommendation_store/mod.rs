pub mod repo_impl;

pub mod counts;
pub mod latest;

pub use repo_impl::RecommendationStoreImpl;
