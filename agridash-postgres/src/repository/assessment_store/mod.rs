pub mod repo_impl;

pub mod rollup_by_user;

pub use repo_impl::AssessmentStoreImpl;
