pub mod repo_impl;

pub mod find_by_users;

pub use repo_impl::PredictionStoreImpl;
