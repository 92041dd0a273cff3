pub mod repo_impl;

pub mod counts;
pub mod find_by_id;
pub mod list_page;
pub mod region_distribution;
pub mod search;

pub use repo_impl::FarmerStoreImpl;
