pub mod repo_impl;

pub mod last_logins;
pub mod login_counts;

pub use repo_impl::ActivityLogStoreImpl;
