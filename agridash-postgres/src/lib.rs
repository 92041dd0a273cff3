pub mod postgres_stores;
pub mod repository;
pub mod utils;

pub use postgres_stores::PostgresStores;

#[cfg(test)]
pub mod test_helper;
