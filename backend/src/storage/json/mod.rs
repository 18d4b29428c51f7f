pub mod connection;
pub mod day_bucket_repository;
pub mod history_repository;
pub mod user_repository;

#[cfg(test)]
pub mod test_utils;

pub use connection::JsonConnection;
pub use day_bucket_repository::DayBucketRepository;
pub use history_repository::HistoryRepository;
pub use user_repository::UserRepository;
