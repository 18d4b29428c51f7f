pub mod request_mapper;
pub mod history_mapper;
pub mod user_mapper;
