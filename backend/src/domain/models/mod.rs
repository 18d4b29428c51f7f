pub mod request;
pub mod history;
pub mod user;
