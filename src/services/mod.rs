pub mod user_repository;
pub mod user_service;
pub mod user_validator;

pub use user_repository::*;
pub use user_service::*;
