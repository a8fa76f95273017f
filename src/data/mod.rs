pub mod memory;
pub mod postgres;
pub mod user_repository;
