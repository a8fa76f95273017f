pub mod auth;
pub mod cart;
pub mod handlers;
pub mod middleware;
