mod redis_service;
mod memory_store;
mod store;

pub mod access;
pub mod auth;
pub mod comments;
pub mod dashboard;
pub mod projects;
pub mod users;

pub use redis_service::RedisService;
pub use memory_store::MemoryStore;
pub use store::Store;
