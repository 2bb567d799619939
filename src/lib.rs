pub mod auth;
pub mod config;
pub mod db;
pub mod email;
pub mod error;
pub mod extract;
pub mod observability;
pub mod routes;

pub use config::Config;
pub use db::create_pool;
