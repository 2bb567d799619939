//! HTTP surfaces of the three services.

pub mod auth;
pub mod gateway;
mod health;
pub mod ingredient;
