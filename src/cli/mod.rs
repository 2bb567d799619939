pub mod queue;
pub mod server;
pub mod user;
