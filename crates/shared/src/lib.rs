mod error;
pub mod queue;
pub mod schemas;
pub mod service;

pub use error::*;
pub use queue::{ChannelPool, Diagnostics, QueueError, QueueSettings, QueueSystem, RpcClient};
pub use service::{ServiceClient, ServiceError};
