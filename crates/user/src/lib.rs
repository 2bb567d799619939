mod otp;
pub mod password;
mod repository;

pub use otp::*;
pub use repository::*;
