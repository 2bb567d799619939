mod bearer;
pub mod jwt;

pub use bearer::{BearerClaims, BearerRejection};
pub use jwt::{Claims, JwtKeys};
