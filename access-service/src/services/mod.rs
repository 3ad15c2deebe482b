//! Services layer for access-service.
//!
//! Token lifecycle, project feature readiness, and the access decision
//! engine built on top of them.

mod access;
pub mod clock;
pub mod error;
mod features;
mod jwt;
mod token;

pub use access::AccessManager;
pub use clock::{Clock, SystemClock, TokenIdGenerator, UuidTokenIds};
pub use error::ServiceError;
pub use features::ProjectFeatureResolver;
pub use jwt::TokenCodec;
pub use token::{TokenAuthority, ValidationMode};
