//! Time and identifier sources injected into the token lifecycle.

use chrono::{DateTime, Utc};
use uuid::Uuid;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Produces the `jti` embedded in every issued token.
pub trait TokenIdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UuidTokenIds;

impl TokenIdGenerator for UuidTokenIds {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
