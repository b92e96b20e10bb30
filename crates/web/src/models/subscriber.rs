//! Newsletter subscribers.

use chrono::{DateTime, Utc};
use serde::Serialize;

use cornerstone_core::{Email, SubscriberId};

/// An address on the newsletter list.
#[derive(Debug, Clone, Serialize)]
pub struct Subscriber {
    pub id: SubscriberId,
    pub email: Email,
    pub subscribed_at: DateTime<Utc>,
}
