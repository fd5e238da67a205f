//! Client-side submission throttle. In-memory and per widget instance,
//! trivially bypassable; the server does not enforce it.

use crate::cache::Clock;
use crate::error::ClientError;
use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex};

/// Form fields collected by the embedding shell.
#[derive(Clone, Debug)]
pub struct CommentForm {
    pub author_name: String,
    pub author_email: String,
    pub message: String,
}

pub struct SubmitThrottle {
    min_interval: Duration,
    last: Mutex<Option<DateTime<Utc>>>,
    clock: Arc<dyn Clock>,
}

impl SubmitThrottle {
    /// Three seconds between submissions.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        SubmitThrottle {
            min_interval: Duration::seconds(3),
            last: Mutex::new(None),
            clock,
        }
    }

    /// Rejects when called again inside the window; otherwise records the
    /// attempt. The timestamp is taken before the network call, so a
    /// failed submission still counts against the window.
    pub fn begin(&self) -> Result<(), ClientError> {
        let now = self.clock.now();
        let mut last = self.last.lock().unwrap();
        if let Some(previous) = *last {
            if now - previous < self.min_interval {
                return Err(ClientError::validation(
                    "Wait a few seconds before submitting another comment.",
                ));
            }
        }
        *last = Some(now);
        Ok(())
    }
}
