use derive_more::{Display, Error};

use crate::models::Plan;

/// Failure taxonomy for every client-side operation (panel and widget).
///
/// Display strings double as the user-facing messages the panel shows, so
/// they are written for humans, not logs.
#[derive(Clone, Debug, Display, Error, PartialEq)]
pub enum ClientError {
    /// HTTP 429 from the data service.
    #[display(fmt = "Too many requests. Wait one minute before trying again.")]
    RateLimit,

    /// HTTP 401/403, or a failed credential check.
    #[display(fmt = "Invalid credentials.")]
    Auth,

    /// Any other non-2xx response, with the raw upstream body attached.
    #[display(fmt = "Data service error ({}): {}", status, body)]
    Api { status: u16, body: String },

    /// Transport failure or an unparsable response.
    #[display(fmt = "Connection failed. Check your internet connection.")]
    Network,

    /// Gateway has no upstream credential configured.
    #[display(fmt = "Server credential is not configured.")]
    Config,

    /// Widget: no site matches the embedded api key.
    #[display(fmt = "Unknown API key.")]
    InvalidKey,

    /// Local input check failed; never reaches the network.
    #[display(fmt = "{}", message)]
    Validation { message: String },

    /// Site creation refused by the plan's site allowance.
    #[display(fmt = "Site limit reached for the {} plan.", plan)]
    PlanLimit { plan: Plan },
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        ClientError::Validation {
            message: message.into(),
        }
    }
}
