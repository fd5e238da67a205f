//! Serde models for the entities owned by the remote data service.
//!
//! Nothing here is authoritative; these are wire shapes for the CRUD API
//! the gateway, panel and widget all talk to.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    #[default]
    Free,
    Paid,
}

impl Plan {
    /// Sites an owner may hold on this plan.
    pub fn site_limit(self) -> usize {
        match self {
            Plan::Free => 1,
            Plan::Paid => 3,
        }
    }

    pub fn is_supporter(self) -> bool {
        matches!(self, Plan::Paid)
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Plan::Free => "free",
            Plan::Paid => "paid",
        })
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Present only on gateway-internal reads; stripped before any response
    /// leaves the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    #[serde(default, deserialize_with = "plan_lenient")]
    pub plan: Plan,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Site {
    pub id: i64,
    pub user_id: i64,
    pub site_url: String,
    pub site_name: String,
    pub api_key: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Thread {
    pub id: i64,
    pub site_id: i64,
    /// Page path on the owner's site, e.g. `/posts/hello-world`.
    pub page_identifier: String,
    #[serde(default)]
    pub page_title: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Comment {
    pub id: i64,
    pub thread_id: i64,
    pub author_name: String,
    #[serde(default)]
    pub author_email: String,
    pub message: String,
    #[serde(default)]
    pub ip_address: String,
    #[serde(default, deserialize_with = "bool_lenient")]
    pub visible: bool,
    /// Set by the data service; relayed for display, never computed with.
    #[serde(default)]
    pub created_at: String,
}

/// Read envelope: `{ "data": [...], "total": n? }`.
#[derive(Debug, Deserialize)]
pub struct ReadResponse<T> {
    #[serde(default)]
    pub data: Vec<T>,
    #[serde(default)]
    pub total: Option<i64>,
}

/// Create envelope: `{ "id": n, ... }`.
#[derive(Debug, Deserialize)]
pub struct CreateResponse {
    pub id: i64,
}

/// The MySQL-backed service returns booleans as `0`/`1` in some responses
/// and `true`/`false` in others.
fn bool_lenient<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Int(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Bool(b) => b,
        Raw::Int(n) => n != 0,
    })
}

/// Records created before the plan column existed carry null or an empty
/// string; both read as the free plan.
fn plan_lenient<'de, D>(deserializer: D) -> Result<Plan, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(match raw.as_deref() {
        Some("paid") => Plan::Paid,
        _ => Plan::Free,
    })
}
