//! Panel-side account operations. Both run against the gateway, which owns
//! the password hashing; plaintext only ever travels inside the login and
//! signup bodies.

use crate::api::{encode, Api};
use crate::error::ClientError;
use crate::models::{Plan, ReadResponse, User};
use crate::validate;
use serde_json::json;

pub async fn login(api: &Api, email: &str, password: &str) -> Result<User, ClientError> {
    validate::email(email)?;

    let value = api
        .post("/login", json!({ "email": email, "password": password }))
        .await?;
    let found: ReadResponse<User> = serde_json::from_value(value).map_err(|e| {
        log::error!("login: {}", e);
        ClientError::Network
    })?;

    // The gateway answers success with exactly one hashless user.
    found.data.into_iter().next().ok_or(ClientError::Auth)
}

pub async fn signup(
    api: &Api,
    name: &str,
    email: &str,
    password: &str,
) -> Result<User, ClientError> {
    validate::email(email)?;
    validate::password(password)?;
    ensure_email_available(api, email).await?;

    // The field name is what the users table stores; the gateway replaces
    // the plaintext with a hash before it goes upstream.
    let created = api
        .create(
            "/create/users",
            json!({ "name": name, "email": email, "password_hash": password }),
        )
        .await?;

    Ok(User {
        id: created.id,
        name: name.to_owned(),
        email: email.to_owned(),
        password_hash: None,
        plan: Plan::Free,
    })
}

/// Best-effort uniqueness check. The data service has no unique constraint
/// on email, so two concurrent signups can still both pass; replacing this
/// body with an atomic upstream primitive fixes every caller at once.
pub async fn ensure_email_available(api: &Api, email: &str) -> Result<(), ClientError> {
    let existing: ReadResponse<User> = api
        .read(&format!("/read/users?email={}", encode(email)))
        .await?;
    if existing.data.is_empty() {
        Ok(())
    } else {
        Err(ClientError::validation("This email is already in use."))
    }
}
