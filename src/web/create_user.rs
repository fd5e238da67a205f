//! Signup endpoint. The one place plaintext becomes a hash: the client
//! submits the password in the `password_hash` field and the gateway
//! replaces it before anything goes upstream.

use crate::config::GatewayConfig;
use crate::web::error::GatewayError;
use actix_web::{post, web, HttpResponse};
use awc::Client;
use serde::Deserialize;
use serde_json::json;

/// Work factor the stored user hashes are created with.
pub const HASH_COST: u32 = 10;

#[derive(Deserialize)]
pub struct SignupData {
    name: String,
    email: String,
    /// Plaintext on arrival; hashed before it leaves the gateway.
    password_hash: String,
}

#[post("/proxy/create/users")]
pub async fn post_create_user(
    form: web::Json<SignupData>,
    config: web::Data<GatewayConfig>,
    client: web::Data<Client>,
) -> Result<HttpResponse, GatewayError> {
    let api_key = config.api_key.as_deref().ok_or(GatewayError::Config)?;

    let hash = bcrypt::hash(&form.password_hash, HASH_COST).map_err(|e| {
        log::error!("create_user: hash() {}", e);
        GatewayError::Upstream
    })?;

    let target = config.upstream_target("/create/users");
    let request = crate::web::authorize(client.post(target.as_str()), &config, api_key);
    let mut upstream_res = request
        .send_json(&json!({
            "name": form.name,
            "email": form.email,
            "password_hash": hash,
        }))
        .await
        .map_err(|e| {
            log::error!("create_user: send() {}", e);
            GatewayError::Upstream
        })?;

    let status = upstream_res.status();
    if !status.is_success() {
        log::error!("create_user: upstream {}", status);
        return Err(GatewayError::Upstream);
    }

    // Creation result relayed unchanged.
    let payload = upstream_res.body().await.map_err(|e| {
        log::error!("create_user: body() {}", e);
        GatewayError::Upstream
    })?;
    Ok(HttpResponse::build(status)
        .content_type("application/json")
        .body(payload))
}
