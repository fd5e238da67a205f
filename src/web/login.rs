//! Login endpoint. Looks the user up by exact email, verifies the
//! submitted password against the stored hash, and answers with the user
//! record minus the hash.

use crate::api::encode;
use crate::config::GatewayConfig;
use crate::models::{ReadResponse, User};
use crate::web::error::GatewayError;
use actix_web::{post, web, HttpResponse};
use awc::Client;
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize)]
pub struct LoginData {
    email: String,
    password: String,
}

#[post("/proxy/login")]
pub async fn post_login(
    form: web::Json<LoginData>,
    config: web::Data<GatewayConfig>,
    client: web::Data<Client>,
) -> Result<HttpResponse, GatewayError> {
    let api_key = config.api_key.as_deref().ok_or(GatewayError::Config)?;

    let target = config.upstream_target(&format!("/read/users?email={}", encode(&form.email)));
    let request = crate::web::authorize(client.get(target.as_str()), &config, api_key);
    let mut upstream_res = request.send().await.map_err(|e| {
        log::error!("login: send() {}", e);
        GatewayError::Upstream
    })?;

    if !upstream_res.status().is_success() {
        log::error!("login: upstream {}", upstream_res.status());
        return Err(GatewayError::Upstream);
    }

    let found = upstream_res
        .json::<ReadResponse<User>>()
        .await
        .map_err(|e| {
            log::error!("login: json() {}", e);
            GatewayError::Upstream
        })?;

    // Exact-match lookup; zero rows and a bad password are the same 401.
    let mut user = found.data.into_iter().next().ok_or(GatewayError::Auth)?;
    let hash = user.password_hash.take().ok_or(GatewayError::Auth)?;
    if !bcrypt::verify(&form.password, &hash).unwrap_or(false) {
        return Err(GatewayError::Auth);
    }

    Ok(HttpResponse::Ok().json(json!({ "status": "success", "data": [user] })))
}
