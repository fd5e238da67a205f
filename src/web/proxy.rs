//! Generic passthrough to the data service.
//!
//! Opaque byte relay: the upstream status code and raw body come back
//! verbatim; only the headers listed below are touched on either leg.

use crate::config::GatewayConfig;
use crate::web::error::GatewayError;
use actix_web::{web, HttpRequest, HttpResponse};
use awc::Client;

/// Request headers that must not be relayed upstream.
const STRIP_HEADERS: [&str; 10] = [
    "host",
    "content-length",
    "origin",
    "referer",
    "sec-fetch-dest",
    "sec-fetch-mode",
    "sec-fetch-site",
    "connection",
    "if-none-match",
    "priority",
];

/// Response headers safe to hand back to the caller. Content-length is
/// recomputed from the relayed body rather than copied.
const RELAY_HEADERS: [&str; 4] = [
    "content-type",
    "cache-control",
    "expires",
    "last-modified",
];

/// `ANY /proxy/{tail}`: substitute the prefix into the upstream base URL
/// and relay.
pub async fn forward(
    req: HttpRequest,
    body: web::Bytes,
    tail: web::Path<String>,
    config: web::Data<GatewayConfig>,
    client: web::Data<Client>,
) -> Result<HttpResponse, GatewayError> {
    let api_key = config.api_key.as_deref().ok_or(GatewayError::Config)?;

    let query = req
        .uri()
        .query()
        .map(|q| format!("?{}", q))
        .unwrap_or_default();
    let target = config.upstream_target(&format!("/{}{}", tail, query));
    log::debug!("proxy: {} /{}", req.method(), tail);

    let mut upstream_req = client.request(req.method().clone(), target.as_str());
    for (name, value) in req.headers() {
        if STRIP_HEADERS.contains(&name.as_str()) {
            continue;
        }
        // Anything not on the deny-list passes through unexamined.
        log::debug!("proxy: relaying header {}", name);
        upstream_req = upstream_req.insert_header((name.clone(), value.clone()));
    }
    upstream_req = crate::web::authorize(upstream_req, &config, api_key);

    let mut upstream_res = upstream_req.send_body(body).await.map_err(|e| {
        log::error!("proxy: send() {}", e);
        GatewayError::Upstream
    })?;

    let status = upstream_res.status();
    let payload = upstream_res.body().await.map_err(|e| {
        log::error!("proxy: body() {}", e);
        GatewayError::Upstream
    })?;

    let mut response = HttpResponse::build(status);
    for name in RELAY_HEADERS {
        if let Some(value) = upstream_res.headers().get(name) {
            response.insert_header((name, value.clone()));
        }
    }
    Ok(response.body(payload))
}
