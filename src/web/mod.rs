pub mod create_user;
pub mod error;
pub mod login;
pub mod proxy;

use crate::config::GatewayConfig;
use actix_web::web;
use awc::http::header;
use awc::ClientRequest;

/// Configures the gateway routes.
///
/// Order matters: the specialized signup/login services sit above the
/// catch-all passthrough so they match first.
pub fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(create_user::post_create_user)
        .service(login::post_login)
        .service(web::resource("/proxy/{tail:.*}").route(web::route().to(proxy::forward)));
}

/// Stamps the data-service conventions onto an upstream request: instance
/// header, bearer credential, JSON content type. Applied last, so the
/// credential wins over anything a caller sent.
pub(crate) fn authorize(
    request: ClientRequest,
    config: &GatewayConfig,
    api_key: &str,
) -> ClientRequest {
    request
        .insert_header(("Instance", config.instance.as_str()))
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", api_key)))
        .insert_header((header::CONTENT_TYPE, "application/json"))
}
