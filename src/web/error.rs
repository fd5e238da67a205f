use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use derive_more::{Display, Error};

/// Gateway failures. Bodies stay generic: upstream details go to the log,
/// not to the caller.
#[derive(Debug, Display, Error)]
pub enum GatewayError {
    /// No upstream credential in the environment.
    #[display(
        fmt = "Upstream API key not configured on the server. Set UPSTREAM_API_KEY in your .env file."
    )]
    Config,

    #[display(fmt = "Invalid email or password.")]
    Auth,

    /// Upstream transport failure, or a non-2xx on a specialized endpoint.
    #[display(fmt = "Proxy request failed.")]
    Upstream,
}

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Auth => StatusCode::UNAUTHORIZED,
            GatewayError::Config | GatewayError::Upstream => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "error": self.to_string() }))
    }
}
