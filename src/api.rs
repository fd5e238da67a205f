//! HTTP transport shared by the panel operations and the widget.
//!
//! Wraps an `awc::Client` with the data-service conventions: the instance
//! name rides every query string, bodies are JSON, and responses are
//! classified into the [`ClientError`] taxonomy before callers see them.

use crate::error::ClientError;
use crate::models::{CreateResponse, ReadResponse};
use awc::http::{header, Method};
use awc::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;

#[derive(Clone)]
pub struct Api {
    client: Client,
    base_url: String,
    instance: String,
}

impl Api {
    /// `base_url` is either the gateway (panel) or the data service
    /// directly (widget), without a trailing slash.
    pub fn new(base_url: impl Into<String>, instance: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Api {
            client: Client::default(),
            base_url,
            instance: instance.into(),
        }
    }

    /// The underlying client, for calls outside the data-service
    /// conventions (e.g. the widget's IP echo lookup).
    pub fn http(&self) -> &Client {
        &self.client
    }

    pub async fn read<T: DeserializeOwned + Default>(
        &self,
        endpoint: &str,
    ) -> Result<ReadResponse<T>, ClientError> {
        let value = self.call(Method::GET, endpoint, None).await?;
        serde_json::from_value(value).map_err(|e| {
            log::error!("api read: {} {}", endpoint, e);
            ClientError::Network
        })
    }

    pub async fn create(&self, endpoint: &str, body: Value) -> Result<CreateResponse, ClientError> {
        let value = self.call(Method::POST, endpoint, Some(&body)).await?;
        serde_json::from_value(value).map_err(|e| {
            log::error!("api create: {} {}", endpoint, e);
            ClientError::Network
        })
    }

    pub async fn update(&self, endpoint: &str, body: Value) -> Result<Value, ClientError> {
        self.call(Method::PUT, endpoint, Some(&body)).await
    }

    pub async fn delete(&self, endpoint: &str) -> Result<Value, ClientError> {
        self.call(Method::DELETE, endpoint, None).await
    }

    /// POST outside the CRUD verbs (the gateway's login route).
    pub async fn post(&self, endpoint: &str, body: Value) -> Result<Value, ClientError> {
        self.call(Method::POST, endpoint, Some(&body)).await
    }

    async fn call(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<Value, ClientError> {
        let url = self.url_for(endpoint);
        let request = self
            .client
            .request(method.clone(), url.as_str())
            .insert_header((header::CONTENT_TYPE, "application/json"));

        let sent = match body {
            Some(body) => request.send_json(body).await,
            None => request.send().await,
        };
        let mut response = sent.map_err(|e| {
            log::error!("api: {} {} {}", method, endpoint, e);
            ClientError::Network
        })?;

        let status = response.status();
        let bytes = response.body().await.map_err(|e| {
            log::error!("api: {} {} {}", method, endpoint, e);
            ClientError::Network
        })?;

        if !status.is_success() {
            return Err(match status.as_u16() {
                429 => ClientError::RateLimit,
                401 | 403 => ClientError::Auth,
                code => ClientError::Api {
                    status: code,
                    body: String::from_utf8_lossy(&bytes).into_owned(),
                },
            });
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            log::error!("api: {} {} {}", method, endpoint, e);
            ClientError::Network
        })
    }

    fn url_for(&self, endpoint: &str) -> String {
        let separator = if endpoint.contains('?') { '&' } else { '?' };
        format!(
            "{}{}{}Instance={}",
            self.base_url, endpoint, separator, self.instance
        )
    }
}

/// Percent-encodes a single query-string value.
pub fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_rides_every_url() {
        let api = Api::new("http://gw.local/", "demo");
        assert_eq!(
            api.url_for("/read/users"),
            "http://gw.local/read/users?Instance=demo"
        );
        assert_eq!(
            api.url_for("/read/users?id=3"),
            "http://gw.local/read/users?id=3&Instance=demo"
        );
    }

    #[test]
    fn encode_escapes_reserved_chars() {
        assert_eq!(encode("/posts/a b?x=1"), "%2Fposts%2Fa+b%3Fx%3D1");
    }
}
