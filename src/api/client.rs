//! reqwest-backed [`AdminApi`] implementation.

use async_trait::async_trait;
use reqwest::{Method, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::AdminApi;
use super::types::{
    CompanyProfile, CompanyProfilePayload, CreateCustomerBody, CustomerCreated, Envelope,
    LoginCredentials, RegistrationStatus, RemoteId, UploadCompleteRequest, UploadInitRequest,
    UploadTarget,
};
use crate::config::ApiConfig;
use crate::error::ApiError;

/// Build the shared reqwest client for a configuration.
pub(crate) fn http_client(config: &ApiConfig) -> Result<reqwest::Client, ApiError> {
    let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
    if let Some(timeout) = config.request_timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(|e| ApiError::Transport {
        call: "client",
        reason: e.to_string(),
    })
}

/// Back office API over HTTP with bearer authentication.
pub struct HttpAdminApi {
    client: reqwest::Client,
    base_url: Url,
    token: SecretString,
}

impl HttpAdminApi {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        Ok(Self {
            client: http_client(config)?,
            base_url: config.base_url.clone(),
            token: config.api_token.clone(),
        })
    }

    /// Append percent-encoded path segments to the base URL.
    ///
    /// Empty segments are rejected so an id can never collapse onto the
    /// collection URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        if let Some(position) = segments.iter().position(|s| s.trim().is_empty()) {
            return Err(ApiError::InvalidUrl(format!(
                "{}: empty path segment at position {position}",
                self.base_url
            )));
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<B>(
        &self,
        call: &'static str,
        method: Method,
        url: Url,
        body: &B,
    ) -> Result<Value, ApiError>
    where
        B: Serialize + ?Sized + Sync,
    {
        tracing::debug!(call, %method, %url, "Calling back office API");

        let resp = self
            .client
            .request(method, url)
            .bearer_auth(self.token.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Transport {
                call,
                reason: e.to_string(),
            })?;

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        let body = parse_body(&text);

        if !status.is_success() {
            let message = extract_message(&body).unwrap_or_else(|| reason_phrase(status));
            tracing::debug!(call, status = status.as_u16(), %message, "Back office API rejected call");
            return Err(ApiError::Status {
                call,
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl AdminApi for HttpAdminApi {
    async fn create_customer(&self, login: &LoginCredentials) -> Result<RemoteId, ApiError> {
        const CALL: &str = "create-login";
        let body = CreateCustomerBody {
            first_name: &login.first_name,
            last_name: &login.last_name,
            email: &login.email,
            password: login.password.expose_secret(),
        };
        let url = self.endpoint(&["admin", "customers"])?;
        let value = self.send(CALL, Method::POST, url, &body).await?;
        let created: CustomerCreated = decode(CALL, value)?;
        Ok(created.customer_id)
    }

    async fn link_registration(
        &self,
        registration_id: &str,
        customer_id: &RemoteId,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&["admin", "registrations", registration_id])?;
        let body = serde_json::json!({
            "registrationId": registration_id,
            "customerId": customer_id,
        });
        self.send("link-registration", Method::PATCH, url, &body)
            .await?;
        Ok(())
    }

    async fn create_company_profile(
        &self,
        customer_id: &RemoteId,
        payload: &CompanyProfilePayload,
    ) -> Result<CompanyProfile, ApiError> {
        const CALL: &str = "company-profile";
        let id = customer_id.to_string();
        let url = self.endpoint(&["admin", "customers", &id, "company-profile"])?;
        let value = self.send(CALL, Method::POST, url, payload).await?;
        decode(CALL, value)
    }

    async fn update_company_profile(
        &self,
        customer_id: &RemoteId,
        payload: &CompanyProfilePayload,
    ) -> Result<CompanyProfile, ApiError> {
        const CALL: &str = "company-profile";
        let id = customer_id.to_string();
        let url = self.endpoint(&["admin", "customers", &id, "company-profile"])?;
        let value = self.send(CALL, Method::PATCH, url, payload).await?;
        decode(CALL, value)
    }

    async fn upload_init(
        &self,
        customer_id: &RemoteId,
        request: &UploadInitRequest,
    ) -> Result<UploadTarget, ApiError> {
        const CALL: &str = "upload-init";
        let id = customer_id.to_string();
        let url = self.endpoint(&["admin", "customers", &id, "documents", "upload-init"])?;
        let value = self.send(CALL, Method::POST, url, request).await?;
        decode(CALL, value)
    }

    async fn upload_complete(
        &self,
        customer_id: &RemoteId,
        document_id: &RemoteId,
        request: &UploadCompleteRequest,
    ) -> Result<(), ApiError> {
        let id = customer_id.to_string();
        let doc = document_id.to_string();
        let url = self.endpoint(&["admin", "customers", &id, "documents", &doc, "upload-complete"])?;
        self.send("upload-complete", Method::POST, url, request)
            .await?;
        Ok(())
    }

    async fn set_registration_status(
        &self,
        registration_id: &str,
        status: RegistrationStatus,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&["admin", "registrations", registration_id])?;
        let body = serde_json::json!({ "status": status });
        self.send("set-status", Method::PATCH, url, &body).await?;
        Ok(())
    }
}

/// Parse a response body, treating anything that is not a JSON object as `{}`.
pub(crate) fn parse_body(text: &str) -> Value {
    serde_json::from_str::<Value>(text)
        .ok()
        .filter(Value::is_object)
        .unwrap_or_else(|| Value::Object(Default::default()))
}

/// Pull a human-readable message out of an error body.
///
/// Looks at `message`, then `error` (string or `{message}`), then the first
/// usable entry of `errors`.
pub(crate) fn extract_message(body: &Value) -> Option<String> {
    fn text(value: &Value) -> Option<String> {
        match value {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Object(map) => map.get("message").and_then(text),
            _ => None,
        }
    }

    body.get("message")
        .and_then(text)
        .or_else(|| body.get("error").and_then(text))
        .or_else(|| {
            body.get("errors")
                .and_then(Value::as_array)
                .and_then(|errors| errors.iter().find_map(text))
        })
}

fn reason_phrase(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}

fn decode<T: DeserializeOwned>(call: &'static str, body: Value) -> Result<T, ApiError> {
    serde_json::from_value::<Envelope<T>>(body)
        .map(Envelope::into_inner)
        .map_err(|e| ApiError::InvalidResponse {
            call,
            reason: e.to_string(),
        })
}
