//! Wire types for the back office API.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};

/// Identifier assigned by the API.
///
/// Depending on the endpoint the API returns ids as JSON numbers or strings;
/// the original shape is kept so it can be sent back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RemoteId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for RemoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for RemoteId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for RemoteId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RemoteId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Response wrapper. Most endpoints answer `{ "data": T }`, a few answer `T`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    pub(crate) fn into_inner(self) -> T {
        match self {
            Self::Wrapped { data } => data,
            Self::Bare(inner) => inner,
        }
    }
}

/// Credentials for the customer account created by the first step.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginCredentials {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: SecretString,
}

/// Body of `POST /admin/customers`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateCustomerBody<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CustomerCreated {
    #[serde(alias = "id")]
    pub customer_id: RemoteId,
}

/// Company fields collected from the registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfileInput {
    pub company_name: String,
    pub business_nature: String,
    pub business_email: String,
    pub phone_number: String,
    pub registered_office_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incorporation_date: Option<NaiveDate>,
}

/// Body of the company-profile create/update calls.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfilePayload {
    #[serde(flatten)]
    pub profile: CompanyProfileInput,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_id: Option<String>,
}

/// Company profile as stored by the API. Every field is optional because
/// the API is not consistent about what it echoes back.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyProfile {
    pub id: Option<RemoteId>,
    pub customer_id: Option<RemoteId>,
    pub company_name: Option<String>,
    pub registration_id: Option<String>,
}

/// Registration status values accepted by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    Pending,
    InProgress,
    Approved,
    Completed,
    Rejected,
}

impl std::fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Approved => "approved",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        };
        write!(f, "{s}")
    }
}

/// Body of `POST .../documents/upload-init`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadInitRequest {
    pub name: String,
    pub category: String,
    pub file_name: String,
    pub mime_type: String,
    pub file_size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_id: Option<String>,
}

/// Storage target handed out by `upload-init`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTarget {
    pub document_id: RemoteId,
    pub upload_url: String,
    #[serde(default)]
    pub upload_method: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub required_headers: BTreeMap<String, String>,
}

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl UploadTarget {
    /// HTTP method for the direct transfer; storage defaults to PUT.
    pub fn method(&self) -> &str {
        self.upload_method
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or("PUT")
    }
}

/// Body of `POST .../documents/{id}/upload-complete`.
///
/// `etag` is left out entirely when storage did not return one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UploadCompleteRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
}

impl UploadCompleteRequest {
    pub fn new(etag: Option<String>) -> Self {
        Self {
            etag: etag.filter(|e| !e.trim().is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn remote_id_keeps_number_or_string_shape() {
        let n: RemoteId = serde_json::from_value(json!(42)).unwrap();
        let s: RemoteId = serde_json::from_value(json!("doc_1")).unwrap();
        assert_eq!(n, RemoteId::Number(42));
        assert_eq!(s, RemoteId::from("doc_1"));
        assert_eq!(serde_json::to_value(&n).unwrap(), json!(42));
        assert_eq!(n.to_string(), "42");
        assert_eq!(s.to_string(), "doc_1");
    }

    #[test]
    fn envelope_accepts_wrapped_and_bare() {
        let wrapped: Envelope<CustomerCreated> =
            serde_json::from_value(json!({"data": {"customerId": 42}})).unwrap();
        let bare: Envelope<CustomerCreated> =
            serde_json::from_value(json!({"customerId": "cus_9"})).unwrap();
        let aliased: Envelope<CustomerCreated> =
            serde_json::from_value(json!({"data": {"id": 7}})).unwrap();

        assert_eq!(wrapped.into_inner().customer_id, RemoteId::Number(42));
        assert_eq!(bare.into_inner().customer_id, RemoteId::from("cus_9"));
        assert_eq!(aliased.into_inner().customer_id, RemoteId::Number(7));
    }

    #[test]
    fn upload_target_defaults() {
        let target: UploadTarget = serde_json::from_value(json!({
            "documentId": "doc_1",
            "uploadUrl": "https://storage.example.com/put/abc"
        }))
        .unwrap();
        assert_eq!(target.method(), "PUT");
        assert!(target.required_headers.is_empty());

        let target: UploadTarget = serde_json::from_value(json!({
            "documentId": 5,
            "uploadUrl": "https://storage.example.com/put/abc",
            "uploadMethod": "POST",
            "requiredHeaders": {"x-amz-acl": "private"}
        }))
        .unwrap();
        assert_eq!(target.method(), "POST");
        assert_eq!(target.required_headers["x-amz-acl"], "private");
    }

    #[test]
    fn upload_target_treats_null_optionals_as_absent() {
        let target: Envelope<UploadTarget> = serde_json::from_value(json!({
            "data": {
                "documentId": "doc_1",
                "uploadUrl": "https://storage.example.com/put/abc",
                "uploadMethod": null,
                "requiredHeaders": null
            }
        }))
        .unwrap();
        let target = target.into_inner();
        assert_eq!(target.document_id, RemoteId::from("doc_1"));
        assert_eq!(target.method(), "PUT");
        assert!(target.required_headers.is_empty());
    }

    #[test]
    fn complete_body_omits_missing_or_blank_etag() {
        let absent = serde_json::to_value(UploadCompleteRequest::new(None)).unwrap();
        let blank = serde_json::to_value(UploadCompleteRequest::new(Some(String::new()))).unwrap();
        let present =
            serde_json::to_value(UploadCompleteRequest::new(Some("\"abc\"".into()))).unwrap();

        assert_eq!(absent, json!({}));
        assert_eq!(blank, json!({}));
        assert_eq!(present, json!({"etag": "\"abc\""}));
    }

    #[test]
    fn profile_payload_flattens_and_skips_empty_optionals() {
        let payload = CompanyProfilePayload {
            profile: CompanyProfileInput {
                company_name: "Acme Ltd".into(),
                business_nature: "Trading".into(),
                business_email: "ops@acme.test".into(),
                phone_number: "+44 20 0000 0000".into(),
                registered_office_address: "1 High St".into(),
                company_type: None,
                country: Some("GB".into()),
                registration_number: None,
                incorporation_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            },
            registration_id: Some("reg_1".into()),
        };

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            json!({
                "companyName": "Acme Ltd",
                "businessNature": "Trading",
                "businessEmail": "ops@acme.test",
                "phoneNumber": "+44 20 0000 0000",
                "registeredOfficeAddress": "1 High St",
                "country": "GB",
                "incorporationDate": "2024-03-01",
                "registrationId": "reg_1"
            })
        );
    }

    #[test]
    fn status_display_matches_serde() {
        for status in [
            RegistrationStatus::Pending,
            RegistrationStatus::InProgress,
            RegistrationStatus::Approved,
            RegistrationStatus::Completed,
            RegistrationStatus::Rejected,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(format!("\"{status}\""), json);
        }
    }
}
