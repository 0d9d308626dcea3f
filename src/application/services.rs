use crate::application::builders::request_builder::{
    API_KEY_HEADER, RequestBuilder, path_segment,
};
use crate::domain::entities::{Method, Request, Response};
use crate::domain::error::{ApiError, IterableError};
use crate::domain::records::{
    Campaign, CampaignsResponse, List, ListsResponse, MergeUsersRequest, User, UserResponse,
    UserUpdateRequest,
};
use crate::domain::value_objects::{ApiKey, BaseUrl};
use async_trait::async_trait;
use hyper::body::Bytes;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Trait for HTTP clients to enable mocking and dependency inversion
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(&self, request: Request) -> Result<Response, IterableError>;
}

/// The Iterable operations behind each CLI verb.
///
/// Every operation issues at most one request through the `HttpClient`
/// port. Validation happens before the request is built, so a usage error
/// never reaches the network.
pub struct IterableService {
    http_client: Box<dyn HttpClient>,
    base_url: BaseUrl,
    api_key: ApiKey,
}

impl IterableService {
    pub fn new(http_client: Box<dyn HttpClient>, base_url: BaseUrl, api_key: ApiKey) -> Self {
        Self {
            http_client,
            base_url,
            api_key,
        }
    }

    fn request(&self, method: Method, path: impl Into<String>) -> RequestBuilder<'_> {
        RequestBuilder::new(&self.base_url)
            .method(method)
            .path(path)
            .api_key(&self.api_key)
    }

    pub async fn get_user(&self, email: &str) -> Result<User, IterableError> {
        require_non_empty(email, "email")?;
        let request = self
            .request(Method::Get, format!("users/{}", path_segment(email)))
            .build()?;
        let response: UserResponse = self.send_json(request, "user response").await?;
        Ok(response.user)
    }

    pub async fn update_user(&self, update: &UserUpdateRequest) -> Result<(), IterableError> {
        update.validate()?;
        let request = self.request(Method::Post, "users/update").json(update)?.build()?;
        self.send_envelope(request).await
    }

    pub async fn delete_user(&self, email: &str) -> Result<(), IterableError> {
        require_non_empty(email, "email")?;
        let request = self
            .request(Method::Delete, format!("users/{}", path_segment(email)))
            .build()?;
        self.send_envelope(request).await
    }

    pub async fn delete_user_by_id(&self, user_id: &str) -> Result<(), IterableError> {
        require_non_empty(user_id, "user ID")?;
        let request = self
            .request(Method::Delete, format!("users/byUserId/{}", path_segment(user_id)))
            .build()?;
        self.send_envelope(request).await
    }

    pub async fn merge_users(&self, merge: &MergeUsersRequest) -> Result<(), IterableError> {
        merge.validate()?;
        let request = self.request(Method::Post, "users/merge").json(merge)?.build()?;
        self.send_envelope(request).await
    }

    pub async fn get_lists(&self) -> Result<Vec<List>, IterableError> {
        let request = self.request(Method::Get, "lists").build()?;
        let response: ListsResponse = self.send_json(request, "lists response").await?;
        Ok(response.lists)
    }

    /// List members come back in an export format chosen by the API, so the
    /// body is handed back untouched.
    pub async fn get_list_users(
        &self,
        list_id: u64,
        prefer_user_id: bool,
    ) -> Result<Bytes, IterableError> {
        let request = self
            .request(Method::Get, "lists/getUsers")
            .query("listId", list_id)
            .query("preferUserId", prefer_user_id)
            .build()?;
        self.send_raw(request).await
    }

    pub async fn get_campaigns(&self) -> Result<Vec<Campaign>, IterableError> {
        let request = self.request(Method::Get, "campaigns").build()?;
        let response: CampaignsResponse = self.send_json(request, "campaigns response").await?;
        Ok(response.campaigns)
    }

    /// Sends a request and decodes a success body into `T`.
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        request: Request,
        payload: &'static str,
    ) -> Result<T, IterableError> {
        let body = self.send_raw(request).await?;
        serde_json::from_slice(&body).map_err(|source| IterableError::Decode { payload, source })
    }

    /// Sends a request and returns the success body bytes.
    pub async fn send_raw(&self, request: Request) -> Result<Bytes, IterableError> {
        RequestValidator::validate(&request)?;
        let method = request.method;
        let url = request.url.as_str();
        debug!(%method, %url, "sending request");

        let response = self.http_client.send(request).await?;
        debug!(%method, %url, status = response.status.as_u16(), bytes = response.body.len(), "received response");

        ResponseDecoder::check_status(response)
    }

    /// Sends a mutating request whose answer is a result envelope.
    async fn send_envelope(&self, request: Request) -> Result<(), IterableError> {
        let envelope: ApiError = self.send_json(request, "result envelope").await?;
        envelope.into_result()
    }
}

fn require_non_empty(value: &str, what: &str) -> Result<(), IterableError> {
    if value.trim().is_empty() {
        return Err(IterableError::usage(format!("{what} is required")));
    }
    Ok(())
}

/// Maps non-success statuses onto the error envelope
struct ResponseDecoder;

impl ResponseDecoder {
    fn check_status(response: Response) -> Result<Bytes, IterableError> {
        if response.is_success() {
            return Ok(response.body);
        }
        let status = response.status.as_u16();
        match serde_json::from_slice::<ApiError>(&response.body) {
            Ok(envelope) => Err(IterableError::Api(envelope)),
            Err(source) => Err(IterableError::Status { status, source }),
        }
    }
}

/// Rules every outgoing request must satisfy
pub struct RequestValidator;

impl RequestValidator {
    pub fn validate(request: &Request) -> Result<(), IterableError> {
        Self::validate_api_key(request)?;
        Self::validate_method_body_combination(request)?;
        Ok(())
    }

    fn validate_api_key(request: &Request) -> Result<(), IterableError> {
        match request.header(API_KEY_HEADER) {
            Some(key) if !key.is_empty() => Ok(()),
            _ => Err(IterableError::usage("requests must carry an API key")),
        }
    }

    fn validate_method_body_combination(request: &Request) -> Result<(), IterableError> {
        match (&request.method, &request.body) {
            (Method::Get | Method::Delete, Some(_)) => Err(IterableError::usage(format!(
                "{} requests should not have a body",
                request.method
            ))),
            _ => Ok(()),
        }
    }
}
